use actix_web::web;

use crate::web::handlers::{
  cart_handlers, customer_handlers, order_handlers, payment_handlers, product_handlers,
};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Shopping Cart Routes (no credential required; cart ids are opaque client input)
      .service(
        web::scope("/shoppingcart")
          .route("/generateUniqueId", web::get().to(cart_handlers::generate_unique_cart))
          .route("/add", web::post().to(cart_handlers::add_to_cart))
          .route("/update/{item_id}", web::put().to(cart_handlers::update_cart_item))
          .route("/empty/{cart_id}", web::delete().to(cart_handlers::empty_cart))
          .route(
            "/removeProduct/{item_id}",
            web::delete().to(cart_handlers::remove_item_from_cart),
          )
          .route("/{cart_id}", web::get().to(cart_handlers::get_cart)),
      )
      // Order Routes (credential required)
      .service(
        web::scope("/orders")
          .route("", web::post().to(order_handlers::create_order))
          .route("/inCustomer", web::get().to(order_handlers::get_customer_orders))
          .route(
            "/shortDetail/{order_id}",
            web::get().to(order_handlers::get_order_summary),
          )
          .route("/{order_id}", web::get().to(order_handlers::get_order)),
      )
      // Payment capture (credential required)
      .service(web::scope("/stripe").route("/charge", web::post().to(payment_handlers::charge_order)))
      // Customer Routes
      .service(
        web::scope("/customers")
          .route("", web::post().to(customer_handlers::register_customer))
          .route("/login", web::post().to(customer_handlers::login_customer))
          .route("", web::get().to(customer_handlers::get_customer_profile)),
      )
      // Catalog Routes
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products))
          .route("/{product_id}", web::get().to(product_handlers::get_product)),
      ),
  );
}
