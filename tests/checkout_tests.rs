mod common;

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use common::{seed_order, InMemoryCheckoutStore};
use storefront_api::errors::AppError;
use storefront_api::models::{OrderMeta, OrderStatus};
use storefront_api::services::orders::OrderService;

fn service(store: &InMemoryCheckoutStore) -> OrderService {
  OrderService::new(Arc::new(store.clone()))
}

fn meta() -> OrderMeta {
  OrderMeta {
    shipping_address: Some("1 Harbour Road".to_string()),
    shipping_city: Some("Wellington".to_string()),
    ..OrderMeta::default()
  }
}

#[tokio::test]
async fn checkout_produces_order_with_matching_details() {
  let store = InMemoryCheckoutStore::new();
  let tee = store.add_product("Arctic Pole Tee", "100.00", "80.00");
  let mug = store.add_product("Haul Mug", "50.00", "0.00");
  store.add_cart_line("cart-1", tee, "LG, Red", 2);
  store.add_cart_line("cart-1", mug, "", 1);

  let orders = service(&store);
  let customer_id = Uuid::new_v4();
  let order_id = orders.create_order("cart-1", customer_id, meta()).await.unwrap();

  let order = orders.get_order(order_id).await.unwrap();
  assert_eq!(order.order.customer_id, customer_id);
  assert_eq!(order.order.status, OrderStatus::Created);
  assert_eq!(order.order.total_amount, "210.00".parse::<Decimal>().unwrap());
  assert_eq!(order.order.shipping_city.as_deref(), Some("Wellington"));
  assert_eq!(order.order_items.len(), 2);

  let detail_sum: Decimal = order
    .order_items
    .iter()
    .map(|d| d.unit_cost * Decimal::from(d.quantity))
    .sum();
  assert_eq!(detail_sum, order.order.total_amount);

  let tee_detail = order
    .order_items
    .iter()
    .find(|d| d.product_id == tee)
    .expect("tee detail");
  assert_eq!(tee_detail.unit_cost, "80.00".parse::<Decimal>().unwrap());
  assert_eq!(tee_detail.product_name, "Arctic Pole Tee");
  assert_eq!(tee_detail.attributes, "LG, Red");
}

#[tokio::test]
async fn checkout_of_empty_cart_fails_before_any_write() {
  let store = InMemoryCheckoutStore::new();
  let orders = service(&store);

  let result = orders.create_order("no-such-cart", Uuid::new_v4(), OrderMeta::default()).await;

  assert!(matches!(result, Err(AppError::EmptyCart)));
  assert_eq!(store.order_count(), 0);
  assert_eq!(store.detail_count(), 0);
}

#[tokio::test]
async fn detail_persistence_failure_rolls_back_the_entire_order() {
  let store = InMemoryCheckoutStore::new();
  let tee = store.add_product("Arctic Pole Tee", "100.00", "80.00");
  store.add_cart_line("cart-1", tee, "LG", 2);
  store.inject_detail_failure();

  let orders = service(&store);
  let result = orders.create_order("cart-1", Uuid::new_v4(), OrderMeta::default()).await;

  assert!(matches!(result, Err(AppError::OrderCreationFailed(_))));
  // All-or-nothing: no order row, no detail rows, cart untouched.
  assert_eq!(store.order_count(), 0);
  assert_eq!(store.detail_count(), 0);
  assert_eq!(store.cart_line_count("cart-1"), 1);
}

#[tokio::test]
async fn order_snapshots_survive_later_catalog_changes() {
  let store = InMemoryCheckoutStore::new();
  let tee = store.add_product("Arctic Pole Tee", "100.00", "80.00");
  store.add_cart_line("cart-1", tee, "LG", 1);

  let orders = service(&store);
  let order_id = orders.create_order("cart-1", Uuid::new_v4(), OrderMeta::default()).await.unwrap();

  // Reprice and rename the product after checkout.
  store.set_product_price(tee, "999.00", "500.00");

  let order = orders.get_order(order_id).await.unwrap();
  assert_eq!(order.order.total_amount, "80.00".parse::<Decimal>().unwrap());
  assert_eq!(order.order_items[0].unit_cost, "80.00".parse::<Decimal>().unwrap());
  assert_eq!(order.order_items[0].product_name, "Arctic Pole Tee");
}

#[tokio::test]
async fn checkout_consumes_the_cart() {
  let store = InMemoryCheckoutStore::new();
  let tee = store.add_product("Arctic Pole Tee", "100.00", "0.00");
  store.add_cart_line("cart-1", tee, "", 1);

  let orders = service(&store);
  orders.create_order("cart-1", Uuid::new_v4(), OrderMeta::default()).await.unwrap();

  assert_eq!(store.cart_line_count("cart-1"), 0);

  // A stale re-submission of the same cart now fails loudly instead of
  // producing a duplicate order.
  let retry = orders.create_order("cart-1", Uuid::new_v4(), OrderMeta::default()).await;
  assert!(matches!(retry, Err(AppError::EmptyCart)));
}

#[tokio::test]
async fn unknown_order_reads_are_not_found() {
  let store = InMemoryCheckoutStore::new();
  let orders = service(&store);

  assert!(matches!(orders.get_order(Uuid::new_v4()).await, Err(AppError::NotFound(_))));
  assert!(matches!(
    orders.get_order_summary(Uuid::new_v4()).await,
    Err(AppError::NotFound(_))
  ));
  assert!(matches!(orders.mark_paid(Uuid::new_v4()).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn mark_paid_transitions_order_status() {
  let store = InMemoryCheckoutStore::new();
  let customer_id = Uuid::new_v4();
  let order_id = seed_order(&store, customer_id, "210.00");

  let orders = service(&store);
  orders.mark_paid(order_id).await.unwrap();

  let order = orders.get_order_summary(order_id).await.unwrap();
  assert_eq!(order.status, OrderStatus::Paid);
}

#[tokio::test]
async fn customer_orders_are_scoped_to_the_customer() {
  let store = InMemoryCheckoutStore::new();
  let customer_a = Uuid::new_v4();
  let customer_b = Uuid::new_v4();
  seed_order(&store, customer_a, "10.00");
  seed_order(&store, customer_a, "20.00");
  seed_order(&store, customer_b, "30.00");

  let orders = service(&store);
  assert_eq!(orders.get_customer_orders(customer_a).await.unwrap().len(), 2);
  assert_eq!(orders.get_customer_orders(customer_b).await.unwrap().len(), 1);
}
