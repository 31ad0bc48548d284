//! Order assembly: the transactional cart-to-order conversion.
//!
//! A checkout moves through `load cart -> price -> persist order -> persist
//! details -> consume cart` inside one unit of work. Either every write
//! lands or none does; an order row never exists without its complete
//! detail set. The unit of work is a trait so the assembly logic runs
//! against an in-memory store in tests and a `sqlx` transaction in
//! production.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{Order, OrderDetail, OrderMeta, OrderStatus, OrderWithDetails};
use crate::services::pricing::{self, CartLine};

/// One atomic scope for a checkout. Writes staged through a unit of work
/// become observable only at `commit`; dropping the value abandons them.
#[async_trait]
pub trait CheckoutUnitOfWork: Send {
  /// Load the cart's lines joined with current product rows, locking the
  /// lines against a concurrent checkout of the same cart.
  async fn lock_cart_lines(&mut self, cart_id: &str) -> Result<Vec<CartLine>>;
  async fn insert_order(&mut self, order: &Order) -> Result<()>;
  async fn insert_order_detail(&mut self, detail: &OrderDetail) -> Result<()>;
  /// Checkout consumes the cart; returns the number of lines removed.
  async fn consume_cart(&mut self, cart_id: &str) -> Result<u64>;
  async fn commit(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait CheckoutStore: Send + Sync {
  async fn begin(&self) -> Result<Box<dyn CheckoutUnitOfWork>>;

  async fn fetch_order(&self, order_id: Uuid) -> Result<Option<Order>>;
  async fn fetch_order_details(&self, order_id: Uuid) -> Result<Vec<OrderDetail>>;
  async fn fetch_customer_orders(&self, customer_id: Uuid) -> Result<Vec<Order>>;
  /// Returns the number of rows updated.
  async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<u64>;
}

// --- PostgreSQL implementation ---

#[derive(Clone)]
pub struct PgCheckoutStore {
  pool: PgPool,
}

impl PgCheckoutStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

pub struct PgCheckoutUnitOfWork {
  tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CheckoutUnitOfWork for PgCheckoutUnitOfWork {
  async fn lock_cart_lines(&mut self, cart_id: &str) -> Result<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
      "SELECT sc.product_id, p.name AS product_name, sc.attributes, sc.quantity, \
              p.price, p.discounted_price \
       FROM shopping_cart sc \
       JOIN product p ON p.product_id = sc.product_id \
       WHERE sc.cart_id = $1 \
       ORDER BY sc.added_at \
       FOR UPDATE OF sc",
    )
    .bind(cart_id)
    .fetch_all(&mut *self.tx)
    .await?;
    Ok(lines)
  }

  async fn insert_order(&mut self, order: &Order) -> Result<()> {
    sqlx::query(
      "INSERT INTO orders (order_id, customer_id, total_amount, status, \
              shipping_address, shipping_city, shipping_region, \
              shipping_postal_code, shipping_country, comments, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(order.order_id)
    .bind(order.customer_id)
    .bind(order.total_amount)
    .bind(order.status)
    .bind(&order.shipping_address)
    .bind(&order.shipping_city)
    .bind(&order.shipping_region)
    .bind(&order.shipping_postal_code)
    .bind(&order.shipping_country)
    .bind(&order.comments)
    .bind(order.created_at)
    .execute(&mut *self.tx)
    .await?;
    Ok(())
  }

  async fn insert_order_detail(&mut self, detail: &OrderDetail) -> Result<()> {
    sqlx::query(
      "INSERT INTO order_detail (detail_id, order_id, product_id, attributes, \
              product_name, quantity, unit_cost) \
       VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(detail.detail_id)
    .bind(detail.order_id)
    .bind(detail.product_id)
    .bind(&detail.attributes)
    .bind(&detail.product_name)
    .bind(detail.quantity)
    .bind(detail.unit_cost)
    .execute(&mut *self.tx)
    .await?;
    Ok(())
  }

  async fn consume_cart(&mut self, cart_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM shopping_cart WHERE cart_id = $1")
      .bind(cart_id)
      .execute(&mut *self.tx)
      .await?;
    Ok(result.rows_affected())
  }

  async fn commit(self: Box<Self>) -> Result<()> {
    self.tx.commit().await?;
    Ok(())
  }
}

const ORDER_COLUMNS: &str = "order_id, customer_id, total_amount, status, \
       shipping_address, shipping_city, shipping_region, shipping_postal_code, \
       shipping_country, comments, created_at";

#[async_trait]
impl CheckoutStore for PgCheckoutStore {
  async fn begin(&self) -> Result<Box<dyn CheckoutUnitOfWork>> {
    let tx = self.pool.begin().await?;
    Ok(Box::new(PgCheckoutUnitOfWork { tx }))
  }

  async fn fetch_order(&self, order_id: Uuid) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!(
      "SELECT {} FROM orders WHERE order_id = $1",
      ORDER_COLUMNS
    ))
    .bind(order_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(order)
  }

  async fn fetch_order_details(&self, order_id: Uuid) -> Result<Vec<OrderDetail>> {
    let details = sqlx::query_as::<_, OrderDetail>(
      "SELECT detail_id, order_id, product_id, attributes, product_name, quantity, unit_cost \
       FROM order_detail WHERE order_id = $1 ORDER BY product_name",
    )
    .bind(order_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(details)
  }

  async fn fetch_customer_orders(&self, customer_id: Uuid) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
      "SELECT {} FROM orders WHERE customer_id = $1 ORDER BY created_at DESC",
      ORDER_COLUMNS
    ))
    .bind(customer_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(orders)
  }

  async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<u64> {
    let result = sqlx::query("UPDATE orders SET status = $2 WHERE order_id = $1")
      .bind(order_id)
      .bind(status)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }
}

// --- Order assembly service ---

#[derive(Clone)]
pub struct OrderService {
  store: Arc<dyn CheckoutStore>,
}

impl OrderService {
  pub fn new(store: Arc<dyn CheckoutStore>) -> Self {
    Self { store }
  }

  /// Convert a cart into an immutable order plus per-line snapshots.
  ///
  /// All writes happen inside one unit of work; any failure after the cart
  /// is loaded abandons the transaction and reports `OrderCreationFailed`.
  /// An empty cart is reported explicitly before anything is written.
  #[instrument(name = "orders::create_order", skip(self, meta))]
  pub async fn create_order(&self, cart_id: &str, customer_id: Uuid, meta: OrderMeta) -> Result<Uuid> {
    let mut uow = self.store.begin().await?;

    let lines = uow.lock_cart_lines(cart_id).await?;
    if lines.is_empty() {
      return Err(AppError::EmptyCart);
    }

    let priced = pricing::price_cart(&lines);
    let order = Order {
      order_id: Uuid::new_v4(),
      customer_id,
      total_amount: priced.total_amount,
      status: OrderStatus::Created,
      shipping_address: meta.shipping_address,
      shipping_city: meta.shipping_city,
      shipping_region: meta.shipping_region,
      shipping_postal_code: meta.shipping_postal_code,
      shipping_country: meta.shipping_country,
      comments: meta.comments,
      created_at: Utc::now(),
    };

    uow
      .insert_order(&order)
      .await
      .map_err(|e| AppError::OrderCreationFailed(e.into()))?;

    for line in &priced.lines {
      let detail = OrderDetail {
        detail_id: Uuid::new_v4(),
        order_id: order.order_id,
        product_id: line.product_id,
        attributes: line.attributes.clone(),
        product_name: line.product_name.clone(),
        quantity: line.quantity,
        unit_cost: line.unit_cost,
      };
      uow
        .insert_order_detail(&detail)
        .await
        .map_err(|e| AppError::OrderCreationFailed(e.into()))?;
    }

    uow
      .consume_cart(cart_id)
      .await
      .map_err(|e| AppError::OrderCreationFailed(e.into()))?;
    uow
      .commit()
      .await
      .map_err(|e| AppError::OrderCreationFailed(e.into()))?;

    info!(order_id = %order.order_id, total = %order.total_amount, "Order created.");
    Ok(order.order_id)
  }

  #[instrument(name = "orders::get_order", skip(self))]
  pub async fn get_order(&self, order_id: Uuid) -> Result<OrderWithDetails> {
    let order = self
      .store
      .fetch_order(order_id)
      .await?
      .ok_or_else(|| AppError::not_found(format!("Order with id {} does not exist", order_id)))?;
    let order_items = self.store.fetch_order_details(order_id).await?;
    Ok(OrderWithDetails { order, order_items })
  }

  /// Order row without its details.
  #[instrument(name = "orders::get_order_summary", skip(self))]
  pub async fn get_order_summary(&self, order_id: Uuid) -> Result<Order> {
    self
      .store
      .fetch_order(order_id)
      .await?
      .ok_or_else(|| AppError::not_found(format!("Order with id {} does not exist", order_id)))
  }

  /// Every order belonging to a customer. Unbounded; pagination is out of
  /// scope for order history.
  #[instrument(name = "orders::get_customer_orders", skip(self))]
  pub async fn get_customer_orders(&self, customer_id: Uuid) -> Result<Vec<Order>> {
    self.store.fetch_customer_orders(customer_id).await
  }

  /// Transition an order to `paid` after a successful capture.
  #[instrument(name = "orders::mark_paid", skip(self))]
  pub async fn mark_paid(&self, order_id: Uuid) -> Result<()> {
    let updated = self.store.set_order_status(order_id, OrderStatus::Paid).await?;
    if updated == 0 {
      return Err(AppError::not_found(format!("Order with id {} does not exist", order_id)));
    }
    Ok(())
  }
}
