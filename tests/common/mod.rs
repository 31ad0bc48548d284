#![allow(dead_code)] // Allow unused helpers in this common test module

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use storefront_api::errors::{AppError, Result};
use storefront_api::models::{Order, OrderDetail, OrderStatus};
use storefront_api::services::orders::{CheckoutStore, CheckoutUnitOfWork};
use storefront_api::services::pricing::CartLine;

#[derive(Clone)]
struct ProductRow {
  name: String,
  price: Decimal,
  discounted_price: Decimal,
}

#[derive(Clone)]
struct StoredCartLine {
  cart_id: String,
  product_id: Uuid,
  attributes: String,
  quantity: i32,
}

#[derive(Default)]
struct StoreState {
  products: HashMap<Uuid, ProductRow>,
  cart_lines: Vec<StoredCartLine>,
  orders: Vec<Order>,
  details: Vec<OrderDetail>,
}

/// In-memory `CheckoutStore`. Writes issued through a unit of work are
/// staged and only become visible at commit, mirroring the transactional
/// contract of the production store. `fail_detail_inserts` injects a
/// failure into the detail-persistence step.
#[derive(Clone, Default)]
pub struct InMemoryCheckoutStore {
  state: Arc<Mutex<StoreState>>,
  pub fail_detail_inserts: Arc<AtomicBool>,
}

impl InMemoryCheckoutStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_product(&self, name: &str, price: &str, discounted_price: &str) -> Uuid {
    let product_id = Uuid::new_v4();
    self.state.lock().unwrap().products.insert(
      product_id,
      ProductRow {
        name: name.to_string(),
        price: price.parse().unwrap(),
        discounted_price: discounted_price.parse().unwrap(),
      },
    );
    product_id
  }

  pub fn set_product_price(&self, product_id: Uuid, price: &str, discounted_price: &str) {
    let mut state = self.state.lock().unwrap();
    let row = state.products.get_mut(&product_id).expect("product row");
    row.price = price.parse().unwrap();
    row.discounted_price = discounted_price.parse().unwrap();
  }

  pub fn add_cart_line(&self, cart_id: &str, product_id: Uuid, attributes: &str, quantity: i32) {
    self.state.lock().unwrap().cart_lines.push(StoredCartLine {
      cart_id: cart_id.to_string(),
      product_id,
      attributes: attributes.to_string(),
      quantity,
    });
  }

  pub fn inject_detail_failure(&self) {
    self.fail_detail_inserts.store(true, Ordering::SeqCst);
  }

  pub fn order_count(&self) -> usize {
    self.state.lock().unwrap().orders.len()
  }

  pub fn detail_count(&self) -> usize {
    self.state.lock().unwrap().details.len()
  }

  pub fn cart_line_count(&self, cart_id: &str) -> usize {
    self
      .state
      .lock()
      .unwrap()
      .cart_lines
      .iter()
      .filter(|l| l.cart_id == cart_id)
      .count()
  }
}

struct InMemoryUnitOfWork {
  state: Arc<Mutex<StoreState>>,
  fail_detail_inserts: bool,
  staged_orders: Vec<Order>,
  staged_details: Vec<OrderDetail>,
  consumed_carts: Vec<String>,
}

#[async_trait]
impl CheckoutUnitOfWork for InMemoryUnitOfWork {
  async fn lock_cart_lines(&mut self, cart_id: &str) -> Result<Vec<CartLine>> {
    let state = self.state.lock().unwrap();
    Ok(
      state
        .cart_lines
        .iter()
        .filter(|l| l.cart_id == cart_id)
        .map(|l| {
          let product = state.products.get(&l.product_id).expect("product row");
          CartLine {
            product_id: l.product_id,
            product_name: product.name.clone(),
            attributes: l.attributes.clone(),
            quantity: l.quantity,
            price: product.price,
            discounted_price: product.discounted_price,
          }
        })
        .collect(),
    )
  }

  async fn insert_order(&mut self, order: &Order) -> Result<()> {
    self.staged_orders.push(order.clone());
    Ok(())
  }

  async fn insert_order_detail(&mut self, detail: &OrderDetail) -> Result<()> {
    if self.fail_detail_inserts {
      return Err(AppError::Internal(anyhow::anyhow!("injected detail-insert failure")));
    }
    self.staged_details.push(detail.clone());
    Ok(())
  }

  async fn consume_cart(&mut self, cart_id: &str) -> Result<u64> {
    let removed = self
      .state
      .lock()
      .unwrap()
      .cart_lines
      .iter()
      .filter(|l| l.cart_id == cart_id)
      .count() as u64;
    self.consumed_carts.push(cart_id.to_string());
    Ok(removed)
  }

  async fn commit(self: Box<Self>) -> Result<()> {
    let mut state = self.state.lock().unwrap();
    state.orders.extend(self.staged_orders);
    state.details.extend(self.staged_details);
    for cart_id in &self.consumed_carts {
      state.cart_lines.retain(|l| &l.cart_id != cart_id);
    }
    Ok(())
  }
}

#[async_trait]
impl CheckoutStore for InMemoryCheckoutStore {
  async fn begin(&self) -> Result<Box<dyn CheckoutUnitOfWork>> {
    Ok(Box::new(InMemoryUnitOfWork {
      state: self.state.clone(),
      fail_detail_inserts: self.fail_detail_inserts.load(Ordering::SeqCst),
      staged_orders: Vec::new(),
      staged_details: Vec::new(),
      consumed_carts: Vec::new(),
    }))
  }

  async fn fetch_order(&self, order_id: Uuid) -> Result<Option<Order>> {
    Ok(
      self
        .state
        .lock()
        .unwrap()
        .orders
        .iter()
        .find(|o| o.order_id == order_id)
        .cloned(),
    )
  }

  async fn fetch_order_details(&self, order_id: Uuid) -> Result<Vec<OrderDetail>> {
    Ok(
      self
        .state
        .lock()
        .unwrap()
        .details
        .iter()
        .filter(|d| d.order_id == order_id)
        .cloned()
        .collect(),
    )
  }

  async fn fetch_customer_orders(&self, customer_id: Uuid) -> Result<Vec<Order>> {
    Ok(
      self
        .state
        .lock()
        .unwrap()
        .orders
        .iter()
        .filter(|o| o.customer_id == customer_id)
        .cloned()
        .collect(),
    )
  }

  async fn set_order_status(&self, order_id: Uuid, status: OrderStatus) -> Result<u64> {
    let mut state = self.state.lock().unwrap();
    match state.orders.iter_mut().find(|o| o.order_id == order_id) {
      Some(order) => {
        order.status = status;
        Ok(1)
      }
      None => Ok(0),
    }
  }
}

/// An order row pre-seeded outside the checkout path, for read/status tests.
pub fn seed_order(store: &InMemoryCheckoutStore, customer_id: Uuid, total_amount: &str) -> Uuid {
  let order = Order {
    order_id: Uuid::new_v4(),
    customer_id,
    total_amount: total_amount.parse().unwrap(),
    status: OrderStatus::Created,
    shipping_address: None,
    shipping_city: None,
    shipping_region: None,
    shipping_postal_code: None,
    shipping_country: None,
    comments: None,
    created_at: Utc::now(),
  };
  let order_id = order.order_id;
  store.state.lock().unwrap().orders.push(order);
  order_id
}
