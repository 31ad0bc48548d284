//! Shopping cart: line CRUD with add-item merge semantics.
//!
//! Cart identifiers are client-generated opaque strings. They are untrusted
//! input and never an authorization token; every operation here is reachable
//! without a credential, which is why nothing in this module touches
//! customer identity.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{CartItem, CartItemWithProduct, CartLineView};
use crate::services::pricing;

#[async_trait]
pub trait CartRepository: Send + Sync {
  async fn find_line(&self, cart_id: &str, product_id: Uuid) -> Result<Option<CartItem>>;
  async fn insert_line(&self, item: &CartItem) -> Result<()>;
  /// Replace a line's quantity; `None` when the item does not exist.
  async fn set_quantity(&self, item_id: Uuid, quantity: i32) -> Result<Option<CartItem>>;
  async fn product_exists(&self, product_id: Uuid) -> Result<bool>;
  async fn list_lines(&self, cart_id: &str) -> Result<Vec<CartItemWithProduct>>;
  async fn delete_line(&self, item_id: Uuid) -> Result<u64>;
  async fn delete_cart(&self, cart_id: &str) -> Result<u64>;
}

#[derive(Clone)]
pub struct PgCartRepository {
  pool: PgPool,
}

impl PgCartRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CartRepository for PgCartRepository {
  async fn find_line(&self, cart_id: &str, product_id: Uuid) -> Result<Option<CartItem>> {
    let line = sqlx::query_as::<_, CartItem>(
      "SELECT item_id, cart_id, product_id, attributes, quantity, added_at \
       FROM shopping_cart WHERE cart_id = $1 AND product_id = $2",
    )
    .bind(cart_id)
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(line)
  }

  async fn insert_line(&self, item: &CartItem) -> Result<()> {
    sqlx::query(
      "INSERT INTO shopping_cart (item_id, cart_id, product_id, attributes, quantity, added_at) \
       VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(item.item_id)
    .bind(&item.cart_id)
    .bind(item.product_id)
    .bind(&item.attributes)
    .bind(item.quantity)
    .bind(item.added_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn set_quantity(&self, item_id: Uuid, quantity: i32) -> Result<Option<CartItem>> {
    let updated = sqlx::query_as::<_, CartItem>(
      "UPDATE shopping_cart SET quantity = $2 WHERE item_id = $1 \
       RETURNING item_id, cart_id, product_id, attributes, quantity, added_at",
    )
    .bind(item_id)
    .bind(quantity)
    .fetch_optional(&self.pool)
    .await?;
    Ok(updated)
  }

  async fn product_exists(&self, product_id: Uuid) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM product WHERE product_id = $1)")
      .bind(product_id)
      .fetch_one(&self.pool)
      .await?;
    Ok(exists)
  }

  async fn list_lines(&self, cart_id: &str) -> Result<Vec<CartItemWithProduct>> {
    let lines = sqlx::query_as::<_, CartItemWithProduct>(
      "SELECT sc.item_id, sc.cart_id, sc.product_id, p.name, p.image, \
              p.price, p.discounted_price, sc.attributes, sc.quantity \
       FROM shopping_cart sc \
       JOIN product p ON p.product_id = sc.product_id \
       WHERE sc.cart_id = $1 \
       ORDER BY sc.added_at",
    )
    .bind(cart_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(lines)
  }

  async fn delete_line(&self, item_id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM shopping_cart WHERE item_id = $1")
      .bind(item_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }

  async fn delete_cart(&self, cart_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM shopping_cart WHERE cart_id = $1")
      .bind(cart_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected())
  }
}

#[derive(Clone)]
pub struct CartService {
  repo: Arc<dyn CartRepository>,
}

impl CartService {
  pub fn new(repo: Arc<dyn CartRepository>) -> Self {
    Self { repo }
  }

  /// Random opaque cart identifier offered to clients that want one.
  pub fn generate_cart_id() -> String {
    Uuid::new_v4().simple().to_string()
  }

  /// Add a product to a cart. Adding a product already in the cart
  /// accumulates quantity on the existing line rather than duplicating it.
  ///
  /// The find-then-write sequence is not atomic across concurrent callers;
  /// last write wins, an accepted race for cart contents.
  #[instrument(name = "cart::add_item", skip(self, attributes))]
  pub async fn add_item(
    &self,
    cart_id: &str,
    product_id: Uuid,
    attributes: String,
    quantity: i32,
  ) -> Result<CartItem> {
    validate_quantity(quantity)?;

    if !self.repo.product_exists(product_id).await? {
      return Err(AppError::not_found(format!(
        "Product with id {} does not exist",
        product_id
      )));
    }

    if let Some(existing) = self.repo.find_line(cart_id, product_id).await? {
      let merged = self
        .repo
        .set_quantity(existing.item_id, existing.quantity + quantity)
        .await?
        .ok_or_else(|| {
          // Line vanished between find and update; treat as the not-found it is.
          AppError::not_found(format!("Cart item with id {} does not exist", existing.item_id))
        })?;
      info!(item_id = %merged.item_id, quantity = merged.quantity, "Merged quantity onto existing cart line.");
      return Ok(merged);
    }

    let item = CartItem {
      item_id: Uuid::new_v4(),
      cart_id: cart_id.to_string(),
      product_id,
      attributes,
      quantity,
      added_at: Utc::now(),
    };
    self.repo.insert_line(&item).await?;
    info!(item_id = %item.item_id, "Inserted new cart line.");
    Ok(item)
  }

  /// Cart display: every line joined with its current product snapshot and a
  /// subtotal computed through the pricing engine, rounded for display.
  #[instrument(name = "cart::get_cart", skip(self))]
  pub async fn get_cart(&self, cart_id: &str) -> Result<Vec<CartLineView>> {
    let lines = self.repo.list_lines(cart_id).await?;
    Ok(lines.into_iter().map(to_line_view).collect())
  }

  #[instrument(name = "cart::update_quantity", skip(self))]
  pub async fn update_quantity(&self, item_id: Uuid, quantity: i32) -> Result<CartItem> {
    validate_quantity(quantity)?;
    self.repo.set_quantity(item_id, quantity).await?.ok_or_else(|| {
      AppError::not_found(format!("Cart item with id {} does not exist", item_id))
    })
  }

  /// Delete one line; reports the number of rows removed (0 or 1).
  #[instrument(name = "cart::remove_item", skip(self))]
  pub async fn remove_item(&self, item_id: Uuid) -> Result<u64> {
    self.repo.delete_line(item_id).await
  }

  /// Delete every line for a cart. Zero affected rows is reported as
  /// `NotFound`: the cart never existed or was already empty.
  #[instrument(name = "cart::empty_cart", skip(self))]
  pub async fn empty_cart(&self, cart_id: &str) -> Result<()> {
    let removed = self.repo.delete_cart(cart_id).await?;
    if removed == 0 {
      return Err(AppError::not_found(format!("cart_id {} does not exist", cart_id)));
    }
    info!(removed, "Emptied cart.");
    Ok(())
  }
}

fn validate_quantity(quantity: i32) -> Result<()> {
  if quantity <= 0 {
    return Err(AppError::validation(
      "CRT_01",
      "quantity",
      "Quantity must be a positive integer.",
    ));
  }
  Ok(())
}

fn to_line_view(line: CartItemWithProduct) -> CartLineView {
  let unit = pricing::unit_cost(line.price, line.discounted_price);
  let subtotal = pricing::display_amount(unit * rust_decimal::Decimal::from(line.quantity));
  CartLineView {
    item_id: line.item_id,
    cart_id: line.cart_id,
    name: line.name,
    attributes: line.attributes,
    product_id: line.product_id,
    image: line.image,
    price: line.price,
    discounted_price: line.discounted_price,
    quantity: line.quantity,
    subtotal,
  }
}
