//! Catalog reads. The checkout path does not go through here; it reads
//! product rows inside its own unit of work.

use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::Product;

const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
  pub current_page: i64,
  pub current_page_size: i64,
  pub total_pages: i64,
  pub count: i64,
  pub rows: Vec<Product>,
}

const PRODUCT_COLUMNS: &str = "product_id, name, description, price, discounted_price, \
       image, thumbnail, created_at, updated_at";

#[derive(Clone)]
pub struct ProductService {
  pool: PgPool,
}

impl ProductService {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  #[instrument(name = "products::list", skip(self))]
  pub async fn list(&self, page: Option<i64>, limit: Option<i64>) -> Result<ProductPage> {
    let page = page.filter(|p| *p > 0).unwrap_or(1);
    let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_PAGE_SIZE);
    let offset = (page - 1) * limit;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
      .fetch_one(&self.pool)
      .await?;

    let rows = sqlx::query_as::<_, Product>(&format!(
      "SELECT {} FROM product ORDER BY name ASC LIMIT $1 OFFSET $2",
      PRODUCT_COLUMNS
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(&self.pool)
    .await?;

    Ok(ProductPage {
      current_page: page,
      current_page_size: limit,
      total_pages: (count + limit - 1) / limit,
      count,
      rows,
    })
  }

  #[instrument(name = "products::get", skip(self))]
  pub async fn get(&self, product_id: Uuid) -> Result<Product> {
    sqlx::query_as::<_, Product>(&format!(
      "SELECT {} FROM product WHERE product_id = $1",
      PRODUCT_COLUMNS
    ))
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await?
    .ok_or_else(|| AppError::not_found(format!("Product with id {} does not exist", product_id)))
  }
}
