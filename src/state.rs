use crate::config::AppConfig;
use crate::errors::Result;
use crate::services::cart::{CartService, PgCartRepository};
use crate::services::customers::CustomerService;
use crate::services::orders::{OrderService, PgCheckoutStore};
use crate::services::payment::PaymentGateway;
use crate::services::products::ProductService;
use crate::services::token::TokenService;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub config: Arc<AppConfig>,
  pub tokens: TokenService,
  pub carts: CartService,
  pub orders: OrderService,
  pub customers: CustomerService,
  pub products: ProductService,
  pub payments: PaymentGateway,
}

impl AppState {
  pub fn new(db_pool: PgPool, config: Arc<AppConfig>) -> Result<Self> {
    Ok(Self {
      tokens: TokenService::new(&config.jwt_secret),
      carts: CartService::new(Arc::new(PgCartRepository::new(db_pool.clone()))),
      orders: OrderService::new(Arc::new(PgCheckoutStore::new(db_pool.clone()))),
      customers: CustomerService::new(db_pool.clone()),
      products: ProductService::new(db_pool.clone()),
      payments: PaymentGateway::new(&config)?,
      db_pool,
      config,
    })
  }
}
