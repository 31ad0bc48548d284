//! Pricing engine: the one place discount precedence exists.
//!
//! Both the cart display path and the order assembler price through these
//! functions; they must never diverge. Pure over their inputs, no I/O.

use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// A cart line joined with the catalog fields pricing needs.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
  pub product_id: Uuid,
  pub product_name: String,
  pub attributes: String,
  pub quantity: i32,
  pub price: Decimal,
  pub discounted_price: Decimal,
}

/// Derived, non-persistent priced line. `unit_cost` and `line_subtotal` are
/// computed fresh from live catalog data, never trusted from client input.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
  pub product_id: Uuid,
  pub product_name: String,
  pub attributes: String,
  pub quantity: i32,
  pub unit_cost: Decimal,
  pub line_subtotal: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedCart {
  pub lines: Vec<PricedLine>,
  /// Exact decimal sum of line subtotals; no aggregate rounding.
  pub total_amount: Decimal,
}

/// Discount precedence: the discounted price wins when it is a positive
/// value, otherwise the list price applies.
pub fn unit_cost(price: Decimal, discounted_price: Decimal) -> Decimal {
  if discounted_price > Decimal::ZERO {
    discounted_price
  } else {
    price
  }
}

pub fn price_line(line: &CartLine) -> PricedLine {
  let unit = unit_cost(line.price, line.discounted_price);
  PricedLine {
    product_id: line.product_id,
    product_name: line.product_name.clone(),
    attributes: line.attributes.clone(),
    quantity: line.quantity,
    unit_cost: unit,
    line_subtotal: unit * Decimal::from(line.quantity),
  }
}

pub fn price_cart(lines: &[CartLine]) -> PricedCart {
  let lines: Vec<PricedLine> = lines.iter().map(price_line).collect();
  let total_amount = lines.iter().map(|l| l.line_subtotal).sum();
  PricedCart { lines, total_amount }
}

/// 2-decimal rounding used for display subtotals only.
pub fn display_amount(amount: Decimal) -> Decimal {
  amount.round_dp(2)
}
