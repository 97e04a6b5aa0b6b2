//! Client-local cart for a not-yet-submitted order
//!
//! Every line item carries value snapshots (name, unit price, selected
//! options) taken from the catalog at add time. Catalog changes after
//! composition never alter an in-progress cart.

pub mod modifier;

pub use modifier::{ModifierSelector, SelectOutcome};

use crate::error::{PosError, PosResult};
use crate::models::option_group::OptionItem;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Maximum quantity per line
pub const MAX_QUANTITY: i64 = 9_999;
/// Maximum unit price in minor units (1,000,000.00)
pub const MAX_UNIT_PRICE_MINOR: i64 = 100_000_000;

/// One product entry in a cart, with quantity and selected modifiers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    pub product_id: String,
    /// Name snapshot at add time
    pub product_name: String,
    pub quantity: i64,
    /// Price snapshot at add time
    pub unit_price: Money,
    /// Option snapshots at add time
    pub selected_options: Vec<OptionItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CartLineItem {
    /// Build a line after bounds validation
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: i64,
        unit_price: Money,
        selected_options: Vec<OptionItem>,
        notes: Option<String>,
    ) -> PosResult<Self> {
        if quantity < 1 || quantity > MAX_QUANTITY {
            return Err(PosError::InvalidQuantity {
                got: quantity,
                max: MAX_QUANTITY,
            });
        }
        if unit_price.is_negative() {
            return Err(PosError::InvalidPrice(format!(
                "unit price must be non-negative, got {}",
                unit_price
            )));
        }
        if unit_price.amount() > MAX_UNIT_PRICE_MINOR {
            return Err(PosError::InvalidPrice(format!(
                "unit price exceeds maximum allowed, got {}",
                unit_price
            )));
        }
        for option in &selected_options {
            if option.price_delta.amount().abs() > MAX_UNIT_PRICE_MINOR {
                return Err(PosError::InvalidPrice(format!(
                    "option price delta exceeds maximum allowed, got {}",
                    option.price_delta
                )));
            }
        }
        Ok(Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            unit_price,
            selected_options,
            notes,
        })
    }

    /// Per-unit price including option deltas
    pub fn effective_unit_price(&self) -> PosResult<Money> {
        let options =
            modifier::price_contribution(&self.selected_options, self.unit_price.currency())?;
        self.unit_price.add(options)
    }

    /// `(unit_price + sum of option deltas) * quantity`
    pub fn line_total(&self) -> PosResult<Money> {
        self.effective_unit_price()?.scale(self.quantity)
    }
}

/// In-progress collection of line items for one future order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn add_line(&mut self, line: CartLineItem) {
        self.lines.push(line);
    }

    /// Remove a line by position
    pub fn remove_line(&mut self, index: usize) -> Option<CartLineItem> {
        if index < self.lines.len() {
            Some(self.lines.remove(index))
        } else {
            None
        }
    }

    /// Change the quantity of an existing line
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> PosResult<()> {
        if quantity < 1 || quantity > MAX_QUANTITY {
            return Err(PosError::InvalidQuantity {
                got: quantity,
                max: MAX_QUANTITY,
            });
        }
        match self.lines.get_mut(index) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(PosError::LineNotFound { index }),
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals; fails on an empty cart since there is no currency
    /// to denominate zero in
    pub fn subtotal(&self) -> PosResult<Money> {
        let first = self.lines.first().ok_or(PosError::EmptyCart)?;
        let mut total = Money::zero(first.unit_price.currency());
        for line in &self.lines {
            total = total.add(line.line_total()?)?;
        }
        Ok(total)
    }
}
