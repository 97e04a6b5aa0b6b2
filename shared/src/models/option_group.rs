//! Option group model - add-on selection rules for a product
//!
//! Definitions come from the catalog collaborator; the core only ever stores
//! snapshots of them inside carts and orders.

use crate::error::{PosError, PosResult};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Selection cardinality for a group
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionType {
    /// At most one option selected at a time
    Single,
    /// Up to `max_options` selected
    Multiple,
}

/// A single selectable add-on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionItem {
    pub id: String,
    pub name: String,
    /// Price adjustment applied per unit when selected (may be negative)
    pub price_delta: Money,
}

/// A named set of add-ons with selection cardinality rules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionGroup {
    pub id: String,
    pub name: String,
    pub selection_type: SelectionType,
    pub is_required: bool,
    pub min_options: u32,
    pub max_options: u32,
    pub options: Vec<OptionItem>,
}

impl OptionGroup {
    /// Check the structural invariants of the definition itself
    ///
    /// - `0 <= min_options <= max_options`
    /// - `is_required` implies `min_options >= 1`
    /// - `SINGLE` implies `max_options == 1`
    pub fn validate_definition(&self) -> PosResult<()> {
        if self.min_options > self.max_options {
            return Err(PosError::InvalidGroupDefinition {
                group_id: self.id.clone(),
                reason: format!(
                    "min_options ({}) exceeds max_options ({})",
                    self.min_options, self.max_options
                ),
            });
        }
        if self.is_required && self.min_options < 1 {
            return Err(PosError::InvalidGroupDefinition {
                group_id: self.id.clone(),
                reason: "required group must have min_options >= 1".to_string(),
            });
        }
        if self.selection_type == SelectionType::Single && self.max_options != 1 {
            return Err(PosError::InvalidGroupDefinition {
                group_id: self.id.clone(),
                reason: format!(
                    "SINGLE group must have max_options = 1, got {}",
                    self.max_options
                ),
            });
        }
        Ok(())
    }

    /// Look up an option by id
    pub fn find_option(&self, option_id: &str) -> Option<&OptionItem> {
        self.options.iter().find(|o| o.id == option_id)
    }
}
