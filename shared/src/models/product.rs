//! Product snapshot - the value handed over by the catalog collaborator
//!
//! The core never holds a live reference into the catalog. A snapshot is
//! taken at cart-composition time and copied into the line item, so catalog
//! price changes never retroactively alter an in-progress cart or a
//! historical order.

use super::option_group::OptionGroup;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Point-in-time copy of a catalog product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    pub id: String,
    pub name: String,
    /// Base price per unit at snapshot time
    pub unit_price: Money,
    /// Option group definitions attached to this product
    pub option_groups: Vec<OptionGroup>,
}

impl ProductSnapshot {
    /// Look up an option group by id
    pub fn find_group(&self, group_id: &str) -> Option<&OptionGroup> {
        self.option_groups.iter().find(|g| g.id == group_id)
    }
}
