//! Shared domain types for the POS order core
//!
//! Pure data and arithmetic with no I/O: money, catalog snapshots, cart and
//! modifier composition, order/payment/cash-session models, and the unified
//! error taxonomy. The service layer lives in the `pos-engine` crate.

pub mod cart;
pub mod error;
pub mod models;
pub mod money;

// Re-exports
pub use cart::{Cart, CartLineItem, ModifierSelector, SelectOutcome};
pub use error::{ErrorCategory, PosError, PosResult};
pub use models::{
    CashSession, OptionGroup, OptionItem, Order, OrderStatus, OrderType, Payment, PaymentMethod,
    ProductSnapshot, SelectionType, SessionStatus, StatusChange,
};
pub use money::{Currency, Money};
