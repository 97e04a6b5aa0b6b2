//! Unified error system for the POS core
//!
//! Every fallible operation in the workspace returns [`PosError`]. Errors are
//! classified by [`ErrorCategory`] so adapters can decide how to surface them:
//!
//! - `Validation`: malformed input, rejected before any mutation, safe to
//!   retry after correction
//! - `State`: caller/workflow logic fault, surfaced to the operator
//! - `Concurrency`: transient conflict, re-read and retry
//! - `Settlement`: expected business condition, prompt for more payment
//!
//! Messages carry the concrete numbers operators act on (remaining amount,
//! selection counts, from/to states) rather than generic failure text.

use crate::models::order::{OrderStatus, OrderType};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error classification by handling strategy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Malformed input - rejected before mutation, retry after correction
    Validation,
    /// Workflow logic fault - surfaced to operator, not auto-retried
    State,
    /// Transient conflict - re-read current state and retry
    Concurrency,
    /// Recoverable business condition - not a bug
    Settlement,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::State => "STATE",
            Self::Concurrency => "CONCURRENCY",
            Self::Settlement => "SETTLEMENT",
        }
    }

    /// Whether the caller may retry the operation unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Concurrency)
    }
}

/// Unified error type for the POS core
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PosError {
    // ========== Validation ==========
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    #[error("amount overflows minor-unit range")]
    AmountOverflow,

    #[error("payment amount must be positive")]
    InvalidAmount,

    #[error("quantity must be between 1 and {max}, got {got}")]
    InvalidQuantity { got: i64, max: i64 },

    #[error("unit price out of range: {0}")]
    InvalidPrice(String),

    #[error("invalid option group '{group_id}': {reason}")]
    InvalidGroupDefinition { group_id: String, reason: String },

    #[error("option '{option_id}' does not belong to group '{group_id}'")]
    OptionNotInGroup {
        group_id: String,
        option_id: String,
    },

    #[error("option '{option_id}' does not belong to any group of product '{product_id}'")]
    UnknownOption {
        product_id: String,
        option_id: String,
    },

    #[error("group '{group_id}' allows at most {max_options} selection(s), got {selected}")]
    TooManySelections {
        group_id: String,
        selected: usize,
        max_options: u32,
    },

    #[error(
        "group '{group_name}' requires at least {min_options} selection(s), got {selected}"
    )]
    MissingRequiredSelection {
        group_id: String,
        group_name: String,
        selected: usize,
        min_options: u32,
    },

    #[error("cart is empty")]
    EmptyCart,

    #[error("no cart line at index {index}")]
    LineNotFound { index: usize },

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("delivery fee is only valid for DELIVERY orders, got {order_type}")]
    DeliveryFeeNotAllowed { order_type: OrderType },

    #[error("table reference is only valid for DINE_IN orders, got {order_type}")]
    TableRefNotAllowed { order_type: OrderType },

    // ========== State ==========
    #[error("invalid transition {from} -> {to} for {order_type} order")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
        order_type: OrderType,
    },

    #[error("role '{role}' is not allowed to request transition to {to}")]
    TransitionDenied { role: String, to: OrderStatus },

    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("order already settled: {0}")]
    AlreadySettled(String),

    #[error("order is {status}, settlement is no longer possible")]
    OrderClosed { status: OrderStatus },

    #[error("cash session already open for scope '{scope}'")]
    SessionAlreadyOpen { scope: String },

    #[error("no open cash session for scope '{scope}'")]
    SessionNotOpen { scope: String },

    #[error("cash session already closed for scope '{scope}'")]
    SessionAlreadyClosed { scope: String },

    // ========== Concurrency ==========
    #[error("concurrent modification of order {order_id}, re-read and retry")]
    ConcurrentModification { order_id: String },

    // ========== Settlement ==========
    #[error("insufficient payment: {remaining} remaining")]
    InsufficientPayment { remaining: Money },
}

impl PosError {
    /// Classify this error for transport/retry decisions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CurrencyMismatch { .. }
            | Self::AmountOverflow
            | Self::InvalidAmount
            | Self::InvalidQuantity { .. }
            | Self::InvalidPrice(_)
            | Self::InvalidGroupDefinition { .. }
            | Self::OptionNotInGroup { .. }
            | Self::UnknownOption { .. }
            | Self::TooManySelections { .. }
            | Self::MissingRequiredSelection { .. }
            | Self::EmptyCart
            | Self::LineNotFound { .. }
            | Self::ProductNotFound(_)
            | Self::DeliveryFeeNotAllowed { .. }
            | Self::TableRefNotAllowed { .. } => ErrorCategory::Validation,

            Self::InvalidTransition { .. }
            | Self::TransitionDenied { .. }
            | Self::OrderNotFound(_)
            | Self::AlreadySettled(_)
            | Self::OrderClosed { .. }
            | Self::SessionAlreadyOpen { .. }
            | Self::SessionNotOpen { .. }
            | Self::SessionAlreadyClosed { .. } => ErrorCategory::State,

            Self::ConcurrentModification { .. } => ErrorCategory::Concurrency,

            Self::InsufficientPayment { .. } => ErrorCategory::Settlement,
        }
    }
}

/// Result type for POS core operations
pub type PosResult<T> = Result<T, PosError>;
