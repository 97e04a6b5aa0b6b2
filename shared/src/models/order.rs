//! Order model - a submitted cart moving through the fulfillment lifecycle

use crate::cart::CartLineItem;
use crate::error::PosResult;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the order will be fulfilled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Delivery,
    Pickup,
    DineIn,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivery => write!(f, "DELIVERY"),
            Self::Pickup => write!(f, "PICKUP"),
            Self::DineIn => write!(f, "DINE_IN"),
        }
    }
}

/// Lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    New,
    InPreparation,
    Ready,
    OutForDelivery,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "NEW"),
            Self::InPreparation => write!(f, "IN_PREPARATION"),
            Self::Ready => write!(f, "READY"),
            Self::OutForDelivery => write!(f, "OUT_FOR_DELIVERY"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Payment instrument
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Pix,
    MealVoucher,
}

impl PaymentMethod {
    /// Only cash produces change and counts toward the drawer balance
    pub fn is_cash(&self) -> bool {
        matches!(self, Self::Cash)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "CASH"),
            Self::CreditCard => write!(f, "CREDIT_CARD"),
            Self::DebitCard => write!(f, "DEBIT_CARD"),
            Self::Pix => write!(f, "PIX"),
            Self::MealVoucher => write!(f, "MEAL_VOUCHER"),
        }
    }
}

/// One payment entry against an order (split payment is a list of these)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: String,
    pub method: PaymentMethod,
    pub amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Unix milliseconds, set when the payment entry is created
    pub recorded_at: i64,
}

impl Payment {
    pub fn new(method: PaymentMethod, amount: Money) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            method,
            amount,
            note: None,
            recorded_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Append-only status history entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusChange {
    pub status: OrderStatus,
    /// Unix milliseconds
    pub at: i64,
}

/// A submitted order
///
/// `total` is computed once at submission from line-item snapshots and the
/// delivery fee, and is never recomputed from mutable state afterward. Later
/// line edits require a new order or an explicit amendment operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    /// Human-readable unique code, e.g. `ORD20260830-1001`
    pub code: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub line_items: Vec<CartLineItem>,
    /// Present only on DELIVERY orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_fee: Option<Money>,
    /// Present only on DINE_IN orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_ref: Option<String>,
    /// Derived at submission, immutable afterwards
    pub total: Money,
    pub payments: Vec<Payment>,
    /// Unix milliseconds
    pub created_at: i64,
    pub status_history: Vec<StatusChange>,
}

impl Order {
    /// Create a new order in NEW status with seeded history
    pub fn new(
        code: String,
        order_type: OrderType,
        line_items: Vec<CartLineItem>,
        delivery_fee: Option<Money>,
        table_ref: Option<String>,
        total: Money,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code,
            order_type,
            status: OrderStatus::New,
            line_items,
            delivery_fee,
            table_ref,
            total,
            payments: Vec::new(),
            created_at: now,
            status_history: vec![StatusChange {
                status: OrderStatus::New,
                at: now,
            }],
        }
    }

    /// Sum of all attached payment entries
    pub fn paid_total(&self) -> PosResult<Money> {
        let mut total = Money::zero(self.total.currency());
        for payment in &self.payments {
            total = total.add(payment.amount)?;
        }
        Ok(total)
    }

    /// Sum of attached CASH payment entries only
    pub fn cash_total(&self) -> PosResult<Money> {
        let mut total = Money::zero(self.total.currency());
        for payment in self.payments.iter().filter(|p| p.method.is_cash()) {
            total = total.add(payment.amount)?;
        }
        Ok(total)
    }

    /// Settlement is one-shot: an order with attached payments is settled
    pub fn is_settled(&self) -> bool {
        !self.payments.is_empty()
    }
}
