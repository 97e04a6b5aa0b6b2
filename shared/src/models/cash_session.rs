//! Cash session model - a shift-scoped accumulator of settled sales
//!
//! A session is bound to an explicit scope key (terminal or shift id) passed
//! into every operation, never ambient global state, so multiple terminals
//! run independent sessions safely.

use super::order::PaymentMethod;
use crate::error::PosResult;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Session status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    #[default]
    Open,
    Closed,
}

/// One bounded accounting period for a terminal/shift
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashSession {
    pub id: String,
    /// Terminal or shift identifier this session belongs to
    pub scope: String,
    pub status: SessionStatus,
    /// Unix milliseconds
    pub opened_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
    /// Drawer float counted in at open
    pub opening_balance: Money,
    /// Running total of settled CASH payments
    pub cash_total: Money,
    /// Per-method totals, tracked for reporting only; non-cash methods never
    /// affect the expected drawer balance
    pub method_totals: BTreeMap<PaymentMethod, Money>,
    /// Ids of orders settled against this session
    pub settled_orders: Vec<String>,
    /// Cash counted at close, if a count was performed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counted_cash: Option<Money>,
    /// `counted_cash - expected_balance`, frozen at close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance: Option<Money>,
}

impl CashSession {
    pub fn new(scope: impl Into<String>, opening_balance: Money) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            scope: scope.into(),
            status: SessionStatus::Open,
            opened_at: chrono::Utc::now().timestamp_millis(),
            closed_at: None,
            opening_balance,
            cash_total: Money::zero(opening_balance.currency()),
            method_totals: BTreeMap::new(),
            settled_orders: Vec::new(),
            counted_cash: None,
            variance: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == SessionStatus::Open
    }

    /// `opening_balance + cash_total` (recorded cash withdrawals are an
    /// external concern and already excluded)
    pub fn expected_balance(&self) -> PosResult<Money> {
        self.opening_balance.add(self.cash_total)
    }
}
