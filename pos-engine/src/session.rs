//! Cash session ledger - scope-keyed open/close accounting
//!
//! At most one OPEN session per scope at any time. Open/close for a scope is
//! the one operation needing scope-wide (not per-order) atomicity; the
//! `DashMap` entry lock serializes it. The scope key (terminal or shift id)
//! is passed into every operation - there is no ambient "current session".
//!
//! Only CASH payments move the expected drawer balance; other methods are
//! accumulated per method for reporting. Change handed back to the customer
//! is deducted from the cash fold so it is never double-counted as revenue.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use shared::error::{PosError, PosResult};
use shared::models::cash_session::{CashSession, SessionStatus};
use shared::models::order::{Order, PaymentMethod};
use shared::money::Money;

/// In-process ledger of cash sessions, keyed by terminal/shift scope
#[derive(Debug, Default)]
pub struct SessionLedger {
    /// Latest session per scope (OPEN, or CLOSED until the next open)
    sessions: DashMap<String, CashSession>,
    /// Closed sessions retained for reporting, keyed by session id
    closed: DashMap<String, CashSession>,
}

impl SessionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for a scope
    ///
    /// Fails with `SessionAlreadyOpen` when an OPEN session already exists
    /// for that scope. A previous CLOSED session is superseded.
    pub fn open(&self, scope: &str, opening_balance: Money) -> PosResult<CashSession> {
        let session = match self.sessions.entry(scope.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_open() {
                    return Err(PosError::SessionAlreadyOpen {
                        scope: scope.to_string(),
                    });
                }
                let session = CashSession::new(scope, opening_balance);
                occupied.insert(session.clone());
                session
            }
            Entry::Vacant(vacant) => {
                let session = CashSession::new(scope, opening_balance);
                vacant.insert(session.clone());
                session
            }
        };

        tracing::info!(
            scope = %scope,
            session_id = %session.id,
            opening_balance = %opening_balance,
            "cash session opened"
        );
        Ok(session)
    }

    /// Fold a settled order into the scope's OPEN session
    ///
    /// Fails with `SessionNotOpen` when the scope has no session or a CLOSED
    /// one - a completed sale against a closed session is a configuration
    /// fault that must reach the operator, never be dropped. On any error
    /// the session is untouched.
    pub fn record_settled_order(&self, scope: &str, order: &Order) -> PosResult<()> {
        let mut entry = self
            .sessions
            .get_mut(scope)
            .filter(|s| s.is_open())
            .ok_or_else(|| PosError::SessionNotOpen {
                scope: scope.to_string(),
            })?;

        let currency = order.total.currency();
        let cash_gross = order.cash_total()?;
        let paid = order.paid_total()?;
        // Cash excess handed back as change is not revenue
        let overpaid = paid.sub(order.total)?.max_zero();
        let change = overpaid.min(cash_gross)?;
        let cash_net = cash_gross.sub(change)?;

        // Compute every new value before mutating, so a currency mismatch or
        // overflow leaves the session untouched.
        let new_cash_total = entry.cash_total.add(cash_net)?;
        let mut new_method_totals = entry.method_totals.clone();
        for payment in &order.payments {
            let current = new_method_totals
                .get(&payment.method)
                .copied()
                .unwrap_or_else(|| Money::zero(currency));
            new_method_totals.insert(payment.method, current.add(payment.amount)?);
        }
        if change.is_positive() {
            // Deduct change from the cash bucket once; change is capped by
            // the cash aggregate, so the bucket cannot go negative
            let cash_bucket = new_method_totals
                .get(&PaymentMethod::Cash)
                .copied()
                .unwrap_or_else(|| Money::zero(currency));
            new_method_totals.insert(PaymentMethod::Cash, cash_bucket.sub(change)?);
        }

        entry.cash_total = new_cash_total;
        entry.method_totals = new_method_totals;
        entry.settled_orders.push(order.id.clone());

        tracing::info!(
            scope = %scope,
            order_id = %order.id,
            cash = %cash_net,
            "settled order recorded into cash session"
        );
        Ok(())
    }

    /// Reverse a fold made by `record_settled_order`
    ///
    /// Compensation for a store write that failed after the fold. Subtracts
    /// exactly what the record added, so the arithmetic cannot fail in new
    /// ways; the session ends up as if the order was never recorded.
    pub fn roll_back_settled_order(&self, scope: &str, order: &Order) -> PosResult<()> {
        let mut entry = self
            .sessions
            .get_mut(scope)
            .ok_or_else(|| PosError::SessionNotOpen {
                scope: scope.to_string(),
            })?;

        let currency = order.total.currency();
        let cash_gross = order.cash_total()?;
        let paid = order.paid_total()?;
        let overpaid = paid.sub(order.total)?.max_zero();
        let change = overpaid.min(cash_gross)?;
        let cash_net = cash_gross.sub(change)?;

        entry.cash_total = entry.cash_total.sub(cash_net)?;
        for payment in &order.payments {
            let current = entry
                .method_totals
                .get(&payment.method)
                .copied()
                .unwrap_or_else(|| Money::zero(currency));
            entry
                .method_totals
                .insert(payment.method, current.sub(payment.amount)?);
        }
        if change.is_positive() {
            let cash_bucket = entry
                .method_totals
                .get(&PaymentMethod::Cash)
                .copied()
                .unwrap_or_else(|| Money::zero(currency));
            entry
                .method_totals
                .insert(PaymentMethod::Cash, cash_bucket.add(change)?);
        }
        if let Some(pos) = entry.settled_orders.iter().rposition(|id| *id == order.id) {
            entry.settled_orders.remove(pos);
        }

        tracing::warn!(
            scope = %scope,
            order_id = %order.id,
            "settled order rolled back out of cash session"
        );
        Ok(())
    }

    /// Close the scope's OPEN session, freezing `closed_at` and the expected
    /// balance; computes the cash variance when a count is supplied
    pub fn close(&self, scope: &str, counted_cash: Option<Money>) -> PosResult<CashSession> {
        let mut entry =
            self.sessions
                .get_mut(scope)
                .ok_or_else(|| PosError::SessionNotOpen {
                    scope: scope.to_string(),
                })?;

        if !entry.is_open() {
            return Err(PosError::SessionAlreadyClosed {
                scope: scope.to_string(),
            });
        }

        let expected = entry.expected_balance()?;
        let variance = match counted_cash {
            Some(counted) => Some(counted.sub(expected)?),
            None => None,
        };

        entry.status = SessionStatus::Closed;
        entry.closed_at = Some(chrono::Utc::now().timestamp_millis());
        entry.counted_cash = counted_cash;
        entry.variance = variance;

        let closed = entry.clone();
        drop(entry);
        self.closed.insert(closed.id.clone(), closed.clone());

        tracing::info!(
            scope = %scope,
            session_id = %closed.id,
            expected = %expected,
            variance = ?closed.variance.map(|v| v.format()),
            "cash session closed"
        );
        Ok(closed)
    }

    /// Latest session for a scope, open or closed
    pub fn current(&self, scope: &str) -> Option<CashSession> {
        self.sessions.get(scope).map(|s| s.clone())
    }

    /// Expected drawer balance of the scope's OPEN session
    pub fn expected_balance(&self, scope: &str) -> PosResult<Money> {
        self.sessions
            .get(scope)
            .filter(|s| s.is_open())
            .ok_or_else(|| PosError::SessionNotOpen {
                scope: scope.to_string(),
            })?
            .expected_balance()
    }

    /// A closed session by id, for reporting reads
    pub fn closed_session(&self, session_id: &str) -> Option<CashSession> {
        self.closed.get(session_id).map(|s| s.clone())
    }
}
