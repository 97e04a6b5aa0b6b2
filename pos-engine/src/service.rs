//! OrderService - the orchestrator
//!
//! Composes the authoritative order store, the catalog and role-policy
//! seams, payment settlement, the state machine, and the cash-session
//! ledger:
//!
//! ```text
//! submit_cart(cart)
//!     ├─ 1. Shape checks (non-empty, type-conditioned fields)
//!     ├─ 2. Server-side re-validation of every line against the catalog
//!     ├─ 3. Total computed once (line totals + delivery fee)
//!     └─ 4. Order created in NEW and inserted into the store
//!
//! settle(order_id, payments, scope)
//!     ├─ 1. Verify an OPEN cash session for the scope
//!     ├─ 2. Confirm settlement (atomic, pure)
//!     ├─ 3. Fold the settled order into the session ledger (reversible)
//!     └─ 4. Compare-and-swap write at the caller's version; a conflict
//!            rolls the fold back
//! ```
//!
//! Transitions and settlement require the store's per-order atomicity: the
//! caller passes the version it read, and a conflict surfaces as
//! `ConcurrentModification` - re-read and retry.

use crate::catalog::Catalog;
use crate::codes::OrderCodeGenerator;
use crate::policy::TransitionPolicy;
use crate::session::SessionLedger;
use crate::settlement::{self, SettlementOutcome};
use crate::state_machine;
use crate::store::{OrderStore, VersionedOrder};
use shared::cart::{Cart, CartLineItem, modifier};
use shared::error::{PosError, PosResult};
use shared::models::cash_session::CashSession;
use shared::models::order::{Order, OrderStatus, OrderType, Payment};
use shared::models::product::ProductSnapshot;
use shared::money::Money;
use std::sync::Arc;

/// Service layer over one authoritative order store
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    catalog: Arc<dyn Catalog>,
    policy: Arc<dyn TransitionPolicy>,
    sessions: SessionLedger,
    codes: OrderCodeGenerator,
}

impl OrderService {
    pub fn new(
        store: Arc<dyn OrderStore>,
        catalog: Arc<dyn Catalog>,
        policy: Arc<dyn TransitionPolicy>,
    ) -> Self {
        Self {
            store,
            catalog,
            policy,
            sessions: SessionLedger::new(),
            codes: OrderCodeGenerator::new(),
        }
    }

    // ========== Orders ==========

    /// Submit a client-composed cart as a new order in NEW status
    ///
    /// Every line is re-validated server-side against a fresh catalog
    /// snapshot even if a client already validated - cart state may be
    /// tampered with or stale. The total is computed exactly once here and
    /// never recomputed from mutable state afterward.
    pub async fn submit_cart(
        &self,
        cart: &Cart,
        order_type: OrderType,
        delivery_fee: Option<Money>,
        table_ref: Option<String>,
    ) -> PosResult<VersionedOrder> {
        if cart.is_empty() {
            return Err(PosError::EmptyCart);
        }
        if delivery_fee.is_some() && order_type != OrderType::Delivery {
            return Err(PosError::DeliveryFeeNotAllowed { order_type });
        }
        if table_ref.is_some() && order_type != OrderType::DineIn {
            return Err(PosError::TableRefNotAllowed { order_type });
        }

        for line in cart.lines() {
            let product = self.catalog.product(&line.product_id).await?;
            validate_line_against_catalog(line, &product)?;
        }

        let mut total = cart.subtotal()?;
        if order_type == OrderType::Delivery {
            if let Some(fee) = delivery_fee {
                if fee.is_negative() {
                    return Err(PosError::InvalidPrice(format!(
                        "delivery fee must be non-negative, got {}",
                        fee
                    )));
                }
                total = total.add(fee)?;
            }
        }

        let code = self.codes.next();
        let order = Order::new(
            code,
            order_type,
            cart.lines().to_vec(),
            delivery_fee,
            table_ref,
            total,
        );

        let versioned = self.store.insert(order).await?;
        tracing::info!(
            order_id = %versioned.order.id,
            code = %versioned.order.code,
            order_type = %order_type,
            total = %versioned.order.total,
            lines = versioned.order.line_items.len(),
            "order submitted"
        );
        Ok(versioned)
    }

    /// Request a status transition on behalf of a role
    ///
    /// Role allow/deny is the identity collaborator's call; this service
    /// enforces only type/state validity, then compare-and-swap writes at
    /// the version the caller read.
    pub async fn transition(
        &self,
        order_id: &str,
        target: OrderStatus,
        acting_role: &str,
        expected_version: u64,
    ) -> PosResult<VersionedOrder> {
        self.policy.authorize(acting_role, order_id, target).await?;

        let mut current = self.store.get(order_id).await?;
        let from = current.order.status;
        state_machine::transition(&mut current.order, target)?;

        let updated = self.store.update(current.order, expected_version).await?;
        tracing::info!(
            order_id = %order_id,
            from = %from,
            to = %target,
            role = %acting_role,
            "order transitioned"
        );
        Ok(updated)
    }

    /// Settle an order against the scope's open cash session
    ///
    /// Fails without persisting anything when the session is not open, the
    /// currencies do not match, the payments do not cover the total, or the
    /// caller's version is stale. The session fold happens BEFORE the store
    /// write: the in-memory fold is reversible, the committed write is not,
    /// so a stale-version conflict rolls the fold back and no path leaves
    /// the order settled outside a session.
    pub async fn settle(
        &self,
        order_id: &str,
        payments: Vec<Payment>,
        session_scope: &str,
        expected_version: u64,
    ) -> PosResult<(VersionedOrder, SettlementOutcome)> {
        // A completed sale against a closed session is a configuration
        // fault; reject before touching the order.
        if !self
            .sessions
            .current(session_scope)
            .is_some_and(|s| s.is_open())
        {
            return Err(PosError::SessionNotOpen {
                scope: session_scope.to_string(),
            });
        }

        let mut current = self.store.get(order_id).await?;
        if current.order.status.is_terminal() {
            return Err(PosError::OrderClosed {
                status: current.order.status,
            });
        }

        let outcome = settlement::confirm(&mut current.order, payments)?;

        // The fold re-checks the session under its entry lock and mutates
        // nothing on error, so a close or currency mismatch surfaces here
        // with the store still untouched.
        let order = current.order;
        self.sessions.record_settled_order(session_scope, &order)?;

        let updated = match self.store.update(order.clone(), expected_version).await {
            Ok(updated) => updated,
            Err(err) => {
                if let Err(rollback_err) =
                    self.sessions.roll_back_settled_order(session_scope, &order)
                {
                    tracing::error!(
                        order_id = %order.id,
                        scope = %session_scope,
                        error = %rollback_err,
                        "failed to roll settlement back out of cash session"
                    );
                }
                return Err(err);
            }
        };

        tracing::info!(
            order_id = %order_id,
            scope = %session_scope,
            total = %updated.order.total,
            change_due = %outcome.change_due,
            "order settled"
        );
        Ok((updated, outcome))
    }

    /// Read one order with its version (poll-style, the store is the source
    /// of truth)
    pub async fn order(&self, order_id: &str) -> PosResult<VersionedOrder> {
        self.store.get(order_id).await
    }

    /// All non-terminal orders, for status-board polling
    pub async fn active_orders(&self) -> PosResult<Vec<VersionedOrder>> {
        self.store.list_active().await
    }

    // ========== Cash sessions ==========

    pub fn open_session(&self, scope: &str, opening_balance: Money) -> PosResult<CashSession> {
        self.sessions.open(scope, opening_balance)
    }

    pub fn close_session(
        &self,
        scope: &str,
        counted_cash: Option<Money>,
    ) -> PosResult<CashSession> {
        self.sessions.close(scope, counted_cash)
    }

    pub fn current_session(&self, scope: &str) -> Option<CashSession> {
        self.sessions.current(scope)
    }

    pub fn expected_balance(&self, scope: &str) -> PosResult<Money> {
        self.sessions.expected_balance(scope)
    }

    /// Direct access to the ledger, for reporting adapters
    pub fn sessions(&self) -> &SessionLedger {
        &self.sessions
    }
}

/// Server-side re-validation of one cart line against a fresh catalog
/// snapshot
///
/// Checks that every selected option belongs to one of the product's
/// groups, that per-group selection counts respect `max_options`, and that
/// every required group meets its `min_options`. Prices are intentionally
/// NOT re-read from the catalog: the line's snapshots are authoritative for
/// an in-progress cart.
fn validate_line_against_catalog(
    line: &CartLineItem,
    product: &ProductSnapshot,
) -> PosResult<()> {
    for group in &product.option_groups {
        group.validate_definition()?;
    }

    for option in &line.selected_options {
        let belongs = product
            .option_groups
            .iter()
            .any(|g| g.find_option(&option.id).is_some());
        if !belongs {
            return Err(PosError::UnknownOption {
                product_id: product.id.clone(),
                option_id: option.id.clone(),
            });
        }
    }

    for group in &product.option_groups {
        let selected = line
            .selected_options
            .iter()
            .filter(|o| group.find_option(&o.id).is_some())
            .count();
        if selected > group.max_options as usize {
            return Err(PosError::TooManySelections {
                group_id: group.id.clone(),
                selected,
                max_options: group.max_options,
            });
        }
        modifier::validate_selection(group, selected)?;
    }

    Ok(())
}
