//! Order lifecycle state machine
//!
//! The transition graph is a pure lookup keyed by `(status, order_type)`,
//! not scattered conditionals, so the full graph is inspectable and testable
//! as data:
//!
//! ```text
//! NEW ──> IN_PREPARATION ──> READY ──┬─> OUT_FOR_DELIVERY ──> COMPLETED   (DELIVERY)
//!  │            │                    └─> COMPLETED                        (all types)
//!  └────────────┴── CANCELLED <── OUT_FOR_DELIVERY
//! ```
//!
//! `CANCELLED` is reachable from `NEW`, `IN_PREPARATION` and
//! `OUT_FOR_DELIVERY`. `COMPLETED` and `CANCELLED` are terminal. Callers
//! request a transition by target status; anything outside the allowed set
//! is rejected centrally.

use shared::error::{PosError, PosResult};
use shared::models::order::{Order, OrderStatus, OrderType, StatusChange};

/// Allowed target statuses from `(status, order_type)`
///
/// The only type-conditioned row is `READY`: a DELIVERY order may leave for
/// the road, PICKUP and DINE_IN orders complete directly.
pub fn allowed_targets(status: OrderStatus, order_type: OrderType) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match (status, order_type) {
        (New, _) => &[InPreparation, Cancelled],
        (InPreparation, _) => &[Ready, Cancelled],
        (Ready, OrderType::Delivery) => &[OutForDelivery, Completed],
        (Ready, _) => &[Completed],
        (OutForDelivery, _) => &[Completed, Cancelled],
        (Completed, _) | (Cancelled, _) => &[],
    }
}

/// Whether `from -> to` is valid for the given order type
pub fn can_transition(from: OrderStatus, to: OrderStatus, order_type: OrderType) -> bool {
    allowed_targets(from, order_type).contains(&to)
}

/// Apply a transition to an order
///
/// On success the status is updated and `(status, timestamp)` is appended to
/// the append-only history. On rejection the order is untouched.
///
/// Cancelling an order that already carries payments is legal here; the
/// refund/void of those payments is an external workflow. Payments are never
/// silently removed, so booked history and `total` stay consistent.
pub fn transition(order: &mut Order, target: OrderStatus) -> PosResult<()> {
    if !can_transition(order.status, target, order.order_type) {
        return Err(PosError::InvalidTransition {
            from: order.status,
            to: target,
            order_type: order.order_type,
        });
    }

    if target == OrderStatus::Cancelled && order.is_settled() {
        tracing::warn!(
            order_id = %order.id,
            paid = %order.paid_total().unwrap_or(order.total),
            "cancelling a settled order; refund/void must be handled externally"
        );
    }

    order.status = target;
    order.status_history.push(StatusChange {
        status: target,
        at: chrono::Utc::now().timestamp_millis(),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::money::{Currency, Money};

    fn order(order_type: OrderType) -> Order {
        Order::new(
            "ORD20260830-1001".to_string(),
            order_type,
            Vec::new(),
            None,
            None,
            Money::new(10000, Currency::Brl),
        )
    }

    fn drive(order: &mut Order, path: &[OrderStatus]) {
        for target in path {
            transition(order, *target).unwrap();
        }
    }

    #[test]
    fn test_delivery_full_path() {
        let mut o = order(OrderType::Delivery);
        drive(
            &mut o,
            &[
                OrderStatus::InPreparation,
                OrderStatus::Ready,
                OrderStatus::OutForDelivery,
                OrderStatus::Completed,
            ],
        );
        assert_eq!(o.status, OrderStatus::Completed);
        // NEW seed + 4 transitions
        assert_eq!(o.status_history.len(), 5);
    }

    #[test]
    fn test_dine_in_cannot_go_out_for_delivery() {
        let mut o = order(OrderType::DineIn);
        drive(&mut o, &[OrderStatus::InPreparation, OrderStatus::Ready]);

        let result = transition(&mut o, OrderStatus::OutForDelivery);
        assert!(matches!(
            result,
            Err(PosError::InvalidTransition {
                from: OrderStatus::Ready,
                to: OrderStatus::OutForDelivery,
                order_type: OrderType::DineIn,
            })
        ));
        // Rejection leaves the order untouched
        assert_eq!(o.status, OrderStatus::Ready);
        assert_eq!(o.status_history.len(), 3);
    }

    #[test]
    fn test_delivery_may_go_out_for_delivery_from_ready() {
        let mut o = order(OrderType::Delivery);
        drive(&mut o, &[OrderStatus::InPreparation, OrderStatus::Ready]);
        assert!(transition(&mut o, OrderStatus::OutForDelivery).is_ok());
    }

    #[test]
    fn test_ready_may_complete_directly_for_all_types() {
        for order_type in [OrderType::Delivery, OrderType::Pickup, OrderType::DineIn] {
            let mut o = order(order_type);
            drive(&mut o, &[OrderStatus::InPreparation, OrderStatus::Ready]);
            assert!(transition(&mut o, OrderStatus::Completed).is_ok());
        }
    }

    #[test]
    fn test_cancel_from_allowed_states() {
        let mut o = order(OrderType::Delivery);
        assert!(transition(&mut o, OrderStatus::Cancelled).is_ok());

        let mut o = order(OrderType::Pickup);
        drive(&mut o, &[OrderStatus::InPreparation]);
        assert!(transition(&mut o, OrderStatus::Cancelled).is_ok());

        let mut o = order(OrderType::Delivery);
        drive(
            &mut o,
            &[
                OrderStatus::InPreparation,
                OrderStatus::Ready,
                OrderStatus::OutForDelivery,
            ],
        );
        assert!(transition(&mut o, OrderStatus::Cancelled).is_ok());
    }

    #[test]
    fn test_cancel_from_ready_rejected() {
        let mut o = order(OrderType::Pickup);
        drive(&mut o, &[OrderStatus::InPreparation, OrderStatus::Ready]);
        let result = transition(&mut o, OrderStatus::Cancelled);
        assert!(matches!(result, Err(PosError::InvalidTransition { .. })));
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        let mut o = order(OrderType::Pickup);
        drive(
            &mut o,
            &[
                OrderStatus::InPreparation,
                OrderStatus::Ready,
                OrderStatus::Completed,
            ],
        );

        for target in [
            OrderStatus::New,
            OrderStatus::InPreparation,
            OrderStatus::Ready,
            OrderStatus::OutForDelivery,
            OrderStatus::Cancelled,
        ] {
            assert!(matches!(
                transition(&mut o, target),
                Err(PosError::InvalidTransition { .. })
            ));
        }
        assert!(allowed_targets(OrderStatus::Cancelled, OrderType::Delivery).is_empty());
    }

    #[test]
    fn test_skipping_states_rejected() {
        let mut o = order(OrderType::Pickup);
        let result = transition(&mut o, OrderStatus::Ready);
        assert!(matches!(result, Err(PosError::InvalidTransition { .. })));
        let result = transition(&mut o, OrderStatus::Completed);
        assert!(matches!(result, Err(PosError::InvalidTransition { .. })));
    }

    #[test]
    fn test_history_is_append_only_and_ordered() {
        let mut o = order(OrderType::Pickup);
        drive(
            &mut o,
            &[
                OrderStatus::InPreparation,
                OrderStatus::Ready,
                OrderStatus::Completed,
            ],
        );

        let statuses: Vec<OrderStatus> = o.status_history.iter().map(|h| h.status).collect();
        assert_eq!(
            statuses,
            vec![
                OrderStatus::New,
                OrderStatus::InPreparation,
                OrderStatus::Ready,
                OrderStatus::Completed,
            ]
        );
        assert!(o
            .status_history
            .windows(2)
            .all(|pair| pair[0].at <= pair[1].at));
    }
}
