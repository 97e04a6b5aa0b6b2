//! Payment settlement - matching payment entries against an order total
//!
//! Pure functions over `(total, payments)`; nothing here touches the store.
//! The operator adds entries one per instrument (split payment), then
//! [`confirm`] attaches them to the order atomically once the sum covers the
//! total. Overpayment is legal and represents change; change is computed
//! against the aggregate of CASH entries only - non-cash methods never
//! produce change.

use serde::{Deserialize, Serialize};
use shared::error::{PosError, PosResult};
use shared::models::order::{Order, Payment, PaymentMethod};
use shared::money::Money;

/// Result of a successful settlement confirmation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettlementOutcome {
    /// Cash to hand back to the customer; never negative, zero when the
    /// payments match the total exactly or the excess is non-cash
    pub change_due: Money,
}

/// `total - sum(payments)`; negative means overpayment
pub fn remaining(total: Money, payments: &[Payment]) -> PosResult<Money> {
    let mut paid = Money::zero(total.currency());
    for payment in payments {
        paid = paid.add(payment.amount)?;
    }
    total.sub(paid)
}

/// Append a proposed payment entry after validation
///
/// The amount must be strictly positive. No per-entry upper bound is
/// enforced: overpayment is legal (change, typically cash).
pub fn add_payment(
    payments: &mut Vec<Payment>,
    method: PaymentMethod,
    amount: Money,
) -> PosResult<()> {
    if !amount.is_positive() {
        return Err(PosError::InvalidAmount);
    }
    payments.push(Payment::new(method, amount));
    Ok(())
}

/// Whether the proposed payments fully cover the total
pub fn is_settled(total: Money, payments: &[Payment]) -> PosResult<bool> {
    Ok(!remaining(total, payments)?.is_positive())
}

/// Confirm settlement, attaching payments to the order
///
/// Allowed only when the payments cover the total; otherwise fails with
/// `InsufficientPayment { remaining }` and performs no mutation - partial
/// submission is rejected atomically. Settlement is one-shot per order:
/// confirming against an already-settled order fails.
pub fn confirm(order: &mut Order, payments: Vec<Payment>) -> PosResult<SettlementOutcome> {
    if order.is_settled() {
        return Err(PosError::AlreadySettled(order.id.clone()));
    }
    for payment in &payments {
        if !payment.amount.is_positive() {
            return Err(PosError::InvalidAmount);
        }
    }

    let remaining = remaining(order.total, &payments)?;
    if remaining.is_positive() {
        return Err(PosError::InsufficientPayment { remaining });
    }

    // Overpaid amount, covered by cash entries only: a non-cash instrument
    // captures exactly what it was charged, so any excess must come out of
    // the cash tendered.
    let overpaid = Money::zero(order.total.currency()).sub(remaining)?.max_zero();
    let mut cash = Money::zero(order.total.currency());
    for payment in payments.iter().filter(|p| p.method.is_cash()) {
        cash = cash.add(payment.amount)?;
    }
    let change_due = overpaid.min(cash)?.max_zero();

    order.payments = payments;
    Ok(SettlementOutcome { change_due })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::order::OrderType;
    use shared::money::Currency;

    fn brl(amount: i64) -> Money {
        Money::new(amount, Currency::Brl)
    }

    fn order(total: i64) -> Order {
        Order::new(
            "ORD20260830-1001".to_string(),
            OrderType::Pickup,
            Vec::new(),
            None,
            None,
            brl(total),
        )
    }

    #[test]
    fn test_remaining_positive_then_negative() {
        let mut payments = Vec::new();
        assert_eq!(remaining(brl(10000), &payments).unwrap(), brl(10000));

        add_payment(&mut payments, PaymentMethod::Cash, brl(6000)).unwrap();
        assert_eq!(remaining(brl(10000), &payments).unwrap(), brl(4000));

        add_payment(&mut payments, PaymentMethod::Pix, brl(6000)).unwrap();
        assert_eq!(remaining(brl(10000), &payments).unwrap(), brl(-2000));
    }

    #[test]
    fn test_add_payment_rejects_non_positive() {
        let mut payments = Vec::new();
        assert!(matches!(
            add_payment(&mut payments, PaymentMethod::Cash, brl(0)),
            Err(PosError::InvalidAmount)
        ));
        assert!(matches!(
            add_payment(&mut payments, PaymentMethod::Cash, brl(-100)),
            Err(PosError::InvalidAmount)
        ));
        assert!(payments.is_empty());
    }

    #[test]
    fn test_split_cash_and_pix_settles_with_no_change() {
        let mut o = order(10000);
        let mut payments = Vec::new();
        add_payment(&mut payments, PaymentMethod::Cash, brl(6000)).unwrap();
        add_payment(&mut payments, PaymentMethod::Pix, brl(4000)).unwrap();

        assert!(is_settled(o.total, &payments).unwrap());
        let outcome = confirm(&mut o, payments).unwrap();
        assert_eq!(outcome.change_due, brl(0));
        assert_eq!(o.payments.len(), 2);
        assert!(o.is_settled());
    }

    #[test]
    fn test_cash_overpayment_produces_change() {
        let mut o = order(10000);
        let mut payments = Vec::new();
        add_payment(&mut payments, PaymentMethod::Cash, brl(12000)).unwrap();

        assert!(is_settled(o.total, &payments).unwrap());
        let outcome = confirm(&mut o, payments).unwrap();
        assert_eq!(outcome.change_due, brl(2000));
    }

    #[test]
    fn test_change_capped_at_cash_aggregate() {
        // 9000 card + 2000 cash against 10000: overpaid 1000, all of it
        // attributable to the cash entry
        let mut o = order(10000);
        let mut payments = Vec::new();
        add_payment(&mut payments, PaymentMethod::CreditCard, brl(9000)).unwrap();
        add_payment(&mut payments, PaymentMethod::Cash, brl(2000)).unwrap();

        let outcome = confirm(&mut o, payments).unwrap();
        assert_eq!(outcome.change_due, brl(1000));
    }

    #[test]
    fn test_non_cash_overpayment_never_produces_change() {
        let mut o = order(10000);
        let mut payments = Vec::new();
        add_payment(&mut payments, PaymentMethod::CreditCard, brl(11000)).unwrap();

        let outcome = confirm(&mut o, payments).unwrap();
        assert_eq!(outcome.change_due, brl(0));
    }

    #[test]
    fn test_multiple_cash_entries_aggregate_for_change() {
        let mut o = order(10000);
        let mut payments = Vec::new();
        add_payment(&mut payments, PaymentMethod::Cash, brl(5000)).unwrap();
        add_payment(&mut payments, PaymentMethod::Cash, brl(7000)).unwrap();

        let outcome = confirm(&mut o, payments).unwrap();
        assert_eq!(outcome.change_due, brl(2000));
    }

    #[test]
    fn test_insufficient_payment_rejected_without_mutation() {
        let mut o = order(10000);
        let mut payments = Vec::new();
        add_payment(&mut payments, PaymentMethod::Cash, brl(6000)).unwrap();

        let result = confirm(&mut o, payments);
        assert_eq!(
            result,
            Err(PosError::InsufficientPayment {
                remaining: brl(4000)
            })
        );
        assert!(o.payments.is_empty());
        assert!(!o.is_settled());
    }

    #[test]
    fn test_confirm_is_one_shot() {
        let mut o = order(10000);
        let mut payments = Vec::new();
        add_payment(&mut payments, PaymentMethod::Cash, brl(10000)).unwrap();
        confirm(&mut o, payments).unwrap();

        let mut more = Vec::new();
        add_payment(&mut more, PaymentMethod::Cash, brl(10000)).unwrap();
        assert!(matches!(
            confirm(&mut o, more),
            Err(PosError::AlreadySettled(_))
        ));
        assert_eq!(o.payments.len(), 1);
    }

    #[test]
    fn test_exact_payment_settles() {
        let mut o = order(10000);
        let mut payments = Vec::new();
        add_payment(&mut payments, PaymentMethod::DebitCard, brl(10000)).unwrap();
        let outcome = confirm(&mut o, payments).unwrap();
        assert_eq!(outcome.change_due, brl(0));
    }

    #[test]
    fn test_currency_mismatch_surfaces() {
        let o = order(10000);
        let payments = vec![Payment::new(
            PaymentMethod::Cash,
            Money::new(10000, Currency::Usd),
        )];
        assert!(matches!(
            remaining(o.total, &payments),
            Err(PosError::CurrencyMismatch { .. })
        ));
    }
}
