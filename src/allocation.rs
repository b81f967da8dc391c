use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::types::Allocation;

/// split a payment between interest and principal, interest first
///
/// the full period's accrued interest is satisfied before anything
/// reduces principal; a payment smaller than the interest owed reduces
/// no principal at all. the caller caps the amount against the loan's
/// payoff before allocating — this function never sees the loan.
pub fn allocate(interest_owed: Money, amount: Money) -> Result<Allocation> {
    if interest_owed.is_negative() {
        return Err(LedgerError::InvalidArgument {
            message: format!("negative interest owed: {interest_owed}"),
        });
    }
    if !amount.is_positive() {
        return Err(LedgerError::InvalidPayment { amount });
    }

    let to_interest = interest_owed.min(amount);
    let to_principal = amount - to_interest;

    Ok(Allocation {
        to_interest,
        to_principal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_below_interest_reduces_no_principal() {
        let allocation = allocate(Money::from_major(3_600), Money::from_major(1_500)).unwrap();

        assert_eq!(allocation.to_interest, Money::from_major(1_500));
        assert_eq!(allocation.to_principal, Money::ZERO);
    }

    #[test]
    fn test_payment_above_interest_reduces_principal() {
        let allocation = allocate(Money::from_major(3_600), Money::from_major(4_000)).unwrap();

        assert_eq!(allocation.to_interest, Money::from_major(3_600));
        assert_eq!(allocation.to_principal, Money::from_major(400));
    }

    #[test]
    fn test_payment_exactly_covers_interest() {
        let allocation = allocate(Money::from_major(100), Money::from_major(100)).unwrap();

        assert_eq!(allocation.to_interest, Money::from_major(100));
        assert_eq!(allocation.to_principal, Money::ZERO);
    }

    #[test]
    fn test_zero_interest_owed_goes_all_to_principal() {
        let allocation = allocate(Money::ZERO, Money::from_major(250)).unwrap();

        assert_eq!(allocation.to_interest, Money::ZERO);
        assert_eq!(allocation.to_principal, Money::from_major(250));
    }

    #[test]
    fn test_split_always_conserves_the_amount() {
        let cases = [
            (Money::from_major(0), Money::from_major(1)),
            (Money::from_major(100), Money::from_major(1)),
            (Money::from_major(100), Money::from_major(100)),
            (Money::from_major(100), Money::from_major(10_000)),
            (
                Money::from_str_exact("33.33").unwrap(),
                Money::from_str_exact("50.01").unwrap(),
            ),
        ];

        for (owed, amount) in cases {
            let allocation = allocate(owed, amount).unwrap();
            assert_eq!(allocation.total(), amount);
            assert!(allocation.to_interest <= owed);
            assert!(!allocation.to_principal.is_negative());
        }
    }

    #[test]
    fn test_zero_payment_is_rejected() {
        let result = allocate(Money::from_major(100), Money::ZERO);
        assert!(matches!(result, Err(LedgerError::InvalidPayment { .. })));
    }

    #[test]
    fn test_negative_payment_is_rejected() {
        let negative = Money::ZERO - Money::from_major(50);
        let result = allocate(Money::from_major(100), negative);
        assert!(matches!(result, Err(LedgerError::InvalidPayment { .. })));
    }

    #[test]
    fn test_negative_interest_owed_is_rejected() {
        let negative = Money::ZERO - Money::from_major(1);
        let result = allocate(negative, Money::from_major(100));
        assert!(matches!(result, Err(LedgerError::InvalidArgument { .. })));
    }
}
