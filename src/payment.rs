use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::loan::Loan;
use crate::types::{Allocation, ClientId, LoanId, PaymentId, PaymentKind};

/// one settlement event against a loan, immutable once committed
///
/// the before/after snapshots make the payment history an append-only
/// ledger: the last payment's `outstanding_after` always equals the
/// loan's current outstanding principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub loan_id: LoanId,
    pub client_id: ClientId,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub kind: PaymentKind,
    pub note: Option<String>,
    pub outstanding_before: Money,
    pub outstanding_after: Money,
}

impl Payment {
    /// assemble the payment record for an allocation whose portions have
    /// already been finalized to currency precision
    pub fn build(
        loan: &Loan,
        allocation: &Allocation,
        kind: PaymentKind,
        timestamp: DateTime<Utc>,
        note: Option<String>,
        outstanding_after: Money,
    ) -> Result<Self> {
        if allocation.to_interest.is_negative() || allocation.to_principal.is_negative() {
            return Err(LedgerError::InvalidArgument {
                message: format!(
                    "negative payment portion: interest {}, principal {}",
                    allocation.to_interest, allocation.to_principal
                ),
            });
        }
        if !allocation.total().is_positive() {
            return Err(LedgerError::InvalidPayment {
                amount: allocation.total(),
            });
        }
        if outstanding_after != loan.outstanding_principal - allocation.to_principal {
            return Err(LedgerError::InvalidArgument {
                message: format!(
                    "snapshot mismatch: {} - {} != {}",
                    loan.outstanding_principal, allocation.to_principal, outstanding_after
                ),
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            loan_id: loan.id,
            client_id: loan.client_id,
            client_name: loan.client_name.clone(),
            timestamp,
            interest_portion: allocation.to_interest,
            principal_portion: allocation.to_principal,
            kind,
            note,
            outstanding_before: loan.outstanding_principal,
            outstanding_after,
        })
    }

    /// total settled by this payment
    pub fn amount(&self) -> Money {
        self.interest_portion + self.principal_portion
    }
}

/// round an allocation's portions to currency precision (2 dp,
/// round-half-even), once, before anything is persisted
///
/// principal rounds first and interest absorbs the remainder so the
/// payment amount is conserved. rounding is monotonic, so a principal
/// that did not exceed the loan's outstanding balance still does not
/// after finalization, even when the total's tie rounds the other way
pub fn finalize_portions(allocation: &Allocation) -> Allocation {
    let total = allocation.total().round_dp(2);
    let to_principal = allocation.to_principal.round_dp(2).min(total);
    Allocation {
        to_interest: total - to_principal,
        to_principal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::types::RepaymentFrequency;
    use chrono::{NaiveDate, TimeZone};

    fn test_loan() -> Loan {
        let mut loan = Loan::originate(
            Uuid::new_v4(),
            "Pedro Ramirez".to_string(),
            Money::from_major(50_000),
            Rate::from_percentage(10),
            RepaymentFrequency::Monthly,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
        .unwrap();
        loan.outstanding_principal = Money::from_major(36_000);
        loan
    }

    #[test]
    fn test_build_snapshots_the_loan() {
        let loan = test_loan();
        let ts = Utc.with_ymd_and_hms(2024, 2, 15, 10, 0, 0).unwrap();
        let allocation = Allocation {
            to_interest: Money::from_major(3_600),
            to_principal: Money::from_major(400),
        };

        let payment = Payment::build(
            &loan,
            &allocation,
            PaymentKind::Normal,
            ts,
            Some("february installment".to_string()),
            Money::from_major(35_600),
        )
        .unwrap();

        assert_eq!(payment.loan_id, loan.id);
        assert_eq!(payment.client_name, "Pedro Ramirez");
        assert_eq!(payment.outstanding_before, Money::from_major(36_000));
        assert_eq!(payment.outstanding_after, Money::from_major(35_600));
        assert_eq!(payment.amount(), Money::from_major(4_000));
    }

    #[test]
    fn test_build_rejects_inconsistent_snapshot() {
        let loan = test_loan();
        let allocation = Allocation {
            to_interest: Money::from_major(3_600),
            to_principal: Money::from_major(400),
        };

        let result = Payment::build(
            &loan,
            &allocation,
            PaymentKind::Normal,
            Utc::now(),
            None,
            Money::from_major(36_000), // principal portion not applied
        );

        assert!(matches!(result, Err(LedgerError::InvalidArgument { .. })));
    }

    #[test]
    fn test_build_rejects_zero_total() {
        let loan = test_loan();
        let allocation = Allocation::default();

        let result = Payment::build(
            &loan,
            &allocation,
            PaymentKind::Normal,
            Utc::now(),
            None,
            loan.outstanding_principal,
        );

        assert!(matches!(result, Err(LedgerError::InvalidPayment { .. })));
    }

    #[test]
    fn test_finalize_conserves_the_amount() {
        let allocation = Allocation {
            to_interest: Money::from_str_exact("36.66666667").unwrap(),
            to_principal: Money::from_str_exact("13.33333333").unwrap(),
        };

        let finalized = finalize_portions(&allocation);

        assert_eq!(finalized.to_interest, Money::from_str_exact("36.67").unwrap());
        assert_eq!(finalized.to_principal, Money::from_str_exact("13.33").unwrap());
        assert_eq!(finalized.total(), Money::from_major(50));
    }

    #[test]
    fn test_finalize_caps_interest_at_the_total() {
        // interest rounding up must not push principal negative
        let allocation = Allocation {
            to_interest: Money::from_str_exact("9.999").unwrap(),
            to_principal: Money::ZERO,
        };

        let finalized = finalize_portions(&allocation);

        assert_eq!(finalized.to_interest, Money::from_major(10));
        assert_eq!(finalized.to_principal, Money::ZERO);
    }

    #[test]
    fn test_finalize_splitting_ties_never_inflates_principal() {
        // the total's tie rounds up (1.375 -> 1.38) while the interest
        // tie would round down (0.125 -> 0.12); the half cent must land
        // in interest, not grow principal past the balance it came from
        let allocation = Allocation {
            to_interest: Money::from_str_exact("0.125").unwrap(),
            to_principal: Money::from_str_exact("1.25").unwrap(),
        };

        let finalized = finalize_portions(&allocation);

        assert_eq!(finalized.to_principal, Money::from_str_exact("1.25").unwrap());
        assert_eq!(finalized.to_interest, Money::from_str_exact("0.13").unwrap());
        assert_eq!(finalized.total(), Money::from_str_exact("1.38").unwrap());
    }

    #[test]
    fn test_payment_survives_json_round_trip() {
        let loan = test_loan();
        let allocation = Allocation {
            to_interest: Money::from_major(3_600),
            to_principal: Money::from_major(400),
        };
        let payment = Payment::build(
            &loan,
            &allocation,
            PaymentKind::Advance,
            Utc.with_ymd_and_hms(2024, 2, 10, 8, 30, 0).unwrap(),
            None,
            Money::from_major(35_600),
        )
        .unwrap();

        let json = serde_json::to_string(&payment).unwrap();
        let restored: Payment = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, payment);
    }
}
