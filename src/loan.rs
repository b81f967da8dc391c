use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::schedule::next_due_date;
use crate::types::{Allocation, ClientId, LoanId, LoanStatus, PaymentKind, RepaymentFrequency};

/// one extended credit line
///
/// mutated only through the ledger's payment commit; never deleted, a
/// completed loan is retained for audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub client_id: ClientId,
    /// client display name at origination time
    pub client_name: String,
    /// principal originally disbursed
    pub principal: Money,
    pub outstanding_principal: Money,
    /// per-period rate
    pub interest_rate: Rate,
    pub frequency: RepaymentFrequency,
    pub origination_date: NaiveDate,
    pub status: LoanStatus,
    pub last_payment_date: Option<DateTime<Utc>>,
    /// None only once the loan is completed
    pub next_payment_date: Option<NaiveDate>,
}

/// the loan fields a payment commit is allowed to touch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanUpdate {
    pub loan_id: LoanId,
    pub outstanding_principal: Money,
    pub status: LoanStatus,
    pub last_payment_date: DateTime<Utc>,
    pub next_payment_date: Option<NaiveDate>,
}

impl Loan {
    /// originate a new loan
    ///
    /// outstanding principal starts at the disbursed amount and the first
    /// due date is one period after origination
    pub fn originate(
        client_id: ClientId,
        client_name: String,
        principal: Money,
        interest_rate: Rate,
        frequency: RepaymentFrequency,
        origination_date: NaiveDate,
    ) -> Result<Self> {
        if !principal.is_positive() {
            return Err(LedgerError::InvalidArgument {
                message: format!("principal must be positive: {principal}"),
            });
        }
        if interest_rate.is_negative() {
            return Err(LedgerError::InvalidArgument {
                message: format!("negative interest rate: {interest_rate}"),
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            client_id,
            client_name,
            principal,
            outstanding_principal: principal,
            interest_rate,
            frequency,
            origination_date,
            status: LoanStatus::Active,
            last_payment_date: None,
            next_payment_date: Some(next_due_date(origination_date, frequency)),
        })
    }

    /// total payoff given the interest owed this period
    pub fn payoff_amount(&self, interest_owed: Money) -> Money {
        self.outstanding_principal + interest_owed
    }

    pub fn can_accept_payment(&self) -> bool {
        self.status != LoanStatus::Completed
    }

    /// external-facing classification; the commit path never writes
    /// Delinquent itself
    pub fn classify(&self, today: NaiveDate) -> LoanStatus {
        if self.status == LoanStatus::Completed {
            return LoanStatus::Completed;
        }
        match self.next_payment_date {
            Some(due) if today > due => LoanStatus::Delinquent,
            _ => LoanStatus::Active,
        }
    }

    /// how a payment on the given date relates to the current due date
    pub fn payment_kind(&self, on: NaiveDate) -> PaymentKind {
        match self.next_payment_date {
            Some(due) if on > due => PaymentKind::DelinquentRecovery,
            Some(due) if on < due => PaymentKind::Advance,
            _ => PaymentKind::Normal,
        }
    }

    /// derive the post-payment loan fields from an allocation
    ///
    /// the ledger caps the payment before allocating; the negative check
    /// here is the defensive backstop
    pub fn apply_payment(
        &self,
        allocation: &Allocation,
        timestamp: DateTime<Utc>,
    ) -> Result<LoanUpdate> {
        if !self.can_accept_payment() {
            return Err(LedgerError::LoanClosed { loan_id: self.id });
        }

        let new_outstanding = self.outstanding_principal - allocation.to_principal;
        if new_outstanding.is_negative() {
            return Err(LedgerError::OverPayment {
                payoff: self.payoff_amount(allocation.to_interest),
                requested: allocation.total(),
            });
        }

        // the schedule advances from the date this payment lands, which
        // becomes the new last payment date
        let (status, next_payment_date) = if new_outstanding.is_zero() {
            (LoanStatus::Completed, None)
        } else {
            (
                LoanStatus::Active,
                Some(next_due_date(timestamp.date_naive(), self.frequency)),
            )
        };

        Ok(LoanUpdate {
            loan_id: self.id,
            outstanding_principal: new_outstanding,
            status,
            last_payment_date: timestamp,
            next_payment_date,
        })
    }

    /// write an update back onto the loan; the store does this inside its
    /// atomic commit
    pub fn apply_update(&mut self, update: &LoanUpdate) {
        self.outstanding_principal = update.outstanding_principal;
        self.status = update.status;
        self.last_payment_date = Some(update.last_payment_date);
        self.next_payment_date = update.next_payment_date;
    }
}
