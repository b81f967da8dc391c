use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a payment
pub type PaymentId = Uuid;

/// unique identifier for a client
pub type ClientId = Uuid;

/// repayment frequency, one period per due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepaymentFrequency {
    Daily,
    Weekly,
    /// fifteen calendar days, not two weeks
    Biweekly,
    Monthly,
}

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// performing, payments expected
    Active,
    /// principal fully repaid, retained for audit
    Completed,
    /// due date passed without a payment; derived, never written by the
    /// payment-commit path
    Delinquent,
}

/// how a payment landed relative to its due date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// received on the due date
    Normal,
    /// received ahead of the due date
    Advance,
    /// received after the due date had passed
    #[serde(rename = "delinquent-recovery")]
    DelinquentRecovery,
}

/// interest-first split of one payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Allocation {
    pub to_interest: Money,
    pub to_principal: Money,
}

impl Allocation {
    pub fn total(&self) -> Money {
        self.to_interest + self.to_principal
    }
}
