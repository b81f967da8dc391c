use thiserror::Error;

use crate::decimal::Money;
use crate::types::LoanId;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid argument: {message}")]
    InvalidArgument {
        message: String,
    },

    #[error("loan not found: {loan_id}")]
    NotFound {
        loan_id: LoanId,
    },

    #[error("loan is closed: {loan_id}")]
    LoanClosed {
        loan_id: LoanId,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPayment {
        amount: Money,
    },

    #[error("payment exceeds payoff: payoff {payoff}, requested {requested}")]
    OverPayment {
        payoff: Money,
        requested: Money,
    },

    #[error("commit failed: {message}")]
    CommitFailure {
        message: String,
    },
}

impl LedgerError {
    /// only a failed commit is safe to retry; everything else needs a
    /// corrected request
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::CommitFailure { .. })
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
