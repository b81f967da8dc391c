use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::{LedgerError, Result};
use crate::loan::{Loan, LoanUpdate};
use crate::payment::Payment;
use crate::types::LoanId;

/// a loan snapshot together with the version a commit must match
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedLoan {
    pub loan: Loan,
    pub version: u64,
}

/// durable storage seam for loans and payments
///
/// `commit_payment_and_loan` is the engine's one write path: the new
/// payment and the loan mutation land together or not at all, and the
/// version check serializes commits per loan (two callers racing on the
/// same snapshot cannot both win)
pub trait LedgerStore {
    fn get_loan(&self, loan_id: LoanId) -> Result<VersionedLoan>;

    fn insert_loan(&self, loan: Loan) -> Result<()>;

    fn commit_payment_and_loan(
        &self,
        payment: Payment,
        update: LoanUpdate,
        expected_version: u64,
    ) -> Result<()>;

    /// payments of a loan in commit order
    fn payments_for_loan(&self, loan_id: LoanId) -> Result<Vec<Payment>>;
}

#[derive(Debug, Default)]
struct StoreInner {
    loans: HashMap<LoanId, (Loan, u64)>,
    payments: Vec<Payment>,
}

/// in-memory adapter: one mutex around the whole map, compare-and-swap
/// on the per-loan version
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreInner>> {
        self.inner.lock().map_err(|_| LedgerError::CommitFailure {
            message: "store lock poisoned".to_string(),
        })
    }
}

impl LedgerStore for MemoryStore {
    fn get_loan(&self, loan_id: LoanId) -> Result<VersionedLoan> {
        let inner = self.lock()?;
        inner
            .loans
            .get(&loan_id)
            .map(|(loan, version)| VersionedLoan {
                loan: loan.clone(),
                version: *version,
            })
            .ok_or(LedgerError::NotFound { loan_id })
    }

    fn insert_loan(&self, loan: Loan) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.loans.contains_key(&loan.id) {
            return Err(LedgerError::InvalidArgument {
                message: format!("loan already exists: {}", loan.id),
            });
        }
        inner.loans.insert(loan.id, (loan, 0));
        Ok(())
    }

    fn commit_payment_and_loan(
        &self,
        payment: Payment,
        update: LoanUpdate,
        expected_version: u64,
    ) -> Result<()> {
        if payment.loan_id != update.loan_id {
            return Err(LedgerError::InvalidArgument {
                message: format!(
                    "payment loan {} does not match update loan {}",
                    payment.loan_id, update.loan_id
                ),
            });
        }

        // everything below happens under one lock: the payment append and
        // the loan mutation are observable only together
        let mut inner = self.lock()?;
        let (loan, version) =
            inner
                .loans
                .get_mut(&update.loan_id)
                .ok_or(LedgerError::NotFound {
                    loan_id: update.loan_id,
                })?;

        if *version != expected_version {
            return Err(LedgerError::CommitFailure {
                message: format!(
                    "version conflict on loan {}: expected {expected_version}, found {version}",
                    update.loan_id
                ),
            });
        }

        loan.apply_update(&update);
        *version += 1;
        inner.payments.push(payment);
        Ok(())
    }

    fn payments_for_loan(&self, loan_id: LoanId) -> Result<Vec<Payment>> {
        let inner = self.lock()?;
        Ok(inner
            .payments
            .iter()
            .filter(|p| p.loan_id == loan_id)
            .cloned()
            .collect())
    }
}
