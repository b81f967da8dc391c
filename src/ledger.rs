use hourglass_rs::SafeTimeProvider;

use crate::allocation::allocate;
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::interest::period_interest;
use crate::loan::Loan;
use crate::payment::{finalize_portions, Payment};
use crate::store::{LedgerStore, VersionedLoan};
use crate::types::{ClientId, LoanId, LoanStatus, RepaymentFrequency};

/// version-conflicted commits are recomputed on a fresh snapshot this
/// many times before the failure is surfaced to the caller
const COMMIT_RETRIES: usize = 3;

/// orchestrates payment events against the ledger
///
/// each `record_payment` call is one logical transaction: the payment
/// record and the loan mutation land atomically through the store, or
/// the call fails with no observable effect
pub struct Ledger<S: LedgerStore> {
    store: S,
    events: EventStore,
}

impl<S: LedgerStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            events: EventStore::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// drain the events emitted by committed operations
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    /// originate and persist a new loan
    pub fn originate(
        &mut self,
        client_id: ClientId,
        client_name: String,
        principal: Money,
        interest_rate: Rate,
        frequency: RepaymentFrequency,
        time_provider: &SafeTimeProvider,
    ) -> Result<Loan> {
        let now = time_provider.now();
        let loan = Loan::originate(
            client_id,
            client_name,
            principal,
            interest_rate,
            frequency,
            now.date_naive(),
        )?;
        self.store.insert_loan(loan.clone())?;

        self.events.emit(Event::LoanOriginated {
            loan_id: loan.id,
            principal: loan.principal,
            // an active loan always has a due date at origination
            first_due_date: loan.next_payment_date.unwrap_or(loan.origination_date),
            timestamp: now,
        });

        Ok(loan)
    }

    /// record one payment against a loan
    ///
    /// validation happens before any read, the payoff cap rejects rather
    /// than truncates, and the commit is retried on version conflicts
    /// with a fresh snapshot each time
    pub fn record_payment(
        &mut self,
        loan_id: LoanId,
        amount: Money,
        note: Option<String>,
        time_provider: &SafeTimeProvider,
    ) -> Result<(Payment, Loan)> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidPayment { amount });
        }

        let mut attempts = 0;
        loop {
            let VersionedLoan { loan, version } = self.store.get_loan(loan_id)?;
            if !loan.can_accept_payment() {
                return Err(LedgerError::LoanClosed { loan_id });
            }

            let interest_owed = period_interest(loan.outstanding_principal, loan.interest_rate)?;
            let payoff = loan.payoff_amount(interest_owed);
            if amount > payoff {
                // the reported payoff is floored to cents: the caller
                // resubmitting exactly that figure always passes the cap
                return Err(LedgerError::OverPayment {
                    payoff: payoff.floor_dp(2),
                    requested: amount,
                });
            }

            let allocation = finalize_portions(&allocate(interest_owed, amount)?);
            let now = time_provider.now();
            let update = loan.apply_payment(&allocation, now)?;
            let kind = loan.payment_kind(now.date_naive());
            let payment = Payment::build(
                &loan,
                &allocation,
                kind,
                now,
                note.clone(),
                update.outstanding_principal,
            )?;

            match self
                .store
                .commit_payment_and_loan(payment.clone(), update.clone(), version)
            {
                Ok(()) => {
                    self.events.emit(Event::PaymentRecorded {
                        loan_id,
                        payment_id: payment.id,
                        interest_portion: payment.interest_portion,
                        principal_portion: payment.principal_portion,
                        kind: payment.kind,
                        outstanding_after: payment.outstanding_after,
                        timestamp: now,
                    });
                    if update.status != loan.status {
                        self.events.emit(Event::StatusChanged {
                            loan_id,
                            old_status: loan.status,
                            new_status: update.status,
                            timestamp: now,
                        });
                    }
                    if update.status == LoanStatus::Completed {
                        self.events.emit(Event::LoanCompleted {
                            loan_id,
                            final_payment: payment.amount(),
                            timestamp: now,
                        });
                    }

                    let mut committed = loan;
                    committed.apply_update(&update);
                    return Ok((payment, committed));
                }
                Err(err @ LedgerError::CommitFailure { .. }) => {
                    attempts += 1;
                    if attempts >= COMMIT_RETRIES {
                        return Err(err);
                    }
                    // another commit won the race; recompute on the
                    // current state
                }
                Err(err) => return Err(err),
            }
        }
    }
}
