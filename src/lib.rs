pub mod allocation;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod ledger;
pub mod loan;
pub mod payment;
pub mod schedule;
pub mod store;
pub mod types;

// re-export key types
pub use allocation::allocate;
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use interest::period_interest;
pub use ledger::Ledger;
pub use loan::{Loan, LoanUpdate};
pub use payment::{finalize_portions, Payment};
pub use schedule::next_due_date;
pub use store::{LedgerStore, MemoryStore, VersionedLoan};
pub use types::{
    Allocation, ClientId, LoanId, LoanStatus, PaymentId, PaymentKind, RepaymentFrequency,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
