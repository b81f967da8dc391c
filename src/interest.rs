use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};

/// simple interest owed for one repayment period on the outstanding
/// principal: P * r, with r the per-period fraction
///
/// no currency rounding here; portions are rounded once, when the
/// payment record is finalized
pub fn period_interest(outstanding: Money, rate: Rate) -> Result<Money> {
    if outstanding.is_negative() {
        return Err(LedgerError::InvalidArgument {
            message: format!("negative outstanding principal: {outstanding}"),
        });
    }
    if rate.is_negative() {
        return Err(LedgerError::InvalidArgument {
            message: format!("negative interest rate: {rate}"),
        });
    }

    Ok(outstanding.interest_at(rate))
}
