use chrono::{Duration, Months, NaiveDate};

use crate::types::RepaymentFrequency;

/// advance an anchor date by one repayment period
///
/// monthly arithmetic rolls over year boundaries and clamps to the last
/// valid day of the target month (jan 31 -> feb 28/29)
pub fn next_due_date(anchor: NaiveDate, frequency: RepaymentFrequency) -> NaiveDate {
    match frequency {
        RepaymentFrequency::Daily => anchor + Duration::days(1),
        RepaymentFrequency::Weekly => anchor + Duration::days(7),
        RepaymentFrequency::Biweekly => anchor + Duration::days(15),
        RepaymentFrequency::Monthly => anchor
            .checked_add_months(Months::new(1))
            // NaiveDate::MAX is centuries away from any real schedule
            .unwrap_or(NaiveDate::MAX),
    }
}
