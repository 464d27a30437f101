//! Issue age determination
//!
//! Two methods are in use across the registered products:
//! - Exact (age last birthday)
//! - Nearest birthday: age last birthday, plus one when the next birthday is
//!   at most 182 days away

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days before a birthday at which nearest-birthday age rounds up
pub const NEAREST_BIRTHDAY_WINDOW_DAYS: i64 = 182;

/// Method used by a product to determine issue age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeDetermination {
    /// Age last birthday
    Exact,
    /// Age nearest birthday
    NearestBirthday,
}

impl AgeDetermination {
    /// Compute issue age on `today` for someone born on `dob`
    ///
    /// A date of birth after `today` yields age 0.
    pub fn age_on(&self, dob: NaiveDate, today: NaiveDate) -> u32 {
        let mut age = today.year() - dob.year();
        if shift_years(today, -age).is_some_and(|anniversary| dob > anniversary) {
            age -= 1;
        }

        if *self == AgeDetermination::NearestBirthday && age >= 0 {
            if let Some(next_birthday) = shift_years(dob, age + 1) {
                let days_until = (next_birthday - today).num_days();
                if days_until <= NEAREST_BIRTHDAY_WINDOW_DAYS {
                    age += 1;
                }
            }
        }

        age.max(0) as u32
    }
}

/// Move a date by whole years, clamping Feb 29 to Feb 28 in non-leap years
fn shift_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let months = Months::new(years.unsigned_abs() * 12);
    if years >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }
}
