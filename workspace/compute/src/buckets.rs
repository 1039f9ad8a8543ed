//! Derived ages and tenures, and the fixed buckets they fall into.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

const DAYS_PER_YEAR: f64 = 365.0;

/// Elapsed age in whole years on `reference`.
///
/// The age increments on the anniversary itself, not the day after.
pub fn age_on(birth: NaiveDate, reference: NaiveDate) -> i32 {
    let mut age = reference.year() - birth.year();
    if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Age the person turns at their next birthday.
pub fn next_age(birth: NaiveDate, reference: NaiveDate) -> i32 {
    age_on(birth, reference) + 1
}

/// How tenure in years is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenureBasis {
    /// Elapsed days divided by 365. Drifts by a day every leap year; kept so
    /// existing report numbers stay stable.
    #[default]
    Approximate365,
    /// Whole calendar anniversaries plus the elapsed fraction of the current year.
    Calendar,
}

/// Tenure in fractional years between `admission` and `reference`.
///
/// A future admission yields a negative value.
pub fn tenure_years(admission: NaiveDate, reference: NaiveDate, basis: TenureBasis) -> f64 {
    match basis {
        TenureBasis::Approximate365 => {
            (reference - admission).num_days() as f64 / DAYS_PER_YEAR
        }
        TenureBasis::Calendar => {
            if reference < admission {
                -calendar_years(reference, admission)
            } else {
                calendar_years(admission, reference)
            }
        }
    }
}

fn calendar_years(from: NaiveDate, to: NaiveDate) -> f64 {
    let whole = age_on(from, to).max(0);
    let anniversary = add_years(from, whole);
    let next = add_years(from, whole + 1);
    match (anniversary, next) {
        (Some(anniversary), Some(next)) => {
            let span = (next - anniversary).num_days().max(1) as f64;
            whole as f64 + (to - anniversary).num_days() as f64 / span
        }
        // Outside chrono's range; fall back to the day approximation
        _ => (to - from).num_days() as f64 / DAYS_PER_YEAR,
    }
}

// Feb 29 anniversaries clamp to Feb 28 in common years.
fn add_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let months = u32::try_from(years).ok()?.checked_mul(12)?;
    date.checked_add_months(Months::new(months))
}

/// A fixed, ordered set of ranges.
pub trait Bucket: Copy + Eq + 'static {
    /// Every bucket in ascending range order.
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBucket {
    UpTo25,
    From26To35,
    From36To45,
    From46To55,
    From56,
}

impl AgeBucket {
    /// The first bucket also takes ages under 18.
    pub fn from_value(age: i32) -> Self {
        match age {
            ..=25 => AgeBucket::UpTo25,
            26..=35 => AgeBucket::From26To35,
            36..=45 => AgeBucket::From36To45,
            46..=55 => AgeBucket::From46To55,
            _ => AgeBucket::From56,
        }
    }
}

impl Bucket for AgeBucket {
    const ALL: &'static [Self] = &[
        AgeBucket::UpTo25,
        AgeBucket::From26To35,
        AgeBucket::From36To45,
        AgeBucket::From46To55,
        AgeBucket::From56,
    ];

    fn label(&self) -> &'static str {
        match self {
            AgeBucket::UpTo25 => "18-25",
            AgeBucket::From26To35 => "26-35",
            AgeBucket::From36To45 => "36-45",
            AgeBucket::From46To55 => "46-55",
            AgeBucket::From56 => "56+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenureBucket {
    UpTo1,
    UpTo5,
    UpTo10,
    UpTo20,
    Over20,
}

impl TenureBucket {
    /// Upper bounds are inclusive and checked in ascending order.
    pub fn from_value(years: f64) -> Self {
        if years <= 1.0 {
            TenureBucket::UpTo1
        } else if years <= 5.0 {
            TenureBucket::UpTo5
        } else if years <= 10.0 {
            TenureBucket::UpTo10
        } else if years <= 20.0 {
            TenureBucket::UpTo20
        } else {
            TenureBucket::Over20
        }
    }
}

impl Bucket for TenureBucket {
    const ALL: &'static [Self] = &[
        TenureBucket::UpTo1,
        TenureBucket::UpTo5,
        TenureBucket::UpTo10,
        TenureBucket::UpTo20,
        TenureBucket::Over20,
    ];

    fn label(&self) -> &'static str {
        match self {
            TenureBucket::UpTo1 => "0-1",
            TenureBucket::UpTo5 => "1-5",
            TenureBucket::UpTo10 => "5-10",
            TenureBucket::UpTo20 => "10-20",
            TenureBucket::Over20 => "20+",
        }
    }
}
