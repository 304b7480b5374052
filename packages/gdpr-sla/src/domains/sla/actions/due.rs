//! Due-date evaluation - pure, clock-free
//!
//! A period of N months is N/12 of a 365-day year; N may be fractional.
//! Leap days and real calendar month lengths are ignored; existing acceptance
//! records were evaluated with this formula, so it is kept as is.

use chrono::{DateTime, Duration, Utc};

use crate::domains::sla::models::AcceptanceEvent;
use crate::domains::sla::SlaError;

pub const SECONDS_PER_YEAR: i64 = 365 * 24 * 60 * 60;

const MILLIS_PER_MONTH: f64 = (SECONDS_PER_YEAR / 12 * 1000) as f64;

/// Length of an acceptance period, rounded to the millisecond.
///
/// Rejects periods that are not finite or not greater than zero.
pub fn acceptance_period(period_months: f64) -> Result<Duration, SlaError> {
    if !period_months.is_finite() || period_months <= 0.0 {
        return Err(SlaError::InvalidPeriod {
            months: period_months,
        });
    }

    let millis = (period_months * MILLIS_PER_MONTH).round();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if millis >= i64::MAX as f64 {
        return Err(SlaError::PeriodOverflow {
            months: period_months,
        });
    }

    Duration::try_milliseconds(millis as i64).ok_or(SlaError::PeriodOverflow {
        months: period_months,
    })
}

/// Instant at which an acceptance made at `accepted_at` goes stale
pub fn acceptance_due_at(
    accepted_at: DateTime<Utc>,
    period_months: f64,
) -> Result<DateTime<Utc>, SlaError> {
    let period = acceptance_period(period_months)?;
    accepted_at
        .checked_add_signed(period)
        .ok_or(SlaError::PeriodOverflow {
            months: period_months,
        })
}

/// Whether a contact must accept again
///
/// Never accepted means due. Otherwise due once the period has fully elapsed
/// (strictly after the due instant). The period is validated even when there
/// is no prior acceptance, so bad configuration is always reported.
pub fn is_due(
    last_acceptance: Option<&AcceptanceEvent>,
    period_months: f64,
    now: DateTime<Utc>,
) -> Result<bool, SlaError> {
    acceptance_period(period_months)?;

    match last_acceptance {
        None => Ok(true),
        Some(event) => Ok(acceptance_due_at(event.accepted_at, period_months)? < now),
    }
}
