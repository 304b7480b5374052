//! Test fixtures: timestamps and settings.

use chrono::{DateTime, Duration, TimeZone, Utc};
use gdpr_sla::SlaSettings;

/// Fixed "current time" used across scenarios
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    reference_now() - Duration::days(days)
}

/// Prompting enabled with the given acceptance period
pub fn settings_with_period(period_months: f64) -> SlaSettings {
    SlaSettings {
        prompt_enabled: true,
        document_url: Some("/sites/default/files/terms-2025.pdf".to_string()),
        period_months,
        site_base_url: Some("https://members.example.org/".to_string()),
        ..SlaSettings::default()
    }
}
