use thiserror::Error;

/// Errors surfaced by SLA acceptance operations
///
/// An anonymous visitor is not an error; those operations return `None` instead.
#[derive(Error, Debug)]
pub enum SlaError {
    #[error("Invalid SLA period: {months} months (must be a finite number greater than zero)")]
    InvalidPeriod { months: f64 },

    #[error("SLA period of {months} months is too large")]
    PeriodOverflow { months: f64 },

    #[error("Custom field {field} in group {group} could not be resolved")]
    FieldNotResolved { field: String, group: String },

    #[error("Invalid site base URL: {0}")]
    InvalidSiteUrl(String),

    #[error("Custom field lookup failed: {0}")]
    Resolver(anyhow::Error),

    #[error("Session error: {0}")]
    Session(anyhow::Error),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}
