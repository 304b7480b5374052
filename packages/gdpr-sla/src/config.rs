use anyhow::{Context, Result};
use async_trait::async_trait;
use dotenvy::dotenv;
use serde::{Deserialize, Deserializer};
use std::env;
use tracing::debug;

use crate::kernel::BaseSettingsProvider;

/// Acceptance period used when `sla_period` is not configured.
pub const DEFAULT_PERIOD_MONTHS: f64 = 12.0;

pub const DEFAULT_LINK_LABEL: &str = "Terms &amp; Conditions";

pub const DEFAULT_CHECKBOX_TEXT: &str = "I accept the Terms &amp; Conditions.";

/// Settings exactly as the host stores them. Every key is optional.
///
/// Numbers and booleans are accepted wherever a string is, since hosts are
/// not consistent about how they serialize settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawSlaSettings {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub sla_prompt: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub sla_tc: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub sla_period: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub sla_link_label: Option<String>,
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub sla_checkbox_text: Option<String>,
    /// Base URL of the site, used to build absolute document links.
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub site_base_url: Option<String>,
}

/// SLA configuration, loaded once at startup and shared by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SlaSettings {
    /// Whether this crate should prompt for acceptance (the CMS may do it instead).
    pub prompt_enabled: bool,
    /// URL of the current Terms & Conditions document.
    pub document_url: Option<String>,
    /// Acceptance period in months, fractions allowed. Validated when
    /// evaluated, not here.
    pub period_months: f64,
    pub link_label: String,
    pub checkbox_text: String,
    pub site_base_url: Option<String>,
}

impl Default for SlaSettings {
    fn default() -> Self {
        Self {
            prompt_enabled: false,
            document_url: None,
            period_months: DEFAULT_PERIOD_MONTHS,
            link_label: DEFAULT_LINK_LABEL.to_string(),
            checkbox_text: DEFAULT_CHECKBOX_TEXT.to_string(),
            site_base_url: None,
        }
    }
}

impl SlaSettings {
    /// Load settings from the provider. Call once per process and share the result.
    pub async fn load(provider: &dyn BaseSettingsProvider) -> Result<Self> {
        let raw = provider
            .get_settings()
            .await
            .context("Failed to read SLA settings")?;
        let settings = Self::from_raw(raw)?;
        debug!(
            prompt_enabled = settings.prompt_enabled,
            period_months = settings.period_months,
            "Loaded SLA settings"
        );
        Ok(settings)
    }

    /// Apply defaults to raw settings.
    ///
    /// An empty `sla_period` falls back to 12 months. Any number parses,
    /// including zero, negative and non-finite values; the due check reports
    /// those as invalid configuration.
    pub fn from_raw(raw: RawSlaSettings) -> Result<Self> {
        let period_months = match non_empty(raw.sla_period) {
            Some(value) => value
                .trim()
                .parse::<f64>()
                .with_context(|| format!("sla_period must be a number of months, got {value:?}"))?,
            None => DEFAULT_PERIOD_MONTHS,
        };

        Ok(Self {
            prompt_enabled: non_empty(raw.sla_prompt)
                .map(|v| is_switched_on(&v))
                .unwrap_or(false),
            document_url: non_empty(raw.sla_tc),
            period_months,
            link_label: non_empty(raw.sla_link_label)
                .unwrap_or_else(|| DEFAULT_LINK_LABEL.to_string()),
            checkbox_text: non_empty(raw.sla_checkbox_text)
                .unwrap_or_else(|| DEFAULT_CHECKBOX_TEXT.to_string()),
            site_base_url: non_empty(raw.site_base_url),
        })
    }
}

/// Settings provider backed by environment variables (and `.env` in development).
#[derive(Debug, Clone, Default)]
pub struct EnvSettingsProvider;

impl EnvSettingsProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BaseSettingsProvider for EnvSettingsProvider {
    async fn get_settings(&self) -> Result<RawSlaSettings> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(RawSlaSettings {
            sla_prompt: env::var("SLA_PROMPT").ok(),
            sla_tc: env::var("SLA_TC").ok(),
            sla_period: env::var("SLA_PERIOD").ok(),
            sla_link_label: env::var("SLA_LINK_LABEL").ok(),
            sla_checkbox_text: env::var("SLA_CHECKBOX_TEXT").ok(),
            site_base_url: env::var("SLA_SITE_BASE_URL").ok(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Prompting is on only for `1`. A boolean `true` reaches here as `"1"`.
fn is_switched_on(value: &str) -> bool {
    value.trim() == "1"
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Bool(b)) => Some(if b { "1" } else { "0" }.to_string()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected a scalar setting value, got {other}"
            )))
        }
    })
}
