//! Values handed to the render layer. No markup is produced here.

use serde::Serialize;
use url::Url;

use crate::config::SlaSettings;
use crate::domains::sla::{SlaError, ACCEPTANCE_FORM_PATH};

/// Instruction for the render layer to open the acceptance form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormPrompt {
    pub form_path: &'static str,
}

/// Whether this crate, rather than the CMS, prompts for acceptance
pub fn is_prompt_for_acceptance(settings: &SlaSettings) -> bool {
    settings.prompt_enabled
}

/// Form to open on the current request, unless the request is the form itself
pub fn show_form(current_path: &str) -> Option<FormPrompt> {
    if current_path.contains(ACCEPTANCE_FORM_PATH) {
        return None;
    }
    Some(FormPrompt {
        form_path: ACCEPTANCE_FORM_PATH,
    })
}

/// URL of the current Terms & Conditions document.
///
/// `None` when no document is configured. With `absolute`, one leading `/` is
/// dropped and the path is joined onto the site base URL.
pub fn terms_conditions_url(
    settings: &SlaSettings,
    absolute: bool,
) -> Result<Option<String>, SlaError> {
    let Some(url) = settings.document_url.as_deref() else {
        return Ok(None);
    };
    if !absolute {
        return Ok(Some(url.to_string()));
    }

    let base = settings
        .site_base_url
        .as_deref()
        .ok_or_else(|| SlaError::InvalidSiteUrl("site base URL is not configured".to_string()))?;
    let base = if base.ends_with('/') {
        Url::parse(base)
    } else {
        Url::parse(&format!("{base}/"))
    }
    .map_err(|e| SlaError::InvalidSiteUrl(format!("{base}: {e}")))?;

    let path = url.strip_prefix('/').unwrap_or(url);
    let joined = base
        .join(path)
        .map_err(|e| SlaError::InvalidSiteUrl(format!("{path}: {e}")))?;
    Ok(Some(joined.to_string()))
}

pub fn link_label(settings: &SlaSettings) -> &str {
    &settings.link_label
}

pub fn checkbox_text(settings: &SlaSettings) -> &str {
    &settings.checkbox_text
}
