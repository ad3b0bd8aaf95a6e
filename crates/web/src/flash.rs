//! Typed flash messages carried in redirect query parameters.
//!
//! The original cookie/session flash mechanism is replaced by an explicit
//! `Flash` value: POST handlers encode it into the redirect Location, the
//! target page reads it back with a lenient `Query` extractor. No signing
//! secret, no server-side session state.

use axum::response::Redirect;
use serde::{Deserialize, Serialize};

/// Bootstrap alert level of a flash message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Warning,
    Danger,
}

impl FlashLevel {
    /// Query-parameter value; doubles as the Bootstrap alert class suffix.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Warning => "warning",
            FlashLevel::Danger => "danger",
        }
    }
}

/// A one-shot user-facing message shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Danger,
            message: message.into(),
        }
    }

    /// Encode as `flash=<level>&message=<text>` for a redirect Location.
    pub fn to_query(&self) -> String {
        serde_urlencoded::to_string([
            ("flash", self.level.as_str()),
            ("message", self.message.as_str()),
        ])
        .unwrap_or_default()
    }
}

/// Redirect to `path` with the flash encoded in the query string.
pub fn flash_redirect(path: &str, flash: &Flash) -> Redirect {
    Redirect::to(&format!("{}?{}", path, flash.to_query()))
}

/// Lenient query-side counterpart of [`Flash`]; both fields optional so
/// plain page loads without a flash deserialize cleanly.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub flash: Option<FlashLevel>,
    pub message: Option<String>,
}

impl FlashQuery {
    pub fn into_flash(self) -> Option<Flash> {
        match (self.flash, self.message) {
            (Some(level), Some(message)) => Some(Flash { level, message }),
            _ => None,
        }
    }
}
