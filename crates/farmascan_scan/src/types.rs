//! Core types for scan handling

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single decoded code as reported by the scanning primitive.
///
/// The camera may report the same physical code many times per second;
/// the [`Debouncer`](crate::Debouncer) decides which of these count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDecode {
    /// Decoded text, untrusted
    pub payload: String,
    /// Symbology tag (e.g. "qr", "ean13", "code128")
    pub symbology: String,
}

impl RawDecode {
    pub fn new(payload: impl Into<String>, symbology: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            symbology: symbology.into(),
        }
    }
}

/// Why a payload was not routed anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Empty after sanitizing, or longer than the configured maximum
    InvalidFormat,
    /// App scheme matched but the route is not on the allow-list
    UnknownDeepLink,
    /// Known route with a missing, malformed or ambiguous parameter
    InvalidDeepLinkParam,
    /// No classification rule matched
    Unsupported,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::InvalidFormat => "invalid_format",
            RejectionReason::UnknownDeepLink => "unknown_deep_link",
            RejectionReason::InvalidDeepLinkParam => "invalid_deep_link_param",
            RejectionReason::Unsupported => "unsupported",
        }
    }

    /// Message shown to the user in the dismissible alert.
    pub fn user_message(&self) -> &'static str {
        match self {
            RejectionReason::InvalidFormat => "The scanned code is empty or too long.",
            RejectionReason::UnknownDeepLink => "This code points to a screen the app does not have.",
            RejectionReason::InvalidDeepLinkParam => {
                "This code is missing a valid record identifier."
            }
            RejectionReason::Unsupported => "This code is not supported by the app.",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of classifying one accepted scan. Exactly one variant applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Internal route on the allow-list, with its decoded query parameters
    DeepLink {
        path: String,
        params: BTreeMap<String, String>,
    },
    /// Absolute `https` URL; must be confirmed by the user before opening
    ExternalUrl { url: String },
    /// Bare identifier to look up against the backend
    RecordLookup { id: String, symbology: String },
    /// Rejected payload; a normal result that needs user feedback
    Rejected { reason: RejectionReason },
}

impl ScanOutcome {
    pub fn rejected(reason: RejectionReason) -> Self {
        ScanOutcome::Rejected { reason }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ScanOutcome::DeepLink { .. } => "deep_link",
            ScanOutcome::ExternalUrl { .. } => "external_url",
            ScanOutcome::RecordLookup { .. } => "record_lookup",
            ScanOutcome::Rejected { .. } => "rejected",
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ScanOutcome::Rejected { .. })
    }

    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        match self {
            ScanOutcome::Rejected { reason } => Some(*reason),
            _ => None,
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanOutcome::DeepLink { path, params } => {
                write!(f, "deep link /{}", path)?;
                for (key, value) in params {
                    write!(f, " {}={}", key, value)?;
                }
                Ok(())
            }
            ScanOutcome::ExternalUrl { url } => write!(f, "external url {}", url),
            ScanOutcome::RecordLookup { id, symbology } => {
                write!(f, "record {} ({})", id, symbology)
            }
            ScanOutcome::Rejected { reason } => write!(f, "rejected: {}", reason),
        }
    }
}
