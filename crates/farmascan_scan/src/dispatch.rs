//! Outcome dispatch planning
//!
//! The classifier decides; this module says what the UI layer should do
//! about the decision. Nothing here performs navigation, shows dialogs or
//! opens URLs: it only describes those effects as [`DispatchAction`] values.

use crate::config::ScanConfig;
use crate::types::{RejectionReason, ScanOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::{form_urlencoded, Url};

/// Alert title shown for any rejected scan.
pub const REJECTED_TITLE: &str = "Code not recognized";

/// Label of the alert button that re-arms scanning.
pub const SCAN_AGAIN_LABEL: &str = "Scan again";

/// Navigate to an internal route with query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationIntent {
    /// Absolute route, e.g. "/detalle"
    pub route: String,
    pub params: BTreeMap<String, String>,
}

impl NavigationIntent {
    pub fn new(route: &str, params: BTreeMap<String, String>) -> Self {
        Self {
            route: format!("/{}", route.trim_start_matches('/')),
            params,
        }
    }

    /// Route with a form-urlencoded query string, keys in sorted order.
    pub fn href(&self) -> String {
        if self.params.is_empty() {
            return self.route.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();
        format!("{}?{}", self.route, query)
    }
}

/// Dismissible message for a rejected scan. Dismissing it must re-arm the
/// scan session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanAlert {
    pub reason: RejectionReason,
    pub title: String,
    pub message: String,
    pub dismiss_label: String,
}

impl ScanAlert {
    pub fn for_reason(reason: RejectionReason) -> Self {
        Self {
            reason,
            title: REJECTED_TITLE.to_string(),
            message: reason.user_message().to_string(),
            dismiss_label: SCAN_AGAIN_LABEL.to_string(),
        }
    }
}

/// The single effect the UI layer should perform for one accepted scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DispatchAction {
    /// Push an internal screen
    Navigate(NavigationIntent),
    /// Ask the user before handing `url` to the platform URL opener
    ConfirmExternal { url: String, host: String },
    /// Show a dismissible alert
    Alert(ScanAlert),
}

impl DispatchAction {
    pub fn name(&self) -> &'static str {
        match self {
            DispatchAction::Navigate(_) => "navigate",
            DispatchAction::ConfirmExternal { .. } => "confirm_external",
            DispatchAction::Alert(_) => "alert",
        }
    }
}

/// Plan the effect for a classified scan.
pub fn plan(outcome: &ScanOutcome, config: &ScanConfig) -> DispatchAction {
    match outcome {
        ScanOutcome::DeepLink { path, params } => {
            DispatchAction::Navigate(NavigationIntent::new(path, params.clone()))
        }
        ScanOutcome::RecordLookup { id, symbology } => {
            let params = BTreeMap::from([
                ("id".to_string(), id.clone()),
                ("symbology".to_string(), symbology.clone()),
            ]);
            DispatchAction::Navigate(NavigationIntent::new(&config.record_route, params))
        }
        ScanOutcome::ExternalUrl { url } => {
            let host = Url::parse(url)
                .ok()
                .and_then(|parsed| parsed.host_str().map(str::to_string))
                .unwrap_or_default();
            DispatchAction::ConfirmExternal {
                url: url.clone(),
                host,
            }
        }
        ScanOutcome::Rejected { reason } => DispatchAction::Alert(ScanAlert::for_reason(*reason)),
    }
}
