//! Payload classification
//!
//! Maps a decoded payload to exactly one [`ScanOutcome`]. Rules are tried
//! in a fixed order and the first match wins:
//!
//! 1. **Deep link**: `<app_scheme>://<route>?<query>`, route on the allow-list
//! 2. **External URL**: absolute `https://` URL with a host and no credentials
//! 3. **Record identifier**: whole payload matches the identifier pattern
//! 4. Anything else is [`RejectionReason::Unsupported`]
//!
//! Deep links come first so that an identifier-shaped query value can never
//! be read as a bare record id. Classification never fails: hostile input
//! always ends up as a `Rejected` outcome.

use crate::config::{ScanConfig, DEFAULT_IDENTIFIER_PATTERN};
use crate::error::{ConfigError, Result};
use crate::sanitize::{is_stripped_char, sanitize, SanitizedPayload};
use crate::types::{RawDecode, RejectionReason, ScanOutcome};
use regex::Regex;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use tracing::debug;
use url::{form_urlencoded, Url};

/// Query parameter every deep link must carry.
pub const ID_PARAM: &str = "id";

const HTTPS_PREFIX: &str = "https://";

static DEFAULT_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_IDENTIFIER_PATTERN).unwrap());

/// Classifies sanitized scan payloads. Cheap to clone, holds no mutable state.
#[derive(Debug, Clone)]
pub struct Classifier {
    app_scheme: String,
    allowed_routes: BTreeSet<String>,
    max_payload_length: usize,
    identifier: Regex,
}

impl Classifier {
    /// Build a classifier, validating the configuration.
    pub fn new(config: &ScanConfig) -> Result<Self> {
        config.validate()?;
        let identifier = compile_identifier_pattern(&config.identifier_pattern)?;

        // Deep link paths must themselves be valid identifiers.
        for route in &config.allowed_deep_link_paths {
            if !identifier.is_match(route) {
                return Err(ConfigError::InvalidRoute {
                    route: route.clone(),
                    reason: "route does not match the identifier pattern".to_string(),
                });
            }
        }

        Ok(Self {
            app_scheme: config.app_scheme.clone(),
            allowed_routes: config.allowed_deep_link_paths.clone(),
            max_payload_length: config.max_payload_length,
            identifier,
        })
    }

    pub fn app_scheme(&self) -> &str {
        &self.app_scheme
    }

    pub fn max_payload_length(&self) -> usize {
        self.max_payload_length
    }

    /// Whether `candidate` satisfies the identifier format rule.
    pub fn is_identifier(&self, candidate: &str) -> bool {
        self.identifier.is_match(candidate)
    }

    /// Sanitize and classify one decoded code.
    pub fn classify(&self, raw: &RawDecode) -> ScanOutcome {
        let payload = sanitize(&raw.payload);
        let symbology = sanitize(&raw.symbology);
        self.classify_sanitized(&payload, symbology.as_str())
    }

    /// Classify a payload that has already been sanitized.
    pub fn classify_sanitized(&self, payload: &SanitizedPayload, symbology: &str) -> ScanOutcome {
        let outcome = self.decide(payload, symbology);
        debug!(
            kind = outcome.kind(),
            reason = outcome.rejection_reason().map(|r| r.as_str()),
            payload_len = payload.len(),
            "classified scan payload"
        );
        outcome
    }

    fn decide(&self, payload: &SanitizedPayload, symbology: &str) -> ScanOutcome {
        if payload.is_empty() {
            return ScanOutcome::rejected(RejectionReason::InvalidFormat);
        }
        if payload.len() > self.max_payload_length && payload.char_len() > self.max_payload_length {
            return ScanOutcome::rejected(RejectionReason::InvalidFormat);
        }

        let text = payload.as_str();
        if let Some(rest) = self.strip_app_scheme(text) {
            return self.classify_deep_link(rest);
        }
        if let Some(url) = parse_external_url(text) {
            return ScanOutcome::ExternalUrl { url };
        }
        if self.is_identifier(text) {
            return ScanOutcome::RecordLookup {
                id: text.to_string(),
                symbology: symbology.to_string(),
            };
        }
        ScanOutcome::rejected(RejectionReason::Unsupported)
    }

    /// Returns the part after `<app_scheme>://` if the payload uses the app scheme.
    fn strip_app_scheme<'a>(&self, text: &'a str) -> Option<&'a str> {
        let scheme_len = self.app_scheme.len();
        let scheme = text.get(..scheme_len)?;
        if !scheme.eq_ignore_ascii_case(&self.app_scheme) {
            return None;
        }
        text[scheme_len..].strip_prefix("://")
    }

    fn classify_deep_link(&self, rest: &str) -> ScanOutcome {
        let without_fragment = rest.split_once('#').map_or(rest, |(head, _)| head);
        let (path, query) = without_fragment
            .split_once('?')
            .unwrap_or((without_fragment, ""));
        let path = path.trim_start_matches('/');

        if !self.allowed_routes.contains(path) {
            return ScanOutcome::rejected(RejectionReason::UnknownDeepLink);
        }

        let Some(params) = parse_query(query) else {
            return ScanOutcome::rejected(RejectionReason::InvalidDeepLinkParam);
        };
        match params.get(ID_PARAM) {
            Some(id) if self.is_identifier(id) => ScanOutcome::DeepLink {
                path: path.to_string(),
                params,
            },
            _ => ScanOutcome::rejected(RejectionReason::InvalidDeepLinkParam),
        }
    }
}

/// Compile a user supplied identifier pattern as a whole-string match.
fn compile_identifier_pattern(pattern: &str) -> Result<Regex> {
    if pattern == DEFAULT_IDENTIFIER_PATTERN {
        return Ok(DEFAULT_IDENTIFIER.clone());
    }
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Decode a deep link query. `None` if any key is empty or repeated, or if
/// a decoded key or value contains characters the sanitizer would strip.
fn parse_query(query: &str) -> Option<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key.is_empty() || key.chars().any(is_stripped_char) || value.chars().any(is_stripped_char) {
            return None;
        }
        match params.entry(key.into_owned()) {
            Entry::Occupied(_) => return None,
            Entry::Vacant(slot) => {
                slot.insert(value.into_owned());
            }
        }
    }
    Some(params)
}

/// Parse an external link. Only `https://` URLs with a host and without
/// embedded credentials qualify; everything else falls through.
fn parse_external_url(text: &str) -> Option<String> {
    let prefix = text.get(..HTTPS_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(HTTPS_PREFIX) {
        return None;
    }
    let url = Url::parse(text).ok()?;
    if url.scheme() != "https" || url.host_str().map_or(true, str::is_empty) {
        return None;
    }
    if !url.username().is_empty() || url.password().is_some() {
        return None;
    }
    Some(url.to_string())
}
