//! Scan screen controller
//!
//! Owns the [`ScanSession`] of one scan screen and wires the debouncer,
//! classifier and dispatch planner together. The UI calls it from its event
//! thread; every accepted scan yields exactly one [`DispatchAction`].

use crate::classify::Classifier;
use crate::clock::{Clock, SystemClock};
use crate::config::ScanConfig;
use crate::debounce::{Debouncer, ScanSession};
use crate::dispatch::{plan, DispatchAction};
use crate::error::Result;
use crate::types::{RawDecode, ScanOutcome};
use serde::Serialize;
use tracing::{debug, info};

/// Prompt currently shown to the user, blocking further scans.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Prompt {
    Alert,
    ConfirmExternal { url: String },
}

/// Answer to an external link confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum ExternalResolution {
    /// User accepted: hand `url` to the platform URL opener
    Open { url: String },
    /// User declined: scanning has been re-armed
    Declined,
    /// No confirmation was pending
    NothingPending,
}

/// Counters for one controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub accepted: u64,
    pub suppressed: u64,
    pub rejected: u64,
}

pub struct ScanController<C: Clock = SystemClock> {
    config: ScanConfig,
    classifier: Classifier,
    debouncer: Debouncer<C>,
    session: ScanSession,
    prompt: Option<Prompt>,
    stats: ScanStats,
}

impl ScanController<SystemClock> {
    pub fn new(config: ScanConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> ScanController<C> {
    pub fn with_clock(config: ScanConfig, clock: C) -> Result<Self> {
        let classifier = Classifier::new(&config)?;
        let debouncer = Debouncer::with_clock(config.rearm, config.cooldown(), clock);
        Ok(Self {
            config,
            classifier,
            debouncer,
            session: ScanSession::new(),
            prompt: None,
            stats: ScanStats::default(),
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Whether an alert or confirmation is waiting for the user.
    pub fn is_prompting(&self) -> bool {
        self.prompt.is_some()
    }

    pub fn focus(&mut self) {
        self.prompt = None;
        self.debouncer.on_focus(&mut self.session);
    }

    pub fn blur(&mut self) {
        self.prompt = None;
        self.debouncer.on_blur(&mut self.session);
    }

    /// Feed one decode event. Returns the action to perform if the decode
    /// was accepted, `None` if it was debounced away.
    pub fn decode(&mut self, raw: &RawDecode) -> Option<DispatchAction> {
        if self.prompt.is_some() || !self.debouncer.on_decode(&mut self.session, raw) {
            self.stats.suppressed += 1;
            return None;
        }
        self.stats.accepted += 1;

        let outcome = self.classifier.classify(raw);
        let action = plan(&outcome, &self.config);
        match &outcome {
            ScanOutcome::Rejected { .. } => {
                self.stats.rejected += 1;
                self.prompt = Some(Prompt::Alert);
            }
            ScanOutcome::ExternalUrl { url } => {
                self.prompt = Some(Prompt::ConfirmExternal { url: url.clone() });
            }
            ScanOutcome::DeepLink { .. } | ScanOutcome::RecordLookup { .. } => {}
        }
        info!(kind = outcome.kind(), action = action.name(), "scan accepted");
        Some(action)
    }

    /// Explicit "scan again": clear any prompt and re-arm.
    pub fn retry(&mut self) {
        self.prompt = None;
        self.debouncer.retry(&mut self.session);
    }

    /// Dismiss a rejection alert. Returns `false` if no alert was shown.
    pub fn dismiss_alert(&mut self) -> bool {
        if self.prompt != Some(Prompt::Alert) {
            return false;
        }
        debug!("rejection alert dismissed");
        self.retry();
        true
    }

    /// Resolve a pending external link confirmation.
    pub fn resolve_external(&mut self, confirmed: bool) -> ExternalResolution {
        let Some(Prompt::ConfirmExternal { url }) = self.prompt.clone() else {
            return ExternalResolution::NothingPending;
        };
        if confirmed {
            self.prompt = None;
            debug!("external link confirmed");
            ExternalResolution::Open { url }
        } else {
            debug!("external link declined");
            self.retry();
            ExternalResolution::Declined
        }
    }
}
