//! Scan debouncing
//!
//! A camera reports the same code many times per second while it stays in
//! frame. The [`Debouncer`] lets exactly one decode through per arming of a
//! [`ScanSession`]; the session is re-armed by focus, by an explicit retry,
//! or (under [`RearmPolicy::Cooldown`]) once the cooldown has elapsed.

use crate::clock::{Clock, SystemClock};
use crate::config::{RearmPolicy, ScanConfig};
use crate::types::RawDecode;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Arming state of one scan screen.
///
/// Owned by the screen and only mutated through a [`Debouncer`]. A fresh
/// session is inactive until [`Debouncer::on_focus`] is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSession {
    armed: bool,
    active: bool,
    last_accepted_at: Option<Instant>,
    pending_rearm: Option<Instant>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next decode will be accepted.
    pub fn is_armed(&self) -> bool {
        self.active && self.armed
    }

    /// Focused and not yet blurred.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_accepted_at(&self) -> Option<Instant> {
        self.last_accepted_at
    }

    /// Deadline of the pending cooldown re-arm, if one is scheduled.
    pub fn pending_rearm(&self) -> Option<Instant> {
        self.pending_rearm
    }
}

/// Gates decode events so that one is accepted per arming.
#[derive(Debug, Clone)]
pub struct Debouncer<C: Clock = SystemClock> {
    policy: RearmPolicy,
    cooldown: Duration,
    clock: C,
}

impl Debouncer<SystemClock> {
    pub fn new(policy: RearmPolicy, cooldown: Duration) -> Self {
        Self::with_clock(policy, cooldown, SystemClock)
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.rearm, config.cooldown())
    }
}

impl<C: Clock> Debouncer<C> {
    pub fn with_clock(policy: RearmPolicy, cooldown: Duration, clock: C) -> Self {
        Self {
            policy,
            cooldown,
            clock,
        }
    }

    pub fn policy(&self) -> RearmPolicy {
        self.policy
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The scan screen became visible: start a fresh, armed session.
    pub fn on_focus(&self, session: &mut ScanSession) {
        session.active = true;
        session.armed = true;
        session.last_accepted_at = None;
        session.pending_rearm = None;
        debug!("scan session focused");
    }

    /// Returns `true` if this decode is the one accepted for the current arming.
    pub fn on_decode(&self, session: &mut ScanSession, raw: &RawDecode) -> bool {
        if !session.active {
            trace!(symbology = %raw.symbology, "decode ignored: session not active");
            return false;
        }

        let now = self.clock.now();
        if !session.armed {
            self.fire_due_rearm(session, now);
        }
        if !session.armed {
            trace!(symbology = %raw.symbology, "decode suppressed: session disarmed");
            return false;
        }

        session.armed = false;
        session.last_accepted_at = Some(now);
        session.pending_rearm = match self.policy {
            RearmPolicy::Cooldown => Some(now + self.cooldown),
            RearmPolicy::Manual => None,
        };
        debug!(
            symbology = %raw.symbology,
            payload_len = raw.payload.len(),
            policy = self.policy.as_str(),
            "decode accepted"
        );
        true
    }

    /// User asked to scan again: re-arm now and drop any pending cooldown.
    ///
    /// Has no effect once the session has been blurred.
    pub fn retry(&self, session: &mut ScanSession) {
        if !session.active {
            trace!("retry ignored: session not active");
            return;
        }
        session.armed = true;
        session.pending_rearm = None;
        debug!("scan session re-armed by retry");
    }

    /// The scan screen lost focus: cancel the cooldown and end the session.
    pub fn on_blur(&self, session: &mut ScanSession) {
        session.active = false;
        session.armed = false;
        session.pending_rearm = None;
        debug!("scan session blurred");
    }

    /// Apply a cooldown re-arm that has come due. Returns whether the
    /// session is armed afterwards.
    pub fn poll(&self, session: &mut ScanSession) -> bool {
        if session.active && !session.armed {
            self.fire_due_rearm(session, self.clock.now());
        }
        session.is_armed()
    }

    fn fire_due_rearm(&self, session: &mut ScanSession, now: Instant) {
        if let Some(deadline) = session.pending_rearm {
            if now >= deadline {
                session.armed = true;
                session.pending_rearm = None;
                trace!("scan session re-armed after cooldown");
            }
        }
    }
}
