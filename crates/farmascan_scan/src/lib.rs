//! MyFarmacia Scan Core
//!
//! Turns untrusted strings decoded from a camera frame into a single, typed
//! decision about what the app should do with them.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐     ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ RawDecode  │     │  Debouncer  │     │  Classifier  │     │   Dispatch   │
//! │ (camera)   │────▶│ (1 per arm) │────▶│ (ScanOutcome)│────▶│ (nav/alert)  │
//! └────────────┘     └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! # Core Concepts
//!
//! - **ScanSession**: arming state owned by the scan screen
//! - **Classifier**: pure `RawDecode -> ScanOutcome`, never fails on input
//! - **DispatchAction**: what the navigation/alert layer should do next
//! - **ScanController**: wires the three together for one screen

pub mod classify;
pub mod clock;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod dispatch;
pub mod error;
pub mod sanitize;
pub mod types;

// Re-exports for convenience
pub use classify::Classifier;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{RearmPolicy, ScanConfig};
pub use controller::{ExternalResolution, ScanController, ScanStats};
pub use debounce::{Debouncer, ScanSession};
pub use dispatch::{plan, DispatchAction, NavigationIntent, ScanAlert};
pub use error::{ConfigError, Result};
pub use sanitize::{sanitize, SanitizedPayload};
pub use types::{RawDecode, RejectionReason, ScanOutcome};
