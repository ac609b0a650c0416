//! `farmascan replay`: drive a scan screen controller from an event log
//!
//! Input is JSON Lines, one event per line:
//!
//! ```text
//! {"event":"focus"}
//! {"event":"decode","payload":"AB12-CD34","symbology":"qr","at_ms":0}
//! {"event":"decode","payload":"AB12-CD34","symbology":"qr","at_ms":40}
//! {"event":"dismiss","at_ms":900}
//! {"event":"confirm","accept":false,"at_ms":1500}
//! {"event":"retry","at_ms":2000}
//! {"event":"blur","at_ms":2100}
//! ```
//!
//! `at_ms` is an offset from the start of the log; events without it happen
//! at the time of the previous event. Time never moves backwards.

use crate::cli::error::HelpfulError;
use crate::cli::output::{describe_action, describe_resolution, format_offset, preview_text};
use anyhow::{Context, Result};
use farmascan_scan::{
    DispatchAction, ExternalResolution, ManualClock, RawDecode, ScanConfig, ScanController,
    ScanStats,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

const PREVIEW_CHARS: usize = 40;

/// Arguments for the replay command
#[derive(Debug)]
pub struct ReplayArgs {
    pub input: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ReplayEvent {
    Focus {
        at_ms: Option<u64>,
    },
    Decode {
        payload: String,
        #[serde(default = "default_symbology")]
        symbology: String,
        at_ms: Option<u64>,
    },
    Retry {
        at_ms: Option<u64>,
    },
    Dismiss {
        at_ms: Option<u64>,
    },
    Confirm {
        accept: bool,
        at_ms: Option<u64>,
    },
    Blur {
        at_ms: Option<u64>,
    },
}

fn default_symbology() -> String {
    "qr".to_string()
}

impl ReplayEvent {
    fn at_ms(&self) -> Option<u64> {
        match self {
            ReplayEvent::Focus { at_ms }
            | ReplayEvent::Decode { at_ms, .. }
            | ReplayEvent::Retry { at_ms }
            | ReplayEvent::Dismiss { at_ms }
            | ReplayEvent::Confirm { at_ms, .. }
            | ReplayEvent::Blur { at_ms } => *at_ms,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ReplayEvent::Focus { .. } => "focus",
            ReplayEvent::Decode { .. } => "decode",
            ReplayEvent::Retry { .. } => "retry",
            ReplayEvent::Dismiss { .. } => "dismiss",
            ReplayEvent::Confirm { .. } => "confirm",
            ReplayEvent::Blur { .. } => "blur",
        }
    }
}

/// What happened for one input event.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayStep {
    pub line: usize,
    pub at_ms: u64,
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<DispatchAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ExternalResolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_preview: Option<String>,
}

impl ReplayStep {
    fn new(line: usize, at: Duration, event: &'static str) -> Self {
        Self {
            line,
            at_ms: at.as_millis() as u64,
            event,
            accepted: None,
            action: None,
            resolution: None,
            dismissed: None,
            payload_preview: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<ReplayStep>,
    pub stats: ScanStats,
}

pub fn run(args: ReplayArgs, config: &ScanConfig) -> Result<()> {
    let report = match args.input.as_deref() {
        None => replay(io::stdin().lock(), config)?,
        Some(path) if path == Path::new("-") => replay(io::stdin().lock(), config)?,
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open event log: {}", path.display()))?;
            replay(BufReader::new(file), config)?
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for step in &report.steps {
        println!(
            "{} {:<8} {}",
            format_offset(Duration::from_millis(step.at_ms)),
            step.event,
            describe_step(step)
        );
    }
    println!();
    println!(
        "accepted: {}  suppressed: {}  rejected: {}",
        report.stats.accepted, report.stats.suppressed, report.stats.rejected
    );
    Ok(())
}

/// Feed every event of `reader` through a fresh controller on a manual clock.
pub fn replay<R: BufRead>(reader: R, config: &ScanConfig) -> Result<ReplayReport> {
    let clock = ManualClock::new();
    let mut controller = ScanController::with_clock(config.clone(), &clock)?;
    let mut steps = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Failed to read event log line {}", line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        let event: ReplayEvent = serde_json::from_str(trimmed)
            .map_err(|e| HelpfulError::invalid_event(line_no, e))?;

        if let Some(at_ms) = event.at_ms() {
            clock.set_offset(Duration::from_millis(at_ms));
        }
        let mut step = ReplayStep::new(line_no, clock.elapsed(), event.name());

        match event {
            ReplayEvent::Focus { .. } => controller.focus(),
            ReplayEvent::Blur { .. } => controller.blur(),
            ReplayEvent::Retry { .. } => controller.retry(),
            ReplayEvent::Dismiss { .. } => step.dismissed = Some(controller.dismiss_alert()),
            ReplayEvent::Confirm { accept, .. } => {
                step.resolution = Some(controller.resolve_external(accept));
            }
            ReplayEvent::Decode {
                payload, symbology, ..
            } => {
                step.payload_preview = Some(preview_text(&payload, PREVIEW_CHARS));
                let action = controller.decode(&RawDecode::new(payload, symbology));
                step.accepted = Some(action.is_some());
                step.action = action;
            }
        }
        steps.push(step);
    }

    let stats = controller.stats();
    info!(
        events = steps.len(),
        accepted = stats.accepted,
        suppressed = stats.suppressed,
        "replay finished"
    );
    Ok(ReplayReport { steps, stats })
}

fn describe_step(step: &ReplayStep) -> String {
    if let Some(action) = &step.action {
        return format!(
            "{} -> {}",
            step.payload_preview.as_deref().unwrap_or_default(),
            describe_action(action)
        );
    }
    if step.accepted == Some(false) {
        return format!(
            "{} (suppressed)",
            step.payload_preview.as_deref().unwrap_or_default()
        );
    }
    if let Some(resolution) = &step.resolution {
        return describe_resolution(resolution);
    }
    match step.dismissed {
        Some(true) => "alert dismissed, scanning re-armed".to_string(),
        Some(false) => "no alert to dismiss".to_string(),
        None => String::new(),
    }
}
