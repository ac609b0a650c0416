//! `farmascan classify`: run one payload through the classifier

use crate::cli::output::{describe_action, preview_text};
use anyhow::Result;
use farmascan_scan::{plan, sanitize, Classifier, ScanConfig};

const PREVIEW_CHARS: usize = 80;

/// Arguments for the classify command
#[derive(Debug)]
pub struct ClassifyArgs {
    pub payload: String,
    pub symbology: String,
    pub json: bool,
}

pub fn run(args: ClassifyArgs, config: &ScanConfig) -> Result<()> {
    let classifier = Classifier::new(config)?;
    let sanitized = sanitize(&args.payload);
    let symbology = sanitize(&args.symbology);
    let outcome = classifier.classify_sanitized(&sanitized, symbology.as_str());
    let action = plan(&outcome, config);

    if args.json {
        let value = serde_json::json!({
            "input_chars": args.payload.chars().count(),
            "sanitized": sanitized.as_str(),
            "symbology": symbology.as_str(),
            "outcome": outcome,
            "action": action,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Payload:  {}", preview_text(sanitized.as_str(), PREVIEW_CHARS));
    println!("Outcome:  {}", outcome);
    println!("Action:   {}", describe_action(&action));
    Ok(())
}
