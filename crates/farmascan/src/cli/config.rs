//! Configuration resolution for farmascan
//!
//! Priority:
//! 1. `--config <path>` (or `FARMASCAN_CONFIG`), which must exist
//! 2. `$FARMASCAN_HOME/config.toml`, if present
//! 3. Built-in defaults

use crate::cli::error::HelpfulError;
use anyhow::Result;
use farmascan_logging::farmascan_home;
use farmascan_scan::{Classifier, ScanConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: ScanConfig,
    pub source: ConfigSource,
    pub home: PathBuf,
}

/// Get the default config path: ~/.farmascan/config.toml
pub fn default_config_path() -> PathBuf {
    farmascan_home().join("config.toml")
}

/// Resolve and validate the configuration for this invocation.
pub fn resolve(explicit: Option<&Path>) -> Result<ResolvedConfig> {
    let home = farmascan_home();
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => (default_config_path(), false),
    };

    if !path.exists() {
        if required {
            return Err(HelpfulError::config_not_found(&path).into());
        }
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ResolvedConfig {
            config: ScanConfig::default(),
            source: ConfigSource::Defaults,
            home,
        });
    }

    let config = ScanConfig::load(&path).map_err(|e| HelpfulError::invalid_config(&path, e))?;
    Classifier::new(&config).map_err(|e| HelpfulError::invalid_config(&path, e))?;
    debug!(path = %path.display(), "loaded config file");
    Ok(ResolvedConfig {
        config,
        source: ConfigSource::File(path),
        home,
    })
}

/// Arguments for the config command
#[derive(Debug)]
pub struct ConfigArgs {
    pub json: bool,
}

/// Run the config command - shows the resolved configuration
pub fn run(args: ConfigArgs, resolved: &ResolvedConfig) -> Result<()> {
    let config = &resolved.config;
    let (source_kind, source_path) = match &resolved.source {
        ConfigSource::File(path) => ("file", Some(path.to_string_lossy().to_string())),
        ConfigSource::Defaults => ("defaults", None),
    };

    if args.json {
        let value = serde_json::json!({
            "home": resolved.home.to_string_lossy(),
            "source": {
                "kind": source_kind,
                "path": source_path,
            },
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("FARMASCAN CONFIGURATION");
    println!("=======================");
    println!();
    println!("Home:    {}", resolved.home.display());
    match source_path {
        Some(path) => println!("Source:  {}", path),
        None => println!("Source:  built-in defaults"),
    }
    println!();
    println!("App scheme:          {}://", config.app_scheme);
    let routes: Vec<&str> = config
        .allowed_deep_link_paths
        .iter()
        .map(String::as_str)
        .collect();
    println!("Deep link routes:    {}", routes.join(", "));
    println!("Record route:        /{}", config.record_route);
    println!("Max payload length:  {}", config.max_payload_length);
    println!("Identifier pattern:  {}", config.identifier_pattern);
    println!(
        "Re-arm:              {} ({} ms)",
        config.rearm.as_str(),
        config.cooldown_ms
    );
    Ok(())
}
