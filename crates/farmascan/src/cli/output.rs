//! Output formatting utilities for CLI commands

use farmascan_scan::{DispatchAction, ExternalResolution};
use std::time::Duration;

/// One-line human description of a dispatch action.
///
/// Examples:
/// - "navigate /detalle?id=AB12&symbology=qr"
/// - "confirm external https://example.com/ (host example.com)"
/// - "alert unsupported: This code is not supported by the app."
pub fn describe_action(action: &DispatchAction) -> String {
    match action {
        DispatchAction::Navigate(intent) => format!("navigate {}", intent.href()),
        DispatchAction::ConfirmExternal { url, host } => {
            format!("confirm external {} (host {})", url, host)
        }
        DispatchAction::Alert(alert) => format!("alert {}: {}", alert.reason, alert.message),
    }
}

pub fn describe_resolution(resolution: &ExternalResolution) -> String {
    match resolution {
        ExternalResolution::Open { url } => format!("open {}", url),
        ExternalResolution::Declined => "declined, scanning re-armed".to_string(),
        ExternalResolution::NothingPending => "no confirmation pending".to_string(),
    }
}

/// Format a replay offset as seconds with millisecond precision.
///
/// Examples:
/// - 0 -> "   0.000s"
/// - 1200 -> "   1.200s"
pub fn format_offset(offset: Duration) -> String {
    format!("{:>8.3}s", offset.as_secs_f64())
}

/// Shorten untrusted text for terminal display, escaping anything unprintable.
pub fn preview_text(text: &str, max_chars: usize) -> String {
    let mut preview: String = text.chars().take(max_chars).flat_map(char::escape_debug).collect();
    if text.chars().count() > max_chars {
        preview.push('…');
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmascan_scan::{NavigationIntent, RejectionReason, ScanAlert};
    use std::collections::BTreeMap;

    #[test]
    fn describes_navigation_with_href() {
        let params = BTreeMap::from([("id".to_string(), "AB12".to_string())]);
        let action = DispatchAction::Navigate(NavigationIntent::new("detalle", params));
        assert_eq!(describe_action(&action), "navigate /detalle?id=AB12");
    }

    #[test]
    fn describes_alert_with_reason() {
        let action = DispatchAction::Alert(ScanAlert::for_reason(RejectionReason::Unsupported));
        assert!(describe_action(&action).starts_with("alert unsupported: "));
    }

    #[test]
    fn formats_offsets() {
        assert_eq!(format_offset(Duration::from_millis(1200)), "   1.200s");
    }

    #[test]
    fn preview_escapes_and_truncates() {
        assert_eq!(preview_text("a\nb", 10), "a\\nb");
        assert_eq!(preview_text("abcdef", 3), "abc…");
    }
}
