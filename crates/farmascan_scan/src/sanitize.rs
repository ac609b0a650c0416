//! Payload sanitization
//!
//! Strips characters that have no business in a routable payload and trims
//! surrounding whitespace. Everything downstream only ever sees a
//! [`SanitizedPayload`].

use std::fmt;
use std::ops::Deref;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// A payload with control characters and BOMs removed and whitespace trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedPayload(String);

impl SanitizedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in Unicode scalar values (what the length limit counts).
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for SanitizedPayload {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// True for characters stripped by [`sanitize`]: C0, DEL, C1 and the BOM.
pub fn is_stripped_char(ch: char) -> bool {
    ch.is_control() || ch == BYTE_ORDER_MARK
}

/// Strip control characters and BOMs, then trim surrounding whitespace.
pub fn sanitize(raw: &str) -> SanitizedPayload {
    if !raw.chars().any(is_stripped_char) {
        return SanitizedPayload(raw.trim().to_string());
    }
    let stripped: String = raw.chars().filter(|&ch| !is_stripped_char(ch)).collect();
    SanitizedPayload(stripped.trim().to_string())
}
