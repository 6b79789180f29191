//! Flag codec
//!
//! Decisions are persisted as the literals `"1"` and `"0"`.

use consent_types::{ConsentValue, Decision};

/// Flag literal for a granted id.
pub const GRANTED_FLAG: &str = "1";

/// Flag literal for a denied id.
pub const DENIED_FLAG: &str = "0";

#[must_use]
pub fn encode(decision: Decision) -> &'static str {
    match decision {
        Decision::Granted => GRANTED_FLAG,
        Decision::Denied => DENIED_FLAG,
    }
}

/// Decode a stored flag. Surrounding whitespace is ignored; any other value
/// is `Unknown`.
#[must_use]
pub fn decode(raw: &str) -> ConsentValue {
    match raw.trim() {
        GRANTED_FLAG => ConsentValue::Granted,
        DENIED_FLAG => ConsentValue::Denied,
        _ => ConsentValue::Unknown,
    }
}
