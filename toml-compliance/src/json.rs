//! JSON loading with source attribution.
//!
//! Equality between loaded documents is `serde_json::Value` equality: object
//! key order is irrelevant and numbers compare strictly by kind, so `1` and
//! `1.0` are different values.

use serde_json::Value;

use crate::failure::{Failure, FailureReason, JsonSource};

/// Parses `content` as JSON, attributing any error to `source`.
///
/// # Errors
///
/// Returns a [`Failure`] naming `source` and carrying the parser message when
/// `content` is not well-formed JSON.
pub fn load_json(content: &[u8], source: JsonSource) -> Result<Value, Failure> {
    serde_json::from_slice(content)
        .map_err(|err| Failure::new(FailureReason::UnparsableJson(source)).with_cause(err))
}
