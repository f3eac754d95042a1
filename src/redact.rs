//! Credential scrubbing for anything that leaves the process.
//!
//! The API key travels in the upstream URL as a query parameter, and both
//! reqwest transport errors and upstream error bodies have been seen echoing
//! the URL they failed against. Every error message derived from upstream
//! traffic is scrubbed here before it is logged or returned to the caller.

use once_cell::sync::Lazy;
use regex::Regex;

const MASK: &str = "[redacted]";

// Catches `key=<value>` even when the echoed value was percent-encoded or
// truncated and no longer matches the literal credential.
static KEY_PARAM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bkey=[^&\s"')]+"#).unwrap());

/// Remove the credential from `message`.
pub fn scrub(message: &str, key: &str) -> String {
    let scrubbed = if key.is_empty() {
        message.to_string()
    } else {
        message.replace(key, MASK)
    };
    KEY_PARAM_REGEX
        .replace_all(&scrubbed, format!("key={MASK}"))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "AIzaSyTestKey123";

    #[test]
    fn literal_key_is_masked() {
        let out = scrub("request to host failed with key AIzaSyTestKey123", KEY);
        assert!(!out.contains(KEY));
        assert!(out.contains(MASK));
    }

    #[test]
    fn key_query_param_is_masked() {
        let out = scrub(
            "error sending request for url (https://host/v1beta/models/m:generateContent?key=AIzaSyTestKey123)",
            KEY,
        );
        assert!(!out.contains(KEY));
        assert!(out.contains("key=[redacted]"));
    }

    #[test]
    fn encoded_key_param_is_still_masked() {
        // Percent-encoded value no longer matches the literal key
        let out = scrub("url was ...:generateContent?key=AIza%53yTestKey123&alt=json", KEY);
        assert!(!out.contains("AIza%53yTestKey123"));
        assert!(out.contains("key=[redacted]"));
        assert!(out.contains("&alt=json"));
    }

    #[test]
    fn uppercase_param_is_masked() {
        let out = scrub("KEY=whatever rejected", KEY);
        assert!(out.contains("key=[redacted]") || !out.contains("whatever"));
    }

    #[test]
    fn clean_message_passes_through() {
        let msg = "connection refused (os error 111)";
        assert_eq!(scrub(msg, KEY), msg);
    }

    #[test]
    fn empty_key_does_not_mask_everything() {
        let msg = "some error";
        assert_eq!(scrub(msg, ""), msg);
    }
}
