//! Stream events and single-line parsing.

use serde::Deserialize;
use tracing::warn;

/// Prefix of every payload-carrying line.
const DATA_PREFIX: &str = "data:";

/// Terminal marker sent as the last payload.
const DONE_MARKER: &str = "[DONE]";

/// One decoded event from the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A piece of generated text.
    Token(String),
    /// The server finished the stream.
    Done,
    /// The server reported a failure mid-stream.
    Error(String),
}

impl StreamEvent {
    /// Returns true if no further events follow this one.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error(_))
    }
}

/// JSON body of a `data:` line.
#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Parses one line of the stream (without its trailing newline).
///
/// Returns `None` for lines that carry nothing: blanks, comments, other
/// fields, and `data:` payloads that are not understood. Unparseable
/// payloads are logged and skipped rather than failing the whole reply.
#[must_use]
pub fn parse_line(line: &str) -> Option<StreamEvent> {
    let line = line.trim_end_matches('\r');
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();

    if payload.is_empty() {
        return None;
    }

    if payload == DONE_MARKER {
        return Some(StreamEvent::Done);
    }

    match serde_json::from_str::<Payload>(payload) {
        Ok(Payload {
            error: Some(reason), ..
        }) => Some(StreamEvent::Error(reason)),
        Ok(Payload {
            token: Some(token), ..
        }) => Some(StreamEvent::Token(token)),
        Ok(_) => None,
        Err(e) => {
            warn!("Skipping malformed stream payload ({e}): {payload}");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token() {
        assert_eq!(
            parse_line(r#"data: {"token": "hello"}"#),
            Some(StreamEvent::Token("hello".into()))
        );
    }

    #[test]
    fn test_parse_token_without_space() {
        assert_eq!(
            parse_line(r#"data:{"token":"hi"}"#),
            Some(StreamEvent::Token("hi".into()))
        );
    }

    #[test]
    fn test_parse_token_keeps_inner_whitespace() {
        assert_eq!(
            parse_line(r#"data: {"token": "  two spaces"}"#),
            Some(StreamEvent::Token("  two spaces".into()))
        );
    }

    #[test]
    fn test_parse_done() {
        assert_eq!(parse_line("data: [DONE]"), Some(StreamEvent::Done));
        assert_eq!(parse_line("data: [DONE]\r"), Some(StreamEvent::Done));
    }

    #[test]
    fn test_parse_error() {
        assert_eq!(
            parse_line(r#"data: {"error": "model overloaded"}"#),
            Some(StreamEvent::Error("model overloaded".into()))
        );
    }

    #[test]
    fn test_ignored_lines() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line(": keep-alive"), None);
        assert_eq!(parse_line("event: message"), None);
        assert_eq!(parse_line("data:"), None);
        assert_eq!(parse_line(r#"data: {"other": 1}"#), None);
    }

    #[test]
    fn test_malformed_payload_is_skipped() {
        assert_eq!(parse_line("data: {not json"), None);
    }

    #[test]
    fn test_unicode_token() {
        assert_eq!(
            parse_line(r#"data: {"token": "今天很开心"}"#),
            Some(StreamEvent::Token("今天很开心".into()))
        );
    }

    #[test]
    fn test_is_terminal() {
        assert!(StreamEvent::Done.is_terminal());
        assert!(StreamEvent::Error(String::new()).is_terminal());
        assert!(!StreamEvent::Token("x".into()).is_terminal());
    }
}
