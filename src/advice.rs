//! "Lesson of the day" shown on the game-over screen.
//!
//! Fetching is best effort: callers get an explicit [`AdviceError`] and pick
//! the matching fallback line with [`AdviceError::fallback`].

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_URL: &str = "https://api.adviceslip.com/advice";

/// Shown when the endpoint could not be reached or refused the request.
pub const CONNECTION_FALLBACK: &str = "Check your internet connection.";
/// Shown when the endpoint answered with something unusable.
pub const REST_FALLBACK: &str = "Rest is important too.";

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("advice request failed: {0}")]
    Transport(String),

    #[error("advice endpoint answered HTTP {0}")]
    Status(u16),

    #[error("advice body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("advice body has no slip.advice field")]
    MissingField,
}

impl AdviceError {
    pub fn fallback(&self) -> &'static str {
        match self {
            AdviceError::Transport(_) | AdviceError::Status(_) => CONNECTION_FALLBACK,
            AdviceError::Parse(_) | AdviceError::MissingField => REST_FALLBACK,
        }
    }
}

pub trait AdviceSource {
    fn fetch(&self) -> Result<String, AdviceError>;
}

#[derive(Debug, Deserialize)]
struct Envelope {
    slip: Option<Slip>,
}

#[derive(Debug, Deserialize)]
struct Slip {
    advice: Option<String>,
}

/// Extracts `slip.advice` from an endpoint response body.
pub fn parse_advice(body: &str) -> Result<String, AdviceError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    envelope
        .slip
        .and_then(|s| s.advice)
        .ok_or(AdviceError::MissingField)
}

/// The advice text, or the fallback line for whatever went wrong.
pub fn advice_or_fallback(source: &dyn AdviceSource) -> String {
    match source.fetch() {
        Ok(advice) => {
            info!("fetched advice");
            advice
        }
        Err(e) => {
            warn!(error = %e, "using fallback advice");
            e.fallback().to_string()
        }
    }
}

/// Blocking GET against the advice endpoint.
pub struct HttpAdvice {
    agent: ureq::Agent,
    url: String,
}

impl HttpAdvice {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            url: url.into(),
        }
    }
}

impl AdviceSource for HttpAdvice {
    fn fetch(&self) -> Result<String, AdviceError> {
        let response = match self.agent.get(&self.url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(AdviceError::Status(code)),
            Err(e) => return Err(AdviceError::Transport(e.to_string())),
        };
        if response.status() != 200 {
            return Err(AdviceError::Status(response.status()));
        }
        let body = response
            .into_string()
            .map_err(|e| AdviceError::Transport(e.to_string()))?;
        parse_advice(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(fn() -> Result<String, AdviceError>);

    impl AdviceSource for Canned {
        fn fetch(&self) -> Result<String, AdviceError> {
            (self.0)()
        }
    }

    #[test]
    fn parses_slip() {
        let body = r#"{"slip": {"id": 41, "advice": "Never run with scissors."}}"#;
        assert_eq!(parse_advice(body).unwrap(), "Never run with scissors.");
    }

    #[test]
    fn missing_field() {
        assert!(matches!(parse_advice(r#"{"slip": {"id": 1}}"#), Err(AdviceError::MissingField)));
        assert!(matches!(parse_advice(r#"{"message": "x"}"#), Err(AdviceError::MissingField)));
    }

    #[test]
    fn not_json() {
        assert!(matches!(parse_advice("<html>"), Err(AdviceError::Parse(_))));
    }

    #[test]
    fn network_failure_uses_connection_fallback() {
        let src = Canned(|| Err(AdviceError::Transport("connection refused".into())));
        assert_eq!(advice_or_fallback(&src), CONNECTION_FALLBACK);
    }

    #[test]
    fn bad_status_uses_connection_fallback() {
        let src = Canned(|| Err(AdviceError::Status(503)));
        assert_eq!(advice_or_fallback(&src), CONNECTION_FALLBACK);
    }

    #[test]
    fn parse_failure_uses_rest_fallback() {
        let src = Canned(|| parse_advice("{not json"));
        assert_eq!(advice_or_fallback(&src), REST_FALLBACK);
    }

    #[test]
    fn success_passes_through() {
        let src = Canned(|| Ok("Smile.".into()));
        assert_eq!(advice_or_fallback(&src), "Smile.");
    }

    #[test]
    #[ignore = "opens a socket to 127.0.0.1:9"]
    fn unreachable_host_is_a_transport_error() {
        let http = HttpAdvice::new("http://127.0.0.1:9/advice", Duration::from_millis(500));
        let err = http.fetch().unwrap_err();
        assert_eq!(err.fallback(), CONNECTION_FALLBACK);
    }
}
