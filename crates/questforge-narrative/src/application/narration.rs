//! Optional generative narration with a rule-based fallback.
//!
//! The narrator gets one attempt bounded by a timeout. Any failure, timeout
//! or unusable output leaves the rule-based narrative in place.

use std::time::Duration;

use questforge_core::error::DomainError;
use questforge_core::narrator::{NarrationRequest, Narrator};
use tracing::{debug, warn};

/// Default bound on one narrator call.
pub const DEFAULT_NARRATOR_TIMEOUT: Duration = Duration::from_secs(15);

/// Extracts the narrative from raw narrator output.
///
/// Accepts a JSON object with a string `message` field, or plain prose.
///
/// # Errors
///
/// Returns `DomainError::Parse` for blank output, or for a JSON object
/// without a usable `message`.
pub fn parse_narrator_output(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Parse("narrator returned no text".into()));
    }
    if trimmed.starts_with('{') {
        let value: serde_json::Value = serde_json::from_str(trimmed)
            .map_err(|e| DomainError::Parse(format!("narrator returned malformed JSON: {e}")))?;
        return value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| DomainError::Parse("narrator JSON has no message".into()));
    }
    Ok(trimmed.to_owned())
}

/// Asks `narrator` to rewrite `request.base_narrative`.
///
/// Returns the base narrative unchanged when no narrator is configured, the
/// call fails, the output cannot be parsed, or `timeout` elapses first.
pub async fn narrate_with_fallback(
    narrator: Option<&dyn Narrator>,
    request: &NarrationRequest,
    timeout: Duration,
) -> String {
    let Some(narrator) = narrator else {
        return request.base_narrative.clone();
    };

    let outcome = match tokio::time::timeout(timeout, narrator.narrate(request)).await {
        Ok(result) => result.and_then(|raw| parse_narrator_output(&raw)),
        Err(_) => Err(DomainError::ExternalServiceTimeout(
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        )),
    };

    match outcome {
        Ok(text) => {
            debug!(action = %request.action, "narrator rewrite accepted");
            text
        }
        Err(e) => {
            warn!(action = %request.action, error = %e, "narrator unavailable; using rule-based narrative");
            request.base_narrative.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use questforge_test_support::{FailingNarrator, ScriptedNarrator, SlowNarrator};

    use super::*;

    fn request() -> NarrationRequest {
        NarrationRequest {
            action: "look".to_owned(),
            base_narrative: "You see a tavern.".to_owned(),
            character_name: "Adventurer".to_owned(),
            location: "The Rusty Tankard".to_owned(),
            recent_messages: vec!["I look around".to_owned()],
        }
    }

    #[test]
    fn test_parse_accepts_json_message() {
        let text = parse_narrator_output(r#"{"message": " The fire crackles. "}"#).unwrap();
        assert_eq!(text, "The fire crackles.");
    }

    #[test]
    fn test_parse_accepts_plain_prose() {
        assert_eq!(parse_narrator_output("  Rain falls.\n").unwrap(), "Rain falls.");
    }

    #[test]
    fn test_parse_rejects_blank_and_messageless_json() {
        assert!(matches!(parse_narrator_output("   "), Err(DomainError::Parse(_))));
        assert!(matches!(
            parse_narrator_output(r#"{"text": "hi"}"#),
            Err(DomainError::Parse(_))
        ));
        assert!(matches!(parse_narrator_output("{oops"), Err(DomainError::Parse(_))));
    }

    #[tokio::test]
    async fn test_no_narrator_returns_base() {
        let text = narrate_with_fallback(None, &request(), DEFAULT_NARRATOR_TIMEOUT).await;
        assert_eq!(text, "You see a tavern.");
    }

    #[tokio::test]
    async fn test_scripted_narrator_rewrites() {
        // Arrange
        let narrator = ScriptedNarrator::new(r#"{"message":"Lanterns sway over a crowded room."}"#);

        // Act
        let text =
            narrate_with_fallback(Some(&narrator), &request(), DEFAULT_NARRATOR_TIMEOUT).await;

        // Assert
        assert_eq!(text, "Lanterns sway over a crowded room.");
        assert_eq!(narrator.requests().len(), 1);
        assert_eq!(narrator.requests()[0].base_narrative, "You see a tavern.");
    }

    #[tokio::test]
    async fn test_failing_narrator_falls_back() {
        let text =
            narrate_with_fallback(Some(&FailingNarrator), &request(), DEFAULT_NARRATOR_TIMEOUT)
                .await;
        assert_eq!(text, "You see a tavern.");
    }

    #[tokio::test]
    async fn test_slow_narrator_times_out_and_falls_back() {
        let narrator = SlowNarrator(Duration::from_secs(60));

        let text =
            narrate_with_fallback(Some(&narrator), &request(), Duration::from_millis(50)).await;

        assert_eq!(text, "You see a tavern.");
    }
}
