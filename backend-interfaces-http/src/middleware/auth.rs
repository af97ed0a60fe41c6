use std::io::Read;

use anyhow::{anyhow, Result};
use axum::http::HeaderMap;
use flate2::read::GzDecoder;

use backend_domain::{ActivityEnvelope, ActivityEvent, RuntimeConfig};

pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

pub fn parse_events(headers: &HeaderMap, body: &[u8]) -> Result<Vec<ActivityEvent>> {
    let content = maybe_gunzip(headers, body)?;
    let envelope: ActivityEnvelope = serde_json::from_str(&content)?;
    if envelope.schema_version.trim() != "v1" {
        return Err(anyhow!(
            "unsupported schema_version '{}', expected 'v1'",
            envelope.schema_version
        ));
    }
    Ok(envelope.events)
}

fn maybe_gunzip(headers: &HeaderMap, body: &[u8]) -> Result<String> {
    if let Some(encoding) = headers.get("Content-Encoding") {
        if encoding.to_str().unwrap_or("") == "gzip" {
            let mut decoder = GzDecoder::new(body);
            let mut out = String::new();
            decoder.read_to_string(&mut out)?;
            return Ok(out);
        }
    }
    Ok(String::from_utf8(body.to_vec())?)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_schema_version() {
        let body = br#"{"schema_version":"v2","events":[]}"#;
        assert!(parse_events(&HeaderMap::new(), body).is_err());
    }

    #[test]
    fn parses_plain_json_envelope() {
        let body = br#"{
            "schema_version": "v1",
            "events": [
                {"user_id": "p1", "event_type": "purchase", "amount": 4.99}
            ]
        }"#;
        let events = parse_events(&HeaderMap::new(), body).expect("parse");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].user_id, "p1");
        assert_eq!(events[0].amount, Some(4.99));
        assert_eq!(events[0].timestamp_ms, 0);
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        let body = br#"{
            "schema_version": "v1",
            "events": [{"user_id": "p1", "event_type": "teleport"}]
        }"#;
        assert!(parse_events(&HeaderMap::new(), body).is_err());
    }
}
