//! Wire schemas for the thread endpoints and the rules that map them onto
//! [`Thread`].
//!
//! Each default the server can leave out has its own named rule so the
//! mapping can be tested piece by piece.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::{deserialize_id, deserialize_nullable_vec, Message, Thread, PLACEHOLDER_NAME};

/// `POST /threads` response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CreateThreadResponse {
    #[serde(deserialize_with = "deserialize_id")]
    pub thread_id: String,
}

impl CreateThreadResponse {
    pub fn into_thread(self) -> Thread {
        Thread::new_local(self.thread_id)
    }
}

/// `GET /threads/{id}` response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ThreadDetailDto {
    #[serde(default)]
    pub thread_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_vec")]
    pub messages: Vec<Message>,
}

impl ThreadDetailDto {
    /// The detail payload carries no id; the caller's id is authoritative.
    pub fn into_thread(self, thread_id: &str) -> Thread {
        Thread {
            id: thread_id.to_string(),
            name: detail_name(self.thread_name),
            messages: self.messages,
            date: None,
        }
    }
}

/// One entry of the `GET /threads` response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ThreadSummaryDto {
    #[serde(deserialize_with = "deserialize_id")]
    pub thread_id: String,
    #[serde(default)]
    pub thread_name: Option<String>,
    #[serde(default)]
    pub updated_at: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_nullable_vec")]
    pub messages: Vec<Message>,
}

impl ThreadSummaryDto {
    pub fn into_thread(self) -> Thread {
        let date = parse_updated_at(&self.thread_id, self.updated_at.as_ref());
        Thread {
            id: self.thread_id,
            name: summary_name(self.thread_name),
            messages: self.messages,
            date,
        }
    }
}

/// Detail name rule: only a missing or null name gets the placeholder.
pub fn detail_name(name: Option<String>) -> String {
    name.unwrap_or_else(|| PLACEHOLDER_NAME.to_string())
}

/// List name rule: a missing, null or empty name gets the placeholder.
pub fn summary_name(name: Option<String>) -> String {
    match name {
        Some(name) if !name.is_empty() => name,
        _ => PLACEHOLDER_NAME.to_string(),
    }
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// List date rule: RFC 3339, or a zone-less timestamp taken as UTC.
///
/// Missing or null gives `None`. Anything unparseable also gives `None`
/// and is logged; it is never replaced by the current time.
pub fn parse_updated_at(thread_id: &str, value: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = match value {
        None | Some(Value::Null) => return None,
        Some(Value::String(raw)) => raw.trim(),
        Some(other) => {
            tracing::warn!(thread_id, updated_at = %other, "updated_at is not a string");
            return None;
        }
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    tracing::warn!(thread_id, updated_at = raw, "unparseable updated_at");
    None
}

/// True when a thread payload carries nothing usable: an empty or
/// whitespace body, `null`, `{}`, `[]` or a blank string.
pub fn is_blank_payload(body: &str) -> bool {
    let body = body.trim();
    if body.is_empty() {
        return true;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Null) => true,
        Ok(Value::Object(map)) => map.is_empty(),
        Ok(Value::Array(items)) => items.is_empty(),
        Ok(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_create_response_integer_id() {
        let dto: CreateThreadResponse = serde_json::from_str(r#"{"thread_id": 42}"#).unwrap();
        let thread = dto.into_thread();
        assert_eq!(thread.id, "42");
        assert_eq!(thread.name, "New chat");
        assert!(thread.messages.is_empty());
        assert!(thread.date.is_some());
    }

    #[test]
    fn test_create_response_requires_id() {
        assert!(serde_json::from_str::<CreateThreadResponse>("{}").is_err());
    }

    #[test]
    fn test_detail_name_rule() {
        assert_eq!(detail_name(None), "New chat");
        assert_eq!(detail_name(Some("Hajj".into())), "Hajj");
        // empty survives on the detail endpoint
        assert_eq!(detail_name(Some(String::new())), "");
    }

    #[test]
    fn test_summary_name_rule() {
        assert_eq!(summary_name(None), "New chat");
        assert_eq!(summary_name(Some(String::new())), "New chat");
        assert_eq!(summary_name(Some("Hajj".into())), "Hajj");
    }

    #[test]
    fn test_detail_maps_with_caller_id() {
        let dto: ThreadDetailDto = serde_json::from_value(json!({
            "thread_name": null,
            "messages": [{"role": "user", "content": "hi"}]
        }))
        .unwrap();
        let thread = dto.into_thread("abc");

        assert_eq!(thread.id, "abc");
        assert_eq!(thread.name, "New chat");
        assert_eq!(thread.messages.len(), 1);
        assert_eq!(thread.date, None);
    }

    #[test]
    fn test_detail_null_messages_become_empty() {
        let dto: ThreadDetailDto =
            serde_json::from_value(json!({"thread_name": "x", "messages": null})).unwrap();
        assert!(dto.into_thread("1").messages.is_empty());
    }

    #[test]
    fn test_summary_minimal_entry() {
        let dto: ThreadSummaryDto = serde_json::from_value(json!({"thread_id": 7})).unwrap();
        assert_eq!(
            dto.into_thread(),
            Thread {
                id: "7".to_string(),
                name: "New chat".to_string(),
                messages: vec![],
                date: None,
            }
        );
    }

    #[test]
    fn test_updated_at_rfc3339() {
        let value = json!("2024-05-01T12:30:00+02:00");
        assert_eq!(
            parse_updated_at("1", Some(&value)),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_updated_at_naive_is_utc() {
        let value = json!("2024-05-01T12:30:00.250");
        let parsed = parse_updated_at("1", Some(&value)).unwrap();
        assert_eq!(parsed.timestamp(), 1714566600);
        assert_eq!(parsed.timestamp_subsec_millis(), 250);

        let spaced = json!("2024-05-01 12:30:00");
        assert_eq!(parse_updated_at("1", Some(&spaced)).unwrap().timestamp(), 1714566600);
    }

    #[test]
    fn test_updated_at_missing_or_bad_is_none() {
        assert_eq!(parse_updated_at("1", None), None);
        assert_eq!(parse_updated_at("1", Some(&Value::Null)), None);
        assert_eq!(parse_updated_at("1", Some(&json!("yesterday"))), None);
        assert_eq!(parse_updated_at("1", Some(&json!(1714566600))), None);
    }

    #[test]
    fn test_blank_payloads() {
        for body in ["", "   \n", "null", "{}", "[]", "\"\"", "\"  \""] {
            assert!(is_blank_payload(body), "{:?} should be blank", body);
        }
    }

    #[test]
    fn test_non_blank_payloads() {
        for body in [r#"{"thread_name": null}"#, "[1]", "\"x\"", "0", "false", "not json"] {
            assert!(!is_blank_payload(body), "{:?} should not be blank", body);
        }
    }
}
