mod feedback;
mod message;
mod request;
mod thread;
pub mod wire;

pub use feedback::{FeedbackClass, FeedbackRequest, ParseFeedbackClassError};
pub use message::Message;
pub use request::{AddMessageRequest, ThreadNameRequest};
pub use thread::{Thread, PLACEHOLDER_NAME};

use serde::{Deserialize, Deserializer};

/// Helper to deserialize id as either string or integer
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Helper to deserialize a nullable list as empty
/// Handles both missing fields and explicit null values
pub(crate) fn deserialize_nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct IdHolder {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
    }

    #[derive(Debug, Deserialize)]
    struct ListHolder {
        #[serde(default, deserialize_with = "deserialize_nullable_vec")]
        items: Vec<u32>,
    }

    #[test]
    fn test_deserialize_id_integer() {
        let h: IdHolder = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(h.id, "42");
    }

    #[test]
    fn test_deserialize_id_string() {
        let h: IdHolder = serde_json::from_str(r#"{"id": "abc-1"}"#).unwrap();
        assert_eq!(h.id, "abc-1");
    }

    #[test]
    fn test_deserialize_id_rejects_other_types() {
        assert!(serde_json::from_str::<IdHolder>(r#"{"id": true}"#).is_err());
        assert!(serde_json::from_str::<IdHolder>(r#"{"id": null}"#).is_err());
    }

    #[test]
    fn test_nullable_vec_missing_null_and_present() {
        let missing: ListHolder = serde_json::from_str("{}").unwrap();
        assert!(missing.items.is_empty());

        let null: ListHolder = serde_json::from_str(r#"{"items": null}"#).unwrap();
        assert!(null.items.is_empty());

        let present: ListHolder = serde_json::from_str(r#"{"items": [1, 2]}"#).unwrap();
        assert_eq!(present.items, vec![1, 2]);
    }
}
