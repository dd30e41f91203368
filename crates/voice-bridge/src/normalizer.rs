//! Payload normalizer — reshapes whatever the widget hands over into one
//! flat JSON object before it is POSTed: an `answers` array is mapped by
//! question key, a `form` object is taken as-is, anything else is wrapped
//! raw. Every normalized payload is stamped with a timestamp and its source.

use chrono::Utc;
use serde_json::{json, Map, Value};

/// Source tag stamped onto every forwarded payload.
pub const SOURCE_TAG: &str = "dora-widget";

/// Normalize a widget payload into the webhook's flat object shape.
pub fn normalize(payload: &Value) -> Value {
    let data = match payload.get("answers").and_then(Value::as_array) {
        Some(answers) => map_answers(answers),
        None => match payload.get("form").filter(|f| f.is_object()) {
            Some(form) => form.clone(),
            None => json!({ "raw": payload.clone() }),
        },
    };
    stamp(data)
}

/// Stamp a payload with the submission timestamp and source tag.
pub fn stamp(mut data: Value) -> Value {
    data["submitted_at"] = json!(Utc::now().to_rfc3339());
    data["source"] = json!(SOURCE_TAG);
    data
}

/// Map an answers array (`[{question|key|label, answer|value}, ...]`) into a
/// flat object. Entries without a usable key are skipped.
fn map_answers(answers: &[Value]) -> Value {
    let mut map = Map::new();
    for answer in answers {
        let key = answer
            .get("question")
            .or_else(|| answer.get("key"))
            .or_else(|| answer.get("label"))
            .and_then(Value::as_str);
        let Some(key) = key else { continue };

        let value = answer
            .get("answer")
            .or_else(|| answer.get("value"))
            .cloned()
            .unwrap_or(Value::Null);
        map.insert(key.to_string(), value);
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_array_mapped_by_question() {
        let payload = json!({
            "answers": [
                {"question": "destination", "answer": "Tokyo, Japan"},
                {"key": "group_size", "value": "2"},
                {"label": "budget", "answer": "luxury"},
                {"answer": "orphaned"},
            ]
        });

        let normalized = normalize(&payload);
        assert_eq!(normalized["destination"], "Tokyo, Japan");
        assert_eq!(normalized["group_size"], "2");
        assert_eq!(normalized["budget"], "luxury");
        assert_eq!(normalized["source"], SOURCE_TAG);
        assert!(normalized.get("submitted_at").is_some());
        // The keyless entry was skipped.
        assert_eq!(normalized.as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_form_object_taken_as_is() {
        let payload = json!({
            "form": {"destination": "Bali, Indonesia", "current_city": "Chennai"}
        });

        let normalized = normalize(&payload);
        assert_eq!(normalized["destination"], "Bali, Indonesia");
        assert_eq!(normalized["current_city"], "Chennai");
        assert_eq!(normalized["source"], SOURCE_TAG);
    }

    #[test]
    fn test_unrecognized_payload_wrapped_raw() {
        let payload = json!({"transcript": "I want to go somewhere warm"});

        let normalized = normalize(&payload);
        assert_eq!(normalized["raw"]["transcript"], "I want to go somewhere warm");
        assert_eq!(normalized["source"], SOURCE_TAG);
        assert!(normalized.get("submitted_at").is_some());
    }

    #[test]
    fn test_non_object_payload_wrapped_raw() {
        let payload = json!("just a string");
        let normalized = normalize(&payload);
        assert_eq!(normalized["raw"], "just a string");
    }
}
