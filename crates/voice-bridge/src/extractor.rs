//! Transcript extractor — pulls trip fields out of free-text conversation
//! content with regex heuristics and assembles a trip-request-shaped object.
//!
//! This is a known best-effort heuristic, not a contract: "from" also
//! matches unrelated phrases, and no disambiguation policy exists. Fields
//! that fail to match are simply omitted.

use regex::Regex;
use serde_json::{json, Map, Value};

use door_core::types::{BudgetTier, TransportMode, TRAVEL_STYLES};

pub struct TranscriptExtractor {
    destination: Regex,
    origin: Regex,
    iso_date: Regex,
    duration: Regex,
    group: Regex,
}

impl TranscriptExtractor {
    pub fn new() -> Self {
        Self {
            destination: Regex::new(
                r"\b(?i:to|visit(?:ing)?)\b\s+([A-Z][a-zA-Z]*(?:(?:,\s*|\s+)[A-Z][a-zA-Z]*)*)",
            )
            .expect("static pattern"),
            origin: Regex::new(
                r"\b(?i:from)\b\s+([A-Z][a-zA-Z]*(?:(?:,\s*|\s+)[A-Z][a-zA-Z]*)*)",
            )
            .expect("static pattern"),
            iso_date: Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("static pattern"),
            duration: Regex::new(r"(?i)\b(\d{1,2})\s*(?:days?|nights?)\b").expect("static pattern"),
            group: Regex::new(r"(?i)\b(\d{1,2})\s*(?:people|persons|travellers|travelers|of us)\b")
                .expect("static pattern"),
        }
    }

    /// Extracts whatever trip fields the transcript yields. Returns `None`
    /// when nothing at all was recognized.
    pub fn extract(&self, transcript: &str) -> Option<Value> {
        let mut fields = Map::new();

        if let Some(destination) = self.capture(&self.destination, transcript) {
            fields.insert("destination".into(), json!(destination));
        }
        if let Some(origin) = self.capture(&self.origin, transcript) {
            fields.insert("current_city".into(), json!(origin));
        }

        let dates: Vec<&str> = self
            .iso_date
            .captures_iter(transcript)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
        if let Some(start) = dates.first() {
            fields.insert("start_date".into(), json!(start));
        }
        if let Some(end) = dates.get(1) {
            fields.insert("end_date".into(), json!(end));
        }

        if let Some(days) = self.capture(&self.duration, transcript) {
            if let Ok(days) = days.parse::<u16>() {
                fields.insert("duration_days".into(), json!(days));
            }
        }
        if let Some(size) = self.capture(&self.group, transcript) {
            fields.insert("group_size".into(), json!(size));
        }

        if let Some(tier) = budget_from_keywords(transcript) {
            fields.insert("budget".into(), json!(tier.description()));
        }
        if let Some(mode) = transport_from_keywords(transcript) {
            fields.insert("transport_mode".into(), json!(mode));
        }

        let styles = styles_from_keywords(transcript);
        if !styles.is_empty() {
            fields.insert("travel_style".into(), json!(styles));
        }

        if fields.is_empty() {
            None
        } else {
            Some(Value::Object(fields))
        }
    }

    fn capture(&self, pattern: &Regex, transcript: &str) -> Option<String> {
        pattern
            .captures(transcript)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim_end_matches([',', '.', '!', '?']).to_string())
    }
}

impl Default for TranscriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn budget_from_keywords(transcript: &str) -> Option<BudgetTier> {
    let lower = transcript.to_lowercase();
    if ["luxury", "premium", "five star", "5 star"]
        .iter()
        .any(|k| lower.contains(k))
    {
        Some(BudgetTier::Luxury)
    } else if ["budget", "cheap", "affordable", "backpack"]
        .iter()
        .any(|k| lower.contains(k))
    {
        Some(BudgetTier::Budget)
    } else if ["mid-range", "mid range", "moderate"]
        .iter()
        .any(|k| lower.contains(k))
    {
        Some(BudgetTier::MidRange)
    } else {
        None
    }
}

fn transport_from_keywords(transcript: &str) -> Option<TransportMode> {
    let lower = transcript.to_lowercase();
    if ["flight", "fly", "flying", "plane"].iter().any(|k| lower.contains(k)) {
        Some(TransportMode::Flight)
    } else if lower.contains("train") {
        Some(TransportMode::Train)
    } else if ["cruise", "ship", "boat"].iter().any(|k| lower.contains(k)) {
        Some(TransportMode::Ship)
    } else if lower.contains("bus") {
        Some(TransportMode::Bus)
    } else {
        None
    }
}

/// Canonical travel-style tags whose keyword appears in the transcript.
fn styles_from_keywords(transcript: &str) -> Vec<&'static str> {
    let lower = transcript.to_lowercase();
    TRAVEL_STYLES
        .iter()
        .filter(|style| {
            let keyword = style
                .split([' ', '&'])
                .next()
                .unwrap_or(style)
                .to_lowercase();
            lower.contains(&keyword)
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_destination_and_origin() {
        let extractor = TranscriptExtractor::new();
        let fields = extractor
            .extract("I'd love a trip to Tokyo, Japan from Chennai next month")
            .unwrap();
        assert_eq!(fields["destination"], "Tokyo, Japan");
        assert_eq!(fields["current_city"], "Chennai");
    }

    #[test]
    fn test_extracts_dates_duration_and_group() {
        let extractor = TranscriptExtractor::new();
        let fields = extractor
            .extract("We are 4 people travelling 2024-06-01 to 2024-06-08, about 7 days")
            .unwrap();
        assert_eq!(fields["start_date"], "2024-06-01");
        assert_eq!(fields["end_date"], "2024-06-08");
        assert_eq!(fields["duration_days"], 7);
        assert_eq!(fields["group_size"], "4");
    }

    #[test]
    fn test_budget_keyword_maps_to_description() {
        let extractor = TranscriptExtractor::new();
        let fields = extractor
            .extract("Something luxury, we want to visit Dubai")
            .unwrap();
        assert_eq!(fields["budget"], "₹25,000+/day");
    }

    #[test]
    fn test_styles_and_transport() {
        let extractor = TranscriptExtractor::new();
        let fields = extractor
            .extract("We love food and photography, flying to Paris")
            .unwrap();
        let styles = fields["travel_style"].as_array().unwrap();
        assert!(styles.iter().any(|s| s == "Food & Dining"));
        assert!(styles.iter().any(|s| s == "Photography"));
        assert_eq!(fields["transport_mode"], "flight");
    }

    #[test]
    fn test_nothing_recognized_yields_none() {
        let extractor = TranscriptExtractor::new();
        assert!(extractor.extract("hello there, nice weather").is_none());
    }
}
