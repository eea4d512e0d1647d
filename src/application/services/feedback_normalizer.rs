//! Coerces untrusted model output into a [`SalesFeedback`].
//!
//! Only a response with no extractable JSON is a hard error. Every field-level anomaly falls
//! back to a default and is logged.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::domain::{FeedbackMetrics, KeyMoment, SalesFeedback};

pub const FALLBACK_SUMMARY: &str = "Unable to generate summary for this call.";
pub const FALLBACK_STRENGTH: &str = "Unable to identify specific strengths from the transcript.";
pub const FALLBACK_IMPROVEMENT: &str =
    "Unable to identify specific improvements from the transcript.";
pub const UNKNOWN_SPEAKER: &str = "Unknown";

const MIN_SCORE: f64 = 1.0;
const MAX_SCORE: f64 = 10.0;

static THINK_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<think(?:ing)?>.*?</think(?:ing)?>").expect("static regex is valid")
});
static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("static regex is valid"));
static ANY_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```\s*(.*?)\s*```").expect("static regex is valid"));
static BRACED_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex is valid"));

#[derive(Debug, thiserror::Error)]
#[error(
    "Failed to extract valid JSON from LLM response. The model may not have returned properly formatted JSON. ({0})"
)]
pub struct UnparsableResponse(pub String);

/// Parses the whole response, then a fenced block, then the outermost `{...}` span.
pub fn extract_json_from_response(content: &str) -> Result<Value, UnparsableResponse> {
    if let Ok(value) = serde_json::from_str::<Value>(content) {
        return Ok(value);
    }

    let content = THINK_BLOCK.replace_all(content, "");
    if let Ok(value) = serde_json::from_str::<Value>(content.trim()) {
        return Ok(value);
    }

    let candidates = [
        JSON_FENCE
            .captures(&content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str()),
        ANY_FENCE
            .captures(&content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str()),
        BRACED_SPAN.find(&content).map(|m| m.as_str()),
    ];

    for candidate in candidates.into_iter().flatten() {
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            return Ok(value);
        }
    }

    Err(UnparsableResponse(format!(
        "{} chars, no parsable JSON object",
        content.len()
    )))
}

pub fn normalize_feedback(parsed: &Value) -> Result<SalesFeedback, UnparsableResponse> {
    let data = parsed
        .as_object()
        .ok_or_else(|| UnparsableResponse("LLM response is not a valid object".to_string()))?;

    let overall_score = clamp_score(data.get("overallScore"), FeedbackMetrics::DEFAULT_SCORE);
    if data.get("overallScore").and_then(Value::as_f64) != Some(f64::from(overall_score)) {
        tracing::warn!(
            observed = ?data.get("overallScore"),
            normalized = overall_score,
            "Normalized overallScore"
        );
    }

    Ok(SalesFeedback {
        overall_score,
        summary: normalize_summary(data.get("summary")),
        strengths: normalize_string_list(data.get("strengths"), "strengths", FALLBACK_STRENGTH),
        improvements: normalize_string_list(
            data.get("improvements"),
            "improvements",
            FALLBACK_IMPROVEMENT,
        ),
        key_moments: normalize_key_moments(data.get("keyMoments")),
        metrics: normalize_metrics(data.get("metrics")),
    })
}

/// Rounds and clamps to `1..=10`; anything that is not a JSON number yields `default`.
pub fn clamp_score(value: Option<&Value>, default: u8) -> u8 {
    match value.and_then(Value::as_f64) {
        Some(n) if n.is_finite() => n.round().clamp(MIN_SCORE, MAX_SCORE) as u8,
        _ => default,
    }
}

fn normalize_summary(value: Option<&Value>) -> String {
    match value.and_then(Value::as_str).map(str::trim) {
        Some(summary) if !summary.is_empty() => summary.to_string(),
        _ => {
            tracing::warn!("Missing or invalid summary, using default");
            FALLBACK_SUMMARY.to_string()
        }
    }
}

fn normalize_string_list(value: Option<&Value>, field: &str, fallback: &str) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        tracing::warn!(field, "Missing array, using default");
        return vec![fallback.to_string()];
    };

    let entries: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if entries.is_empty() {
        tracing::warn!(field, "No valid entries found, using default");
        return vec![fallback.to_string()];
    }

    if entries.len() != items.len() {
        tracing::warn!(
            field,
            dropped = items.len() - entries.len(),
            "Dropped invalid entries"
        );
    }

    entries
}

fn normalize_key_moments(value: Option<&Value>) -> Vec<KeyMoment> {
    let Some(items) = value.and_then(Value::as_array) else {
        tracing::warn!("Missing keyMoments array, using empty array");
        return Vec::new();
    };

    let moments: Vec<KeyMoment> = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(key_moment)
        .collect();

    if moments.len() != items.len() {
        tracing::warn!(
            dropped = items.len() - moments.len(),
            "Dropped keyMoments without an observation"
        );
    }

    moments
}

fn key_moment(entry: &Map<String, Value>) -> Option<KeyMoment> {
    let observation = entry
        .get("observation")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|o| !o.is_empty())?;

    Some(KeyMoment {
        timestamp: entry
            .get("timestamp")
            .and_then(Value::as_str)
            .map(String::from),
        speaker: entry
            .get("speaker")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SPEAKER)
            .to_string(),
        observation: observation.to_string(),
    })
}

fn normalize_metrics(value: Option<&Value>) -> FeedbackMetrics {
    let Some(metrics) = value.and_then(Value::as_object) else {
        tracing::warn!("Missing metrics object, using defaults");
        return FeedbackMetrics::default();
    };

    let score = |field: &str| {
        let normalized = clamp_score(metrics.get(field), FeedbackMetrics::DEFAULT_SCORE);
        if metrics.get(field).and_then(Value::as_f64) != Some(f64::from(normalized)) {
            tracing::warn!(
                field,
                observed = ?metrics.get(field),
                normalized,
                "Normalized metric score"
            );
        }
        normalized
    };

    FeedbackMetrics {
        tone_professionalism: score("toneProfessionalism"),
        active_listening: score("activeListening"),
        objection_handling: score("objectionHandling"),
        closing_technique: score("closingTechnique"),
        product_knowledge: score("productKnowledge"),
    }
}
