use serde_json::json;

use callcoach::application::services::feedback_normalizer::{
    FALLBACK_IMPROVEMENT, FALLBACK_STRENGTH, FALLBACK_SUMMARY, UNKNOWN_SPEAKER,
};
use callcoach::application::services::{extract_json_from_response, normalize_feedback};
use callcoach::domain::FeedbackMetrics;

#[test]
fn given_out_of_range_scores_when_normalizing_then_clamped_into_one_to_ten() {
    let high = normalize_feedback(&json!({ "overallScore": 15 })).unwrap();
    let low = normalize_feedback(&json!({ "overallScore": -3 })).unwrap();
    let fractional = normalize_feedback(&json!({ "overallScore": 7.6 })).unwrap();

    assert_eq!(high.overall_score, 10);
    assert_eq!(low.overall_score, 1);
    assert_eq!(fractional.overall_score, 8);
}

#[test]
fn given_non_numeric_score_when_normalizing_then_default_is_used() {
    let feedback = normalize_feedback(&json!({ "overallScore": "abc" })).unwrap();

    assert_eq!(feedback.overall_score, 5);
}

#[test]
fn given_empty_object_when_normalizing_then_every_field_has_a_default() {
    let feedback = normalize_feedback(&json!({})).unwrap();

    assert_eq!(feedback.overall_score, 5);
    assert_eq!(feedback.summary, FALLBACK_SUMMARY);
    assert_eq!(feedback.strengths, vec![FALLBACK_STRENGTH.to_string()]);
    assert_eq!(feedback.improvements, vec![FALLBACK_IMPROVEMENT.to_string()]);
    assert!(feedback.key_moments.is_empty());
    assert_eq!(feedback.metrics, FeedbackMetrics::default());
}

#[test]
fn given_empty_strengths_when_normalizing_then_single_fallback_entry() {
    let feedback = normalize_feedback(&json!({ "strengths": [] })).unwrap();

    assert_eq!(feedback.strengths, vec![FALLBACK_STRENGTH.to_string()]);
}

#[test]
fn given_padded_and_invalid_list_entries_when_normalizing_then_trimmed_and_filtered() {
    let feedback = normalize_feedback(&json!({
        "strengths": ["  Good rapport ", "", 42, "Clear agenda"],
        "improvements": "not a list"
    }))
    .unwrap();

    assert_eq!(feedback.strengths, vec!["Good rapport", "Clear agenda"]);
    assert_eq!(feedback.improvements, vec![FALLBACK_IMPROVEMENT.to_string()]);
}

#[test]
fn given_blank_summary_when_normalizing_then_fallback_summary() {
    let feedback = normalize_feedback(&json!({ "summary": "   " })).unwrap();

    assert_eq!(feedback.summary, FALLBACK_SUMMARY);
}

#[test]
fn given_key_moments_when_normalizing_then_invalid_entries_dropped_and_speaker_defaulted() {
    let feedback = normalize_feedback(&json!({
        "keyMoments": [
            { "timestamp": "01:15", "speaker": " Speaker 0 ", "observation": " Strong opener " },
            { "observation": "Handled the price objection" },
            { "speaker": "Speaker 1", "observation": "   " },
            "not an object",
            { "timestamp": 42, "speaker": "", "observation": "Asked for the close" }
        ]
    }))
    .unwrap();

    assert_eq!(feedback.key_moments.len(), 3);
    assert_eq!(feedback.key_moments[0].timestamp.as_deref(), Some("01:15"));
    assert_eq!(feedback.key_moments[0].speaker, "Speaker 0");
    assert_eq!(feedback.key_moments[0].observation, "Strong opener");
    assert_eq!(feedback.key_moments[1].speaker, UNKNOWN_SPEAKER);
    assert_eq!(feedback.key_moments[1].timestamp, None);
    assert_eq!(feedback.key_moments[2].speaker, UNKNOWN_SPEAKER);
    assert_eq!(feedback.key_moments[2].timestamp, None);
}

#[test]
fn given_whitespace_only_moment_fields_when_normalizing_then_observation_drops_and_speaker_defaults()
{
    let feedback = normalize_feedback(&json!({
        "keyMoments": [
            { "speaker": "Speaker 0", "observation": "\t \n" },
            { "speaker": "   ", "observation": "Summarized next steps" }
        ]
    }))
    .unwrap();

    assert_eq!(feedback.key_moments.len(), 1);
    assert_eq!(feedback.key_moments[0].speaker, UNKNOWN_SPEAKER);
    assert_eq!(feedback.key_moments[0].observation, "Summarized next steps");
}

#[test]
fn given_partial_metrics_when_normalizing_then_missing_scores_default_and_others_clamp() {
    let feedback = normalize_feedback(&json!({
        "metrics": {
            "toneProfessionalism": 9,
            "activeListening": 12,
            "objectionHandling": "high"
        }
    }))
    .unwrap();

    assert_eq!(feedback.metrics.tone_professionalism, 9);
    assert_eq!(feedback.metrics.active_listening, 10);
    assert_eq!(feedback.metrics.objection_handling, 5);
    assert_eq!(feedback.metrics.closing_technique, 5);
    assert_eq!(feedback.metrics.product_knowledge, 5);
}

#[test]
fn given_non_object_value_when_normalizing_then_error() {
    assert!(normalize_feedback(&json!([1, 2, 3])).is_err());
    assert!(normalize_feedback(&json!("text")).is_err());
}

#[test]
fn given_plain_json_when_extracting_then_parsed_directly() {
    let value = extract_json_from_response(r#"{"overallScore": 8}"#).unwrap();

    assert_eq!(value["overallScore"], 8);
}

#[test]
fn given_fenced_json_with_prose_when_extracting_then_fenced_block_is_used() {
    let content = "Here is the feedback:\n```json\n{\"summary\": \"Solid call\"}\n```\nLet me know!";

    let value = extract_json_from_response(content).unwrap();

    assert_eq!(value["summary"], "Solid call");
}

#[test]
fn given_unlabelled_fence_when_extracting_then_block_is_used() {
    let content = "```\n{\"overallScore\": 3}\n```";

    let value = extract_json_from_response(content).unwrap();

    assert_eq!(value["overallScore"], 3);
}

#[test]
fn given_json_surrounded_by_prose_when_extracting_then_braced_span_is_used() {
    let content = "Sure. {\"overallScore\": 6, \"summary\": \"ok\"} Hope that helps.";

    let value = extract_json_from_response(content).unwrap();

    assert_eq!(value["overallScore"], 6);
}

#[test]
fn given_reasoning_block_before_json_when_extracting_then_block_is_stripped() {
    let content = "<think>The rep did {well} overall</think>\n{\"overallScore\": 9}";

    let value = extract_json_from_response(content).unwrap();

    assert_eq!(value["overallScore"], 9);
}

#[test]
fn given_text_without_json_when_extracting_then_unparsable() {
    let result = extract_json_from_response("I could not analyze this call.");

    let err = result.expect_err("no JSON present");
    assert!(err.to_string().starts_with("Failed to extract valid JSON"));
}
