use serde::{Deserialize, Serialize};

/// Validated coaching result for one analyzed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesFeedback {
    pub overall_score: u8,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub key_moments: Vec<KeyMoment>,
    pub metrics: FeedbackMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMoment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub speaker: String,
    pub observation: String,
}

/// Per-skill scores, each in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackMetrics {
    pub tone_professionalism: u8,
    pub active_listening: u8,
    pub objection_handling: u8,
    pub closing_technique: u8,
    pub product_knowledge: u8,
}

impl FeedbackMetrics {
    pub const DEFAULT_SCORE: u8 = 5;
}

impl Default for FeedbackMetrics {
    fn default() -> Self {
        Self {
            tone_professionalism: Self::DEFAULT_SCORE,
            active_listening: Self::DEFAULT_SCORE,
            objection_handling: Self::DEFAULT_SCORE,
            closing_technique: Self::DEFAULT_SCORE,
            product_knowledge: Self::DEFAULT_SCORE,
        }
    }
}
