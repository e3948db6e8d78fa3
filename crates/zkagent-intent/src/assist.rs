//! Wire types for the assisted-classification collaborator.
//!
//! The external language model replies with a JSON document matching
//! [`AssistAnalysis`]. Its structured output is trusted only when it names a
//! non-`none` intent type from the closed enumeration; anything malformed or
//! missing falls back to the deterministic cascade.

use serde::{Deserialize, Serialize};

/// Intent taxonomy the assisted classifier may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistIntentType {
    #[default]
    None,
    KycProof,
    AiProof,
    LocationProof,
    Transfer,
    Verify,
    List,
    CustomProof,
}

impl AssistIntentType {
    /// Whether the analysis carries an actionable intent.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, AssistIntentType::None)
    }
}

/// Structured analysis returned by the assisted classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistAnalysis {
    /// Natural-language reply to show the user
    pub response: String,
    #[serde(default)]
    pub intent_type: AssistIntentType,
    #[serde(default)]
    pub details: AssistDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<Personality>,
}

/// Slot values the assisted classifier extracted, all best-effort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_kyc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,
}

/// Presentation hints; display-only, never affects routing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Personality {
    #[serde(default)]
    pub add_humor: bool,
    #[serde(default)]
    pub add_explanation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}
