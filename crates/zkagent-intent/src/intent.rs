//! Intent types - the structured output of classification.

use serde::{Deserialize, Serialize};

use crate::transfer::TransferDetails;

/// Default computation granularity passed to the proof collaborator.
pub const DEFAULT_STEP_SIZE: u32 = 50;

/// The closed set of backend actions an intent can request.
///
/// Serialized names are a stable contract: other system components dispatch
/// on these strings by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofFunction {
    /// KYC compliance proof
    ProveKyc,
    /// AI content authenticity proof
    ProveAiContent,
    /// Device location proof (packed coordinate argument)
    ProveLocation,
    /// Custom proof from user-supplied C-like source
    ProveCustom,
    /// List stored proofs or verifications
    ListProofs,
    /// Verify an existing proof by id
    Verify,
}

impl ProofFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofFunction::ProveKyc => "prove_kyc",
            ProofFunction::ProveAiContent => "prove_ai_content",
            ProofFunction::ProveLocation => "prove_location",
            ProofFunction::ProveCustom => "prove_custom",
            ProofFunction::ListProofs => "list_proofs",
            ProofFunction::Verify => "verify",
        }
    }

    /// Expected argument arity for this function.
    pub fn arity(&self) -> usize {
        match self {
            ProofFunction::ProveAiContent => 2,
            _ => 1,
        }
    }
}

impl std::fmt::Display for ProofFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which history a list request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    Proofs,
    Verifications,
}

impl ListType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Proofs => "proofs",
            ListType::Verifications => "verifications",
        }
    }
}

/// A structured description of what the user asked for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// Which backend action to invoke
    pub function: ProofFunction,
    /// Positional arguments; arity and meaning depend on `function`
    pub arguments: Vec<String>,
    /// Computation granularity for the proof collaborator
    #[serde(default = "default_step_size")]
    pub step_size: u32,
    /// Human-readable description, for display only
    pub explanation: String,
    /// Auxiliary data keyed by stable field names
    #[serde(default)]
    pub additional_context: IntentContext,
}

fn default_step_size() -> u32 {
    DEFAULT_STEP_SIZE
}

impl Intent {
    /// Create an intent with the default step size and empty context.
    pub fn new(
        function: ProofFunction,
        arguments: Vec<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            function,
            arguments,
            step_size: DEFAULT_STEP_SIZE,
            explanation: explanation.into(),
            additional_context: IntentContext::default(),
        }
    }

    pub fn with_step_size(mut self, step_size: u32) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn with_context(mut self, context: IntentContext) -> Self {
        self.additional_context = context;
        self
    }
}

/// Open key/value bag attached to an intent.
///
/// The named fields are the keys downstream consumers read; anything else
/// rides in `extra`. Field names must not change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentContext {
    /// Transfer parameters for transfer-triggering intents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_details: Option<TransferDetails>,
    /// Detected or user-supplied C source for custom proofs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c_code: Option<String>,
    /// Target proof id for verification intents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_id: Option<String>,
    /// "proofs" or "verifications" for list intents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_type: Option<ListType>,
    /// City name for location proofs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<String>,
    /// Proof type tag for custom proofs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_type: Option<String>,
    /// Which synthesized module the prover should load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wasm_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_description: Option<String>,
    /// True when this proof is the precursor to an automated transfer
    #[serde(default)]
    pub is_automated_transfer: bool,
    #[serde(default)]
    pub is_verification: bool,
    #[serde(default)]
    pub is_custom: bool,
    /// Anything a collaborator attached that this core does not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
