//! # zkagent Intent Model
//!
//! Shared data model and deterministic classification rules for the zkagent
//! chat service. A raw user message is classified into one of a closed set of
//! proof/transfer/verification intents, with slot values (amounts, recipients,
//! proof ids, step sizes) extracted along the way.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────────┐     ┌──────────────────┐
//! │ User message │ --> │  Rule cascade   │ --> │  Classification  │
//! │  (free text) │     │ (ordered rules) │     │ (Intent + reply) │
//! └──────────────┘     └─────────────────┘     └──────────────────┘
//!                             │
//!                   ┌─────────┴──────────┐
//!                   │ ConversationContext │
//!                   └────────────────────┘
//! ```
//!
//! The cascade here is the deterministic fallback stage; the assisted
//! (AI-backed) stage lives in `zkagent-ai` and reuses these types.
//!
//! ## Design Goals
//!
//! - **Deterministic**: the same message and context always classify the same
//!   way; ambiguity resolves through documented defaults, never errors.
//! - **Explicit priority**: rules are evaluated in a fixed order; earlier
//!   rules win on overlapping triggers.
//! - **Serializable**: all wire-facing types are JSON with stable field names
//!   that downstream components parse verbatim.

mod assist;
mod context;
mod intent;
mod rules;
mod step_size;
mod transfer;
mod validation;

pub use assist::{AssistAnalysis, AssistDetails, AssistIntentType, Personality};
pub use context::{ConversationContext, TurnRecord};
pub use intent::{Intent, IntentContext, ListType, ProofFunction, DEFAULT_STEP_SIZE};
pub use rules::{classify, classify_assisted, Classification, TurnMetadata};
pub use step_size::{explicit_step_size, resolve_step_size};
pub use transfer::{
    extract_transfer_details, is_transfer_request, round_amount, Blockchain, TransferDetails,
    DIRECTORY,
};
pub use validation::{validate, IntentError};
