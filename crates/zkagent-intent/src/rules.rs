//! The deterministic rule cascade.
//!
//! An ordered list of pure predicate+extractor rules, evaluated first-match.
//! The ordering encodes product decisions about overlapping triggers (e.g. a
//! message containing "verify", "kyc" and "usdc" is a verification request,
//! not a transfer), so it is explicit and tested.

use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::assist::{AssistAnalysis, AssistIntentType};
use crate::context::ConversationContext;
use crate::intent::{Intent, IntentContext, ListType, ProofFunction};
use crate::step_size::resolve_step_size;
use crate::transfer::{extract_transfer_details, is_transfer_request, Blockchain, TransferDetails};

/// The outcome of a successfully classified turn.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    /// Structured intent to hand to a collaborator; `None` for actions that
    /// need no proof (direct transfers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    /// Default reply text; the assisted stage may substitute its own.
    pub response: String,
    pub metadata: TurnMetadata,
}

/// Machine-readable turn tags, preserved verbatim for downstream consumers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnMetadata {
    VerificationRequest {
        proof_id: String,
    },
    KycTransferAutomationStart {
        proof_id: String,
        transfer_details: TransferDetails,
    },
    DirectTransfer {
        transfer_details: TransferDetails,
    },
    ManualProof {
        proof_id: String,
        proof_type: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    ListRequest {
        list_type: ListType,
    },
    Conversation,
    Help,
}

/// Everything a rule may look at. Rules are pure; context mutation happens
/// once, centrally, after a rule has matched.
struct RuleInput<'a> {
    message: &'a str,
    lower: &'a str,
    turn_proof_id: &'a str,
    ctx: &'a ConversationContext,
}

type Rule = fn(&RuleInput<'_>) -> Option<Classification>;

/// The cascade, highest priority first. Do not reorder without updating the
/// priority tests.
const RULES: &[(&str, Rule)] = &[
    ("context_rewrite", rewrite_from_context),
    ("verify", verify_rule),
    ("transfer", transfer_rule),
    ("named_algorithm", named_algorithm_rule),
    ("kyc_proof", kyc_rule),
    ("ai_content_proof", ai_content_rule),
    ("location_proof", location_rule),
    ("list", list_rule),
    ("encoded_custom", encoded_custom_rule),
];

/// Classify a message against the cascade.
///
/// `turn_proof_id` is the fresh id minted for this turn; verification
/// requests fall back to it when neither the message nor the context names a
/// proof. Returns `None` for pure conversation. On a match, records
/// `last_transfer` / `last_proof_type` in the context.
pub fn classify(
    message: &str,
    turn_proof_id: &str,
    ctx: &mut ConversationContext,
) -> Option<Classification> {
    let lower = message.to_lowercase();
    let input = RuleInput {
        message,
        lower: &lower,
        turn_proof_id,
        ctx,
    };

    for (name, rule) in RULES {
        if let Some(classification) = rule(&input) {
            debug!(rule = name, "cascade matched");
            apply_side_effects(&classification, ctx);
            return Some(classification);
        }
    }

    None
}

/// Classify from a structured assisted analysis instead of raw text.
///
/// The analysis chooses the branch; slot extraction stays deterministic. The
/// message still supplies addresses, recipients and cities, and the analysis
/// may only override the amount (for transfers) and name the proof id or
/// city directly. The context rewrite keeps its top-of-cascade priority: a
/// repeat phrase with a remembered transfer resolves from the context, no
/// matter which branch the analysis picked. Returns `None` when the analysis
/// names no actionable intent.
pub fn classify_assisted(
    analysis: &AssistAnalysis,
    message: &str,
    turn_proof_id: &str,
    ctx: &mut ConversationContext,
) -> Option<Classification> {
    let lower = message.to_lowercase();

    let mut classification = {
        let input = RuleInput {
            message,
            lower: &lower,
            turn_proof_id,
            ctx,
        };
        rewrite_from_context(&input).or_else(|| assisted_branch(analysis, &input))?
    };

    if !analysis.response.is_empty() {
        classification.response = analysis.response.clone();
    }
    apply_side_effects(&classification, ctx);
    Some(classification)
}

fn assisted_branch(analysis: &AssistAnalysis, input: &RuleInput<'_>) -> Option<Classification> {
    let lower = input.lower;
    Some(match analysis.intent_type {
        AssistIntentType::None => return None,
        AssistIntentType::Verify => {
            let proof_id = analysis
                .details
                .proof_id
                .clone()
                .or_else(|| {
                    PROOF_ID_RE
                        .find(input.message)
                        .map(|m| m.as_str().to_string())
                })
                .or_else(|| input.ctx.last_proof_id.clone())
                .unwrap_or_else(|| input.turn_proof_id.to_string());
            verify_classification(proof_id)
        }
        AssistIntentType::Transfer => {
            let mut details = extract_transfer_details(input.message);
            if let Some(amount) = &analysis.details.amount {
                details.amount = amount.clone();
            }
            // Only an affirmative flag from the analysis is trusted; false
            // and unset both re-derive the KYC gate from the message.
            let requires_kyc = analysis.details.requires_kyc == Some(true)
                || is_transfer_request(input.message).1;
            transfer_classification(details, requires_kyc, input)
        }
        AssistIntentType::KycProof => kyc_classification(input),
        AssistIntentType::AiProof => ai_content_classification(input),
        AssistIntentType::LocationProof => {
            let city = analysis
                .details
                .location
                .as_deref()
                .and_then(|loc| detect_city(&loc.to_lowercase()))
                .or_else(|| detect_city(input.lower))
                .unwrap_or(CITIES[1]);
            location_classification(city, input)
        }
        AssistIntentType::CustomProof => {
            let algo = analysis
                .details
                .proof_type
                .as_deref()
                .and_then(|t| NAMED_ALGORITHMS.iter().find(|a| a.matches_tag(t)));
            match algo {
                Some(algo) => custom_proof_classification(
                    algo.c_code.to_string(),
                    algo.description,
                    algo.wasm_file,
                    algo.default_arg,
                    algo.response.to_string(),
                    input,
                ),
                None => custom_proof_classification(
                    "// Custom proof".to_string(),
                    "custom computation",
                    "custom_proof",
                    "1",
                    "I'll generate a custom proof for you. Processing...".to_string(),
                    input,
                ),
            }
        }
        AssistIntentType::List => {
            let list_type = if lower.contains("verification")
                || analysis.details.list_type.as_deref() == Some("verifications")
            {
                ListType::Verifications
            } else {
                ListType::Proofs
            };
            list_classification(list_type)
        }
    })
}

fn apply_side_effects(classification: &Classification, ctx: &mut ConversationContext) {
    match &classification.metadata {
        TurnMetadata::DirectTransfer { transfer_details }
        | TurnMetadata::KycTransferAutomationStart {
            transfer_details, ..
        } => {
            ctx.last_transfer = Some(transfer_details.clone());
        }
        TurnMetadata::ManualProof { proof_type, .. } => {
            ctx.last_proof_type = Some(proof_type.clone());
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Stage 0: context-aware rewrite
// ---------------------------------------------------------------------------

const REPEAT_PHRASES: &[&str] = &[
    "do the same",
    "same again",
    "same transfer",
    "same thing",
    "repeat that",
    "repeat the",
];

static SOL_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bsol\b").unwrap());
static ETH_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\beth\b").unwrap());

/// "do the same on solana" - resynthesize the previous transfer with only the
/// blockchain overridden. Wins over every other rule.
fn rewrite_from_context(input: &RuleInput<'_>) -> Option<Classification> {
    let prior = input.ctx.last_transfer.as_ref()?;
    if !REPEAT_PHRASES.iter().any(|p| input.lower.contains(p)) {
        return None;
    }

    let mut details = prior.clone();
    if input.lower.contains("solana") || SOL_TOKEN_RE.is_match(input.lower) {
        details.blockchain = Blockchain::Sol;
    } else if input.lower.contains("ethereum") || ETH_TOKEN_RE.is_match(input.lower) {
        details.blockchain = Blockchain::Eth;
    }

    let (_, requires_kyc) = is_transfer_request(input.message);
    Some(transfer_classification(details, requires_kyc, input))
}

// ---------------------------------------------------------------------------
// Rule 1: verification
// ---------------------------------------------------------------------------

static PROOF_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"proof_\d+_[a-f0-9]+").unwrap());

fn verify_rule(input: &RuleInput<'_>) -> Option<Classification> {
    if !(input.lower.contains("verify") && input.lower.contains("proof")) {
        return None;
    }

    let proof_id = PROOF_ID_RE
        .find(input.message)
        .map(|m| m.as_str().to_string())
        .or_else(|| input.ctx.last_proof_id.clone())
        .unwrap_or_else(|| input.turn_proof_id.to_string());

    Some(verify_classification(proof_id))
}

fn verify_classification(proof_id: String) -> Classification {
    let intent = Intent::new(
        ProofFunction::Verify,
        vec![proof_id.clone()],
        format!("Verify existing proof {proof_id}"),
    )
    .with_context(IntentContext {
        proof_id: Some(proof_id.clone()),
        is_verification: true,
        ..Default::default()
    });

    Classification {
        response: format!("I'll verify the proof {proof_id} for you."),
        intent: Some(intent),
        metadata: TurnMetadata::VerificationRequest { proof_id },
    }
}

// ---------------------------------------------------------------------------
// Rule 2: USDC transfer
// ---------------------------------------------------------------------------

fn transfer_rule(input: &RuleInput<'_>) -> Option<Classification> {
    let (is_transfer, requires_kyc) = is_transfer_request(input.message);
    if !is_transfer {
        return None;
    }

    let details = extract_transfer_details(input.message);
    Some(transfer_classification(details, requires_kyc, input))
}

fn transfer_classification(
    details: TransferDetails,
    requires_kyc: bool,
    input: &RuleInput<'_>,
) -> Classification {
    let short: String = details.recipient.chars().take(10).collect();

    if requires_kyc {
        let intent = Intent::new(
            ProofFunction::ProveKyc,
            vec!["1".to_string()],
            "Automated KYC proof for USDC transfer.",
        )
        .with_step_size(resolve_step_size(input.message, None))
        .with_context(IntentContext {
            is_automated_transfer: true,
            transfer_details: Some(details.clone()),
            ..Default::default()
        });

        Classification {
            response: format!(
                "I'll need to generate a KYC compliance proof before I can send that {} USDC to {}... Let's get that sorted out!",
                details.amount, short
            ),
            intent: Some(intent),
            metadata: TurnMetadata::KycTransferAutomationStart {
                proof_id: input.turn_proof_id.to_string(),
                transfer_details: details,
            },
        }
    } else {
        Classification {
            response: format!(
                "Initiating direct transfer of {} USDC to {}... No KYC verification required.",
                details.amount, short
            ),
            intent: None,
            metadata: TurnMetadata::DirectTransfer {
                transfer_details: details,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Rule 3: named-algorithm custom proofs
// ---------------------------------------------------------------------------

const CUSTOM_PROOF_KEYWORDS: &[&str] = &["prove", "proof", "steps", "check"];

const C_COLLATZ: &str = r#"// Collatz Conjecture Steps
int main() {
    int n = 27;
    int steps = 0;
    while (n != 1 && steps < 1000) {
        if (n % 2 == 0) n = n / 2;
        else n = 3 * n + 1;
        steps++;
    }
    return steps;
}"#;

const C_PRIME: &str = r#"// Prime Number Checker Example
int main() {
    int n = 17;
    if (n <= 1) return 0;
    if (n <= 3) return 1;
    if (n % 2 == 0 || n % 3 == 0) return 0;
    for (int i = 5; i * i <= n; i = i + 6) {
        if (n % i == 0 || n % (i + 2) == 0) return 0;
    }
    return 1;
}"#;

const C_DIGITAL_ROOT: &str = r#"// Digital Root Calculator
int main() {
    int n = 12345;
    if (n == 0) return 0;
    return (n - 1) % 9 + 1;
}"#;

struct NamedAlgorithm {
    trigger: &'static str,
    c_code: &'static str,
    description: &'static str,
    wasm_file: &'static str,
    default_arg: &'static str,
    response: &'static str,
}

impl NamedAlgorithm {
    /// Matches the `proof_type` tag used by the assisted classifier.
    fn matches_tag(&self, tag: &str) -> bool {
        tag == self.trigger || tag == self.wasm_file
    }
}

const NAMED_ALGORITHMS: &[NamedAlgorithm] = &[
    NamedAlgorithm {
        trigger: "collatz",
        c_code: C_COLLATZ,
        description: "Collatz conjecture computation",
        wasm_file: "collatz",
        default_arg: "27",
        response: "I'll generate a proof for the Collatz conjecture computation. Processing...",
    },
    NamedAlgorithm {
        trigger: "prime",
        c_code: C_PRIME,
        description: "prime number check",
        wasm_file: "prime_checker",
        default_arg: "17",
        response: "I'll generate a proof for prime number checking. Processing...",
    },
    NamedAlgorithm {
        trigger: "digital root",
        c_code: C_DIGITAL_ROOT,
        description: "digital root calculation",
        wasm_file: "digital_root",
        default_arg: "12345",
        response: "I'll generate a proof for digital root calculation. Processing...",
    },
];

fn named_algorithm_rule(input: &RuleInput<'_>) -> Option<Classification> {
    if !CUSTOM_PROOF_KEYWORDS.iter().any(|k| input.lower.contains(k)) {
        return None;
    }

    let algo = NAMED_ALGORITHMS
        .iter()
        .find(|a| input.lower.contains(a.trigger))?;

    Some(custom_proof_classification(
        algo.c_code.to_string(),
        algo.description,
        algo.wasm_file,
        algo.default_arg,
        algo.response.to_string(),
        input,
    ))
}

fn custom_proof_classification(
    c_code: String,
    description: &str,
    wasm_file: &str,
    default_arg: &str,
    response: String,
    input: &RuleInput<'_>,
) -> Classification {
    let step_size = resolve_step_size(input.message, code_workload(&c_code));

    let intent = Intent::new(
        ProofFunction::ProveCustom,
        vec![default_arg.to_string()],
        format!("Custom proof: {description}"),
    )
    .with_step_size(step_size)
    .with_context(IntentContext {
        c_code: Some(c_code),
        proof_type: Some("custom".to_string()),
        is_custom: true,
        custom_description: Some(description.to_string()),
        wasm_file: Some(wasm_file.to_string()),
        ..Default::default()
    });

    Classification {
        response,
        intent: Some(intent),
        metadata: TurnMetadata::ManualProof {
            proof_id: input.turn_proof_id.to_string(),
            proof_type: "custom".to_string(),
            description: Some(description.to_string()),
        },
    }
}

static CODE_INPUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:n|num|value)\s*=\s*(\d+)").unwrap());

/// Step-size workload hint for user-supplied code: only fibonacci and
/// factorial escalate, and only past their documented thresholds.
fn code_workload(code: &str) -> Option<(&'static str, u64)> {
    let lower = code.to_lowercase();
    let name = if lower.contains("fibonacci") {
        "fibonacci"
    } else if lower.contains("factorial") {
        "factorial"
    } else {
        return None;
    };

    let n = CODE_INPUT_RE
        .captures(&lower)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0);
    Some((name, n))
}

// ---------------------------------------------------------------------------
// Rule 4: KYC / AI-content / location proofs
// ---------------------------------------------------------------------------

fn has_proof_keyword(lower: &str) -> bool {
    lower.contains("prove") || lower.contains("proof")
}

fn kyc_rule(input: &RuleInput<'_>) -> Option<Classification> {
    if !(input.lower.contains("kyc")
        && has_proof_keyword(input.lower)
        && !input.lower.contains("usdc"))
    {
        return None;
    }

    Some(kyc_classification(input))
}

fn kyc_classification(input: &RuleInput<'_>) -> Classification {
    let intent = Intent::new(
        ProofFunction::ProveKyc,
        vec!["1".to_string()],
        "Manual KYC compliance proof",
    )
    .with_step_size(resolve_step_size(input.message, None));

    Classification {
        response: "I'll generate a KYC compliance proof for you. This will create a zero-knowledge proof of your verification status.".to_string(),
        intent: Some(intent),
        metadata: TurnMetadata::ManualProof {
            proof_id: input.turn_proof_id.to_string(),
            proof_type: "kyc".to_string(),
            description: None,
        },
    }
}

fn ai_content_rule(input: &RuleInput<'_>) -> Option<Classification> {
    let lower = input.lower;
    if !((lower.contains("ai") || lower.contains("content"))
        && (lower.contains("authenticity") || lower.contains("authentic"))
        && has_proof_keyword(lower))
    {
        return None;
    }

    Some(ai_content_classification(input))
}

fn ai_content_classification(input: &RuleInput<'_>) -> Classification {
    let intent = Intent::new(
        ProofFunction::ProveAiContent,
        vec!["987654321".to_string(), "1000".to_string()],
        "AI content authenticity verification",
    )
    .with_step_size(resolve_step_size(input.message, None));

    Classification {
        response: "I'll generate a proof of AI content authenticity. This will verify that content was generated by an authorized AI system.".to_string(),
        intent: Some(intent),
        metadata: TurnMetadata::ManualProof {
            proof_id: input.turn_proof_id.to_string(),
            proof_type: "ai_content".to_string(),
            description: None,
        },
    }
}

/// Normalized city coordinates: (name, lat byte, lon byte).
const CITIES: &[(&str, u32, u32)] = &[
    ("San Francisco", 96, 122),
    ("New York", 103, 182),
    ("London", 130, 242),
    ("Tokyo", 90, 140),
];

const DEVICE_ID: u32 = 1234;

static SF_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bsf\b").unwrap());

fn detect_city(lower: &str) -> Option<(&'static str, u32, u32)> {
    if lower.contains("san francisco") || SF_TOKEN_RE.is_match(lower) {
        return Some(CITIES[0]);
    }
    if lower.contains("new york") || lower.contains("nyc") {
        return Some(CITIES[1]);
    }
    if lower.contains("london") {
        return Some(CITIES[2]);
    }
    if lower.contains("tokyo") {
        return Some(CITIES[3]);
    }
    None
}

/// Pack two coordinate bytes and the device id into one proof argument.
fn pack_location(lat: u32, lon: u32) -> u32 {
    (lat << 24) | (lon << 16) | DEVICE_ID
}

fn location_rule(input: &RuleInput<'_>) -> Option<Classification> {
    if !((input.lower.contains("location") || input.lower.contains("device"))
        && has_proof_keyword(input.lower))
    {
        return None;
    }

    // Default to New York when no city is named.
    let city = detect_city(input.lower).unwrap_or(CITIES[1]);
    Some(location_classification(city, input))
}

fn location_classification(
    (city, lat, lon): (&'static str, u32, u32),
    input: &RuleInput<'_>,
) -> Classification {
    let packed = pack_location(lat, lon);

    let intent = Intent::new(
        ProofFunction::ProveLocation,
        vec![packed.to_string()],
        format!("Device location proof for {city} - Zone verification"),
    )
    .with_step_size(resolve_step_size(input.message, None))
    .with_context(IntentContext {
        location: Some(city.to_string()),
        zone_type: Some("city boundary verification".to_string()),
        ..Default::default()
    });

    Classification {
        response: format!(
            "I'll generate a location proof for {city}. This will create a zero-knowledge proof of device location without revealing exact coordinates."
        ),
        intent: Some(intent),
        metadata: TurnMetadata::ManualProof {
            proof_id: input.turn_proof_id.to_string(),
            proof_type: "location".to_string(),
            description: None,
        },
    }
}

// ---------------------------------------------------------------------------
// Rule 5: list proofs / verifications
// ---------------------------------------------------------------------------

fn list_rule(input: &RuleInput<'_>) -> Option<Classification> {
    let lower = input.lower;
    let triggered = (lower.contains("list")
        && (lower.contains("proof") || lower.contains("verification")))
        || lower.contains("proof history")
        || lower.contains("verification history");
    if !triggered {
        return None;
    }

    let list_type = if lower.contains("verification") {
        ListType::Verifications
    } else {
        ListType::Proofs
    };

    Some(list_classification(list_type))
}

fn list_classification(list_type: ListType) -> Classification {
    let intent = Intent::new(
        ProofFunction::ListProofs,
        vec![list_type.as_str().to_string()],
        format!("List all {}", list_type.as_str()),
    )
    .with_context(IntentContext {
        list_type: Some(list_type),
        ..Default::default()
    });

    Classification {
        response: format!(
            "Here are your recent {}. Use the proof IDs to verify or inspect specific proofs.",
            list_type.as_str()
        ),
        intent: Some(intent),
        metadata: TurnMetadata::ListRequest { list_type },
    }
}

// ---------------------------------------------------------------------------
// Rule 6: base64-encoded custom C source
// ---------------------------------------------------------------------------

const CUSTOM_PREFIX: &str = "prove custom ";

fn encoded_custom_rule(input: &RuleInput<'_>) -> Option<Classification> {
    let payload = input.message.strip_prefix(CUSTOM_PREFIX)?.trim();

    // A bad payload is a non-match, not an error; the turn degrades to
    // conversation.
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .ok()?;
    let c_code = String::from_utf8(decoded).ok()?;

    let code_lower = c_code.to_lowercase();
    let (description, wasm_file, default_arg) = if code_lower.contains("prime") {
        ("prime number check", "prime_checker", "17")
    } else if code_lower.contains("collatz") {
        ("Collatz conjecture computation", "collatz", "27")
    } else if code_lower.contains("digital") && code_lower.contains("root") {
        ("digital root calculation", "digital_root", "12345")
    } else {
        ("custom computation", "custom_proof", "27")
    };

    let response = format!("I'll generate a proof for your {description}. Processing your custom C code...");
    Some(custom_proof_classification(
        c_code,
        description,
        wasm_file,
        default_arg,
        response,
        input,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    fn classify_fresh(message: &str) -> Option<Classification> {
        let mut ctx = ConversationContext::new();
        classify(message, "proof_1700000000000_cafe01", &mut ctx)
    }

    fn encode(code: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(code)
    }

    #[test]
    fn test_pure_conversation_is_none() {
        assert!(classify_fresh("hello, how are you today?").is_none());
        assert!(classify_fresh("what is a zero-knowledge proof?").is_none());
    }

    #[test]
    fn test_verify_extracts_proof_id() {
        let c = classify_fresh("verify proof proof_1700000000000_abc123").unwrap();
        let intent = c.intent.unwrap();
        assert_eq!(intent.function, ProofFunction::Verify);
        assert_eq!(intent.arguments, vec!["proof_1700000000000_abc123"]);
        assert!(intent.additional_context.is_verification);
    }

    #[test]
    fn test_verify_falls_back_to_last_proof_id() {
        let mut ctx = ConversationContext::new();
        ctx.last_proof_id = Some("proof_42_beef00".to_string());
        let c = classify("verify my latest proof", "proof_9_000000", &mut ctx).unwrap();
        assert_eq!(c.intent.unwrap().arguments, vec!["proof_42_beef00"]);
    }

    #[test]
    fn test_verify_wins_over_transfer_keywords() {
        // "verify...kyc...usdc" is a verification request, not a transfer.
        let c = classify_fresh("verify the kyc proof before you send my usdc").unwrap();
        assert!(matches!(c.metadata, TurnMetadata::VerificationRequest { .. }));
    }

    #[test]
    fn test_kyc_transfer_produces_automated_kyc_intent() {
        let c = classify_fresh("send 0.5 USDC to bob if KYC compliant").unwrap();
        let intent = c.intent.unwrap();
        assert_eq!(intent.function, ProofFunction::ProveKyc);
        assert!(intent.additional_context.is_automated_transfer);
        let details = intent.additional_context.transfer_details.unwrap();
        assert_eq!(details.recipient, "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");
        assert_eq!(details.amount, "0.5");
    }

    #[test]
    fn test_plain_transfer_is_direct() {
        let c = classify_fresh("send 0.5 USDC to bob").unwrap();
        assert!(c.intent.is_none());
        match c.metadata {
            TurnMetadata::DirectTransfer { transfer_details } => {
                assert_eq!(
                    transfer_details.recipient,
                    "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"
                );
            }
            other => panic!("expected direct transfer, got {other:?}"),
        }
    }

    #[test]
    fn test_transfer_wins_over_named_algorithm() {
        // "steps" is a custom-proof keyword, but usdc+send decides.
        let c = classify_fresh("send 1 usdc to alice in three steps").unwrap();
        assert!(matches!(c.metadata, TurnMetadata::DirectTransfer { .. }));
    }

    #[test]
    fn test_transfer_records_context() {
        let mut ctx = ConversationContext::new();
        classify("send 2 usdc to bob", "proof_1_aa", &mut ctx).unwrap();
        let last = ctx.last_transfer.unwrap();
        assert_eq!(last.amount, "2");
        assert_eq!(last.blockchain, Blockchain::Eth);
    }

    #[test]
    fn test_repeat_on_other_chain_rewrites_blockchain_only() {
        let mut ctx = ConversationContext::new();
        ctx.last_transfer = Some(TransferDetails {
            amount: "2".to_string(),
            recipient: "bob".to_string(),
            blockchain: Blockchain::Eth,
        });

        let c = classify("do the same on solana", "proof_1_aa", &mut ctx).unwrap();
        match c.metadata {
            TurnMetadata::DirectTransfer { transfer_details } => {
                assert_eq!(transfer_details.amount, "2");
                assert_eq!(transfer_details.recipient, "bob");
                assert_eq!(transfer_details.blockchain, Blockchain::Sol);
            }
            other => panic!("expected direct transfer, got {other:?}"),
        }
    }

    #[test]
    fn test_repeat_without_prior_transfer_falls_through() {
        // Without a remembered transfer the phrase means nothing actionable.
        assert!(classify_fresh("do the same on solana").is_none());
    }

    #[test]
    fn test_collatz_proof_request() {
        let c = classify_fresh("prove collatz steps for me").unwrap();
        let intent = c.intent.unwrap();
        assert_eq!(intent.function, ProofFunction::ProveCustom);
        assert_eq!(intent.arguments, vec!["27"]);
        assert_eq!(intent.step_size, 50);
        let ctx = intent.additional_context;
        assert!(ctx.c_code.unwrap().contains("Collatz"));
        assert_eq!(ctx.wasm_file.as_deref(), Some("collatz"));
    }

    #[test]
    fn test_prime_check_request() {
        let c = classify_fresh("can you check if 17 is prime with a proof").unwrap();
        let intent = c.intent.unwrap();
        assert_eq!(intent.function, ProofFunction::ProveCustom);
        assert_eq!(
            intent.additional_context.custom_description.as_deref(),
            Some("prime number check")
        );
    }

    #[test]
    fn test_explicit_step_size_override() {
        let c = classify_fresh("prove collatz with step size 25").unwrap();
        assert_eq!(c.intent.unwrap().step_size, 25);
    }

    #[test]
    fn test_kyc_proof_without_usdc() {
        let c = classify_fresh("prove my KYC compliance").unwrap();
        let intent = c.intent.unwrap();
        assert_eq!(intent.function, ProofFunction::ProveKyc);
        assert_eq!(intent.arguments, vec!["1"]);
        assert!(!intent.additional_context.is_automated_transfer);
    }

    #[test]
    fn test_ai_content_proof() {
        let c = classify_fresh("prove this content is authentic").unwrap();
        let intent = c.intent.unwrap();
        assert_eq!(intent.function, ProofFunction::ProveAiContent);
        assert_eq!(intent.arguments, vec!["987654321", "1000"]);
    }

    #[test]
    fn test_location_proof_packs_city_coordinates() {
        let c = classify_fresh("prove my device location in London").unwrap();
        let intent = c.intent.unwrap();
        assert_eq!(intent.function, ProofFunction::ProveLocation);
        let packed = (130u32 << 24) | (242 << 16) | 1234;
        assert_eq!(intent.arguments, vec![packed.to_string()]);
        assert_eq!(intent.additional_context.location.as_deref(), Some("London"));
    }

    #[test]
    fn test_location_proof_defaults_to_new_york() {
        let c = classify_fresh("prove my device location").unwrap();
        let intent = c.intent.unwrap();
        let packed = (103u32 << 24) | (182 << 16) | 1234;
        assert_eq!(intent.arguments, vec![packed.to_string()]);
    }

    #[test]
    fn test_proof_history_lists_proofs() {
        let c = classify_fresh("Proof History").unwrap();
        let intent = c.intent.unwrap();
        assert_eq!(intent.function, ProofFunction::ListProofs);
        assert_eq!(intent.arguments, vec!["proofs"]);
    }

    #[test]
    fn test_verification_history_lists_verifications() {
        let c = classify_fresh("Verification History").unwrap();
        assert_eq!(c.intent.unwrap().arguments, vec!["verifications"]);
    }

    #[test]
    fn test_encoded_custom_proof_decodes_source() {
        let code = "int main() { int n = 100; return collatz_steps(n); }";
        let message = format!("prove custom {}", encode(code));
        let c = classify_fresh(&message).unwrap();
        let intent = c.intent.unwrap();
        assert_eq!(intent.function, ProofFunction::ProveCustom);
        assert_eq!(intent.additional_context.c_code.as_deref(), Some(code));
        assert_eq!(intent.additional_context.wasm_file.as_deref(), Some("collatz"));
    }

    #[test]
    fn test_encoded_custom_fibonacci_escalates_step_size() {
        let code = "int main() { int n = 20; return fibonacci(n); }";
        let message = format!("prove custom {}", encode(code));
        let c = classify_fresh(&message).unwrap();
        assert_eq!(c.intent.unwrap().step_size, 100);
    }

    #[test]
    fn test_bad_base64_falls_through_silently() {
        assert!(classify_fresh("prove custom this-is-not-base64!!!").is_none());
    }

    #[test]
    fn test_proof_intent_records_proof_type() {
        let mut ctx = ConversationContext::new();
        classify("prove my KYC compliance", "proof_1_aa", &mut ctx).unwrap();
        assert_eq!(ctx.last_proof_type.as_deref(), Some("kyc"));
    }

    fn analysis(json: &str) -> AssistAnalysis {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_assisted_none_is_not_actionable() {
        let a = analysis(r#"{"response":"Nice weather!","intent_type":"none"}"#);
        let mut ctx = ConversationContext::new();
        assert!(classify_assisted(&a, "how is the weather", "proof_1_aa", &mut ctx).is_none());
    }

    #[test]
    fn test_assisted_response_text_wins() {
        let a = analysis(r#"{"response":"Ha! Proving your KYC, comedian.","intent_type":"kyc_proof"}"#);
        let mut ctx = ConversationContext::new();
        let c = classify_assisted(&a, "prove kyc and make it funny", "proof_1_aa", &mut ctx).unwrap();
        assert_eq!(c.response, "Ha! Proving your KYC, comedian.");
        assert_eq!(c.intent.unwrap().function, ProofFunction::ProveKyc);
    }

    #[test]
    fn test_assisted_transfer_amount_override() {
        let a = analysis(
            r#"{"response":"On it","intent_type":"transfer","details":{"amount":"0.25","requires_kyc":false}}"#,
        );
        let mut ctx = ConversationContext::new();
        let c = classify_assisted(&a, "send some usdc to bob", "proof_1_aa", &mut ctx).unwrap();
        match c.metadata {
            TurnMetadata::DirectTransfer { transfer_details } => {
                // amount comes from the analysis, address from the message
                assert_eq!(transfer_details.amount, "0.25");
                assert_eq!(
                    transfer_details.recipient,
                    "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"
                );
            }
            other => panic!("expected direct transfer, got {other:?}"),
        }
    }

    #[test]
    fn test_assisted_transfer_rechecks_kyc_when_unset() {
        let a = analysis(r#"{"response":"On it","intent_type":"transfer"}"#);
        let mut ctx = ConversationContext::new();
        let c = classify_assisted(
            &a,
            "send 1 usdc to alice if kyc verified",
            "proof_1_aa",
            &mut ctx,
        )
        .unwrap();
        assert!(matches!(
            c.metadata,
            TurnMetadata::KycTransferAutomationStart { .. }
        ));
    }

    #[test]
    fn test_assisted_transfer_distrusts_negative_kyc_flag() {
        // The gate comes from the message even when the analysis says no.
        let a = analysis(
            r#"{"response":"Sending","intent_type":"transfer","details":{"requires_kyc":false}}"#,
        );
        let mut ctx = ConversationContext::new();
        let c = classify_assisted(&a, "send 1 usdc to bob if kyc", "proof_1_aa", &mut ctx).unwrap();
        assert!(matches!(
            c.metadata,
            TurnMetadata::KycTransferAutomationStart { .. }
        ));
    }

    #[test]
    fn test_assisted_repeat_phrase_resolves_from_context() {
        // The context rewrite outranks the analysis branch: the remembered
        // transfer supplies the slots, not fresh extraction.
        let a = analysis(
            r#"{"response":"Again!","intent_type":"transfer","details":{"requires_kyc":false}}"#,
        );
        let mut ctx = ConversationContext::new();
        ctx.last_transfer = Some(TransferDetails {
            amount: "2".to_string(),
            recipient: "bob".to_string(),
            blockchain: Blockchain::Eth,
        });
        let c = classify_assisted(&a, "do the same on solana", "proof_1_aa", &mut ctx).unwrap();
        match c.metadata {
            TurnMetadata::DirectTransfer { transfer_details } => {
                assert_eq!(transfer_details.amount, "2");
                assert_eq!(transfer_details.recipient, "bob");
                assert_eq!(transfer_details.blockchain, Blockchain::Sol);
            }
            other => panic!("expected direct transfer, got {other:?}"),
        }
    }

    #[test]
    fn test_assisted_location_detail_beats_message() {
        let a = analysis(
            r#"{"response":"Tokyo it is","intent_type":"location_proof","details":{"location":"Tokyo"}}"#,
        );
        let mut ctx = ConversationContext::new();
        let c = classify_assisted(&a, "prove where my device is", "proof_1_aa", &mut ctx).unwrap();
        let packed = (90u32 << 24) | (140 << 16) | 1234;
        assert_eq!(c.intent.unwrap().arguments, vec![packed.to_string()]);
    }

    #[test]
    fn test_assisted_custom_proof_type_selects_algorithm() {
        let a = analysis(
            r#"{"response":"Collatz time","intent_type":"custom_proof","details":{"proof_type":"collatz"}}"#,
        );
        let mut ctx = ConversationContext::new();
        let c = classify_assisted(
            &a,
            "prove collatz steps with raunchy humor",
            "proof_1_aa",
            &mut ctx,
        )
        .unwrap();
        let intent = c.intent.unwrap();
        assert_eq!(intent.arguments, vec!["27"]);
        assert!(intent.additional_context.c_code.unwrap().contains("Collatz"));
    }

    #[test]
    fn test_assisted_unknown_proof_type_is_generic_custom() {
        let a = analysis(
            r#"{"response":"Sure","intent_type":"custom_proof","details":{"proof_type":"ackermann"}}"#,
        );
        let mut ctx = ConversationContext::new();
        let c = classify_assisted(&a, "prove something custom", "proof_1_aa", &mut ctx).unwrap();
        let intent = c.intent.unwrap();
        assert_eq!(intent.arguments, vec!["1"]);
        assert_eq!(
            intent.additional_context.custom_description.as_deref(),
            Some("custom computation")
        );
    }

    #[test]
    fn test_assisted_verify_uses_named_proof_id() {
        let a = analysis(
            r#"{"response":"Verifying","intent_type":"verify","details":{"proof_id":"proof_7_aabbcc"}}"#,
        );
        let mut ctx = ConversationContext::new();
        let c = classify_assisted(&a, "verify that one", "proof_1_aa", &mut ctx).unwrap();
        assert_eq!(c.intent.unwrap().arguments, vec!["proof_7_aabbcc"]);
    }

    #[test]
    fn test_assisted_list_verifications() {
        let a = analysis(
            r#"{"response":"Here you go","intent_type":"list","details":{"list_type":"verifications"}}"#,
        );
        let mut ctx = ConversationContext::new();
        let c = classify_assisted(&a, "show my history", "proof_1_aa", &mut ctx).unwrap();
        assert_eq!(c.intent.unwrap().arguments, vec!["verifications"]);
    }
}
