//! Transfer slot extraction - amounts, recipients, blockchains.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which chain a transfer settles on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Blockchain {
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "SOL")]
    Sol,
}

impl Blockchain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Blockchain::Eth => "ETH",
            Blockchain::Sol => "SOL",
        }
    }
}

impl std::fmt::Display for Blockchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for a USDC transfer, derived fresh per message or carried over
/// from the session's last transfer for follow-up commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDetails {
    /// Decimal string, rounded to at most 2 places
    pub amount: String,
    /// Address literal or directory name, verbatim
    pub recipient: String,
    pub blockchain: Blockchain,
}

/// Known recipients with per-chain address variants. The demo wallet book.
pub const DIRECTORY: &[(&str, Blockchain, &str)] = &[
    ("alice", Blockchain::Eth, "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"),
    ("alice", Blockchain::Sol, "7UX2i7SucgLMQcfZ75s3VXmZZY4YRUyJN9X1RgfMoDUi"),
    ("bob", Blockchain::Eth, "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"),
    ("bob", Blockchain::Sol, "GsbwXfJraMomNxBcjYLcG3mxkBUiyWXAB32fGbSMQRdW"),
    ("charlie", Blockchain::Eth, "0x90F79bf6EB2c4f870365E785982E1f101E93b906"),
    ("charlie", Blockchain::Sol, "2sWRYvL8M4S9XPvKNfUdy2Qvn6LYaXjqXDvMv9KsxbUa"),
];

/// Canonical address for a directory name on the given chain.
pub fn directory_address(name: &str, chain: Blockchain) -> Option<&'static str> {
    DIRECTORY
        .iter()
        .find(|(n, c, _)| *n == name && *c == chain)
        .map(|(_, _, addr)| *addr)
}

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());
static ETH_ADDR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"0x[a-fA-F0-9]{40}").unwrap());
static SOL_ADDR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[1-9A-HJ-NP-Za-km-z]{32,44}").unwrap());
static SOL_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bsol\b").unwrap());

const TRANSFER_VERBS: &[&str] = &["send", "transfer", "pay"];
const PROOF_KEYWORDS: &[&str] = &["proof", "prove", "verified", "verify"];
const KYC_KEYWORDS: &[&str] = &["kyc", "compliant", "compliance"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Check whether a message is a transfer request, and whether it gates the
/// transfer behind a KYC proof.
///
/// Returns `(is_transfer, requires_kyc)`. A transfer needs both a transfer
/// verb and the token "usdc". KYC is required when a proof keyword and a
/// compliance keyword co-occur, or on the literal phrase "if kyc".
pub fn is_transfer_request(message: &str) -> (bool, bool) {
    let lower = message.to_lowercase();
    let is_transfer = lower.contains("usdc") && contains_any(&lower, TRANSFER_VERBS);
    if !is_transfer {
        return (false, false);
    }

    let mut requires_kyc =
        contains_any(&lower, PROOF_KEYWORDS) && contains_any(&lower, KYC_KEYWORDS);
    if lower.contains("if kyc") {
        requires_kyc = true;
    }

    (true, requires_kyc)
}

/// Round a decimal literal to at most two places.
///
/// Operates on the decimal text, round-half-up, so "0.105" becomes "0.11"
/// rather than falling into binary-float territory. Trailing fractional
/// zeros are trimmed afterwards: "0.004" -> "0", "0.995" -> "1".
pub fn round_amount(raw: &str) -> String {
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, f),
        None => (raw, ""),
    };

    let Ok(mut int_value) = int_part.parse::<u128>() else {
        return "0.1".to_string();
    };

    let mut frac: Vec<u8> = frac_part
        .bytes()
        .take(2)
        .map(|b| b.wrapping_sub(b'0'))
        .collect();
    let round_up = frac_part.as_bytes().get(2).is_some_and(|b| *b >= b'5');

    if round_up {
        let mut carry = 1u8;
        for digit in frac.iter_mut().rev() {
            *digit += carry;
            carry = *digit / 10;
            *digit %= 10;
        }
        int_value += u128::from(carry);
    }

    while frac.last() == Some(&0) {
        frac.pop();
    }

    if frac.is_empty() {
        int_value.to_string()
    } else {
        let frac_str: String = frac.iter().map(|d| char::from(b'0' + d)).collect();
        format!("{int_value}.{frac_str}")
    }
}

/// Extract transfer slots from free text.
///
/// Amount defaults to "0.1"; blockchain is SOL when the message mentions
/// "solana" or a standalone "sol" token; recipient resolution prefers an
/// explicit address literal matching the chosen chain, then a directory name,
/// then the default identity (alice).
pub fn extract_transfer_details(message: &str) -> TransferDetails {
    let lower = message.to_lowercase();

    let amount = AMOUNT_RE
        .find(message)
        .map(|m| round_amount(m.as_str()))
        .unwrap_or_else(|| "0.1".to_string());

    let blockchain = if lower.contains("solana") || SOL_TOKEN_RE.is_match(&lower) {
        Blockchain::Sol
    } else {
        Blockchain::Eth
    };

    // Explicit address literals win over any named recipient also present.
    let explicit = match blockchain {
        Blockchain::Eth => ETH_ADDR_RE.find(message).map(|m| m.as_str().to_string()),
        Blockchain::Sol => SOL_ADDR_RE.find(message).map(|m| m.as_str().to_string()),
    };

    let recipient = explicit
        .or_else(|| {
            DIRECTORY
                .iter()
                .find(|(name, chain, _)| *chain == blockchain && lower.contains(name))
                .map(|(_, _, addr)| addr.to_string())
        })
        .unwrap_or_else(|| {
            directory_address("alice", blockchain)
                .expect("directory always has alice")
                .to_string()
        });

    debug!(%blockchain, %recipient, %amount, "extracted transfer details");

    TransferDetails {
        amount,
        recipient,
        blockchain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_amount_half_up() {
        assert_eq!(round_amount("0.105"), "0.11");
        assert_eq!(round_amount("0.004"), "0");
        assert_eq!(round_amount("0.005"), "0.01");
        assert_eq!(round_amount("0.995"), "1");
    }

    #[test]
    fn test_round_amount_passthrough() {
        assert_eq!(round_amount("2"), "2");
        assert_eq!(round_amount("0.1"), "0.1");
        assert_eq!(round_amount("2.50"), "2.5");
        assert_eq!(round_amount("10.00"), "10");
    }

    #[test]
    fn test_transfer_detection() {
        assert_eq!(is_transfer_request("send 0.5 USDC to bob"), (true, false));
        assert_eq!(is_transfer_request("pay 1 usdc to alice"), (true, false));
        assert_eq!(is_transfer_request("send 5 dollars to bob"), (false, false));
        assert_eq!(is_transfer_request("prove my kyc status"), (false, false));
    }

    #[test]
    fn test_kyc_gating_needs_both_keyword_classes() {
        let (_, kyc) = is_transfer_request("send 0.5 USDC to bob if KYC compliant");
        assert!(kyc);
        let (_, kyc) = is_transfer_request("send 0.5 USDC to bob with proof of compliance");
        assert!(kyc);
        // A proof keyword alone does not gate the transfer.
        let (_, kyc) = is_transfer_request("send 0.5 USDC to the verified address");
        assert!(!kyc);
        // Nor does a compliance keyword alone.
        let (_, kyc) = is_transfer_request("send 0.5 USDC to our compliance team");
        assert!(!kyc);
    }

    #[test]
    fn test_if_kyc_phrase_forces_gating() {
        let (_, kyc) = is_transfer_request("send 2 usdc to bob if kyc");
        assert!(kyc);
    }

    #[test]
    fn test_explicit_eth_address_wins_over_names() {
        let details = extract_transfer_details(
            "send 0.3 USDC to bob at 0x90F79bf6EB2c4f870365E785982E1f101E93b906",
        );
        assert_eq!(details.blockchain, Blockchain::Eth);
        assert_eq!(
            details.recipient,
            "0x90F79bf6EB2c4f870365E785982E1f101E93b906"
        );
        assert_eq!(details.amount, "0.3");
    }

    #[test]
    fn test_named_recipient_resolves_per_chain() {
        let eth = extract_transfer_details("send 1 USDC to bob");
        assert_eq!(eth.blockchain, Blockchain::Eth);
        assert_eq!(eth.recipient, "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

        let sol = extract_transfer_details("send 1 USDC to bob on solana");
        assert_eq!(sol.blockchain, Blockchain::Sol);
        assert_eq!(sol.recipient, "GsbwXfJraMomNxBcjYLcG3mxkBUiyWXAB32fGbSMQRdW");
    }

    #[test]
    fn test_standalone_sol_token() {
        let details = extract_transfer_details("transfer 0.2 usdc to charlie on sol");
        assert_eq!(details.blockchain, Blockchain::Sol);
        // "console" must not trip the sol detector
        let details = extract_transfer_details("send 0.2 usdc to charlie via console");
        assert_eq!(details.blockchain, Blockchain::Eth);
    }

    #[test]
    fn test_default_recipient_is_alice() {
        let details = extract_transfer_details("send usdc now");
        assert_eq!(details.recipient, "0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        assert_eq!(details.amount, "0.1");
    }

    #[test]
    fn test_blockchain_tag_serialization() {
        assert_eq!(serde_json::to_string(&Blockchain::Eth).unwrap(), "\"ETH\"");
        assert_eq!(serde_json::to_string(&Blockchain::Sol).unwrap(), "\"SOL\"");
    }
}
