//! Step-size policy.
//!
//! The step size tunes how many computation steps the downstream prover folds
//! per round. Defaults are per-workload; an explicit "step size N" phrase in
//! the message always wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::intent::DEFAULT_STEP_SIZE;

/// Heavier workloads get a larger default so the prover folds fewer rounds.
const ESCALATED_STEP_SIZE: u32 = 100;

static STEP_SIZE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?:with\s+)?step\s+size\s+(\d+)",
        r"(?:using\s+)?(\d+)\s+step\s+size",
        r"step\s+(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// A user-specified step size, if the message names one.
pub fn explicit_step_size(message: &str) -> Option<u32> {
    let lower = message.to_lowercase();
    STEP_SIZE_RES
        .iter()
        .find_map(|re| re.captures(&lower))
        .and_then(|caps| caps[1].parse().ok())
}

/// Resolve the step size for a classified workload.
///
/// `workload` is the detected algorithm name (lowercase) and its input, when
/// known; fibonacci past 15 and factorial past 10 escalate the default.
pub fn resolve_step_size(message: &str, workload: Option<(&str, u64)>) -> u32 {
    if let Some(explicit) = explicit_step_size(message) {
        return explicit;
    }

    match workload {
        Some(("fibonacci", n)) if n > 15 => ESCALATED_STEP_SIZE,
        Some(("factorial", n)) if n > 10 => ESCALATED_STEP_SIZE,
        _ => DEFAULT_STEP_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_phrasings() {
        assert_eq!(explicit_step_size("prove collatz with step size 25"), Some(25));
        assert_eq!(explicit_step_size("prove collatz using 75 step size"), Some(75));
        assert_eq!(explicit_step_size("prove collatz step 10"), Some(10));
        assert_eq!(explicit_step_size("prove collatz"), None);
    }

    #[test]
    fn test_default_and_escalation() {
        assert_eq!(resolve_step_size("prove it", None), 50);
        assert_eq!(resolve_step_size("prove it", Some(("fibonacci", 15))), 50);
        assert_eq!(resolve_step_size("prove it", Some(("fibonacci", 16))), 100);
        assert_eq!(resolve_step_size("prove it", Some(("factorial", 10))), 50);
        assert_eq!(resolve_step_size("prove it", Some(("factorial", 11))), 100);
    }

    #[test]
    fn test_explicit_beats_escalation() {
        assert_eq!(
            resolve_step_size("prove it with step size 30", Some(("fibonacci", 40))),
            30
        );
    }
}
