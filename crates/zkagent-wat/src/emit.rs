//! WAT module emission.
//!
//! Every emitted module has the same shape: a single
//! `(func (export "main") (param $dummy i32) (result i32))`. The strategies
//! differ only in the function body.

use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;

/// How the function body encodes the pre-computed result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitStrategy {
    /// Constant-folded arithmetic over literals that evaluates to the result.
    LiteralResult,
    /// Reproduces the algorithm's loop and branch structure over the literal
    /// input. The module still evaluates to the same result; it just does the
    /// work on the wasm stack instead of here.
    #[default]
    StructuredComputation,
}

pub(crate) fn emit(strategy: EmitStrategy, algorithm: Algorithm, input: u64, result: i64) -> String {
    match strategy {
        EmitStrategy::LiteralResult => emit_literal(algorithm, input, result),
        EmitStrategy::StructuredComputation => emit_structured(algorithm, input),
    }
}

/// Constant-folded body. Small results are decomposed into digit arithmetic
/// so the module carries a visible computation rather than a bare constant.
fn emit_literal(algorithm: Algorithm, input: u64, result: i64) -> String {
    let header = match algorithm {
        Algorithm::Generic => "  ;; Generic computation".to_string(),
        _ => format!("  ;; {algorithm} result for {input}: {result}"),
    };
    let body = literal_body(algorithm, result);
    format!("(module\n{header}\n  (func (export \"main\") (param $dummy i32) (result i32)\n{body}  )\n)")
}

fn literal_body(algorithm: Algorithm, result: i64) -> String {
    if algorithm == Algorithm::Generic {
        return "    i32.const 16\n    i32.const 2\n    i32.mul      ;; 16 * 2 = 32\n    i32.const 10\n    i32.add      ;; 32 + 10 = 42\n".to_string();
    }
    match result {
        0 => "    i32.const 5\n    i32.const 5\n    i32.sub      ;; 5 - 5 = 0\n".to_string(),
        1 => "    i32.const 2\n    i32.const 3\n    i32.mul      ;; 2 * 3 = 6\n    i32.const 5\n    i32.sub      ;; 6 - 5 = 1\n".to_string(),
        2..=9 => format!("    i32.const {result}\n"),
        10..=99 => {
            let tens = result / 10;
            let ones = result % 10;
            format!(
                "    i32.const {tens}\n    i32.const 10\n    i32.mul      ;; {tens} * 10 = {t}\n    i32.const {ones}\n    i32.add      ;; {t} + {ones} = {result}\n",
                t = tens * 10,
            )
        }
        100..=999 => {
            let hundreds = result / 100;
            let tens = (result % 100) / 10;
            let ones = result % 10;
            format!(
                "    i32.const {hundreds}\n    i32.const 100\n    i32.mul      ;; {hundreds} * 100 = {h}\n    i32.const {tens}\n    i32.const 10\n    i32.mul      ;; {tens} * 10 = {t}\n    i32.add      ;; {h} + {t} = {ht}\n    i32.const {ones}\n    i32.add      ;; {ht} + {ones} = {result}\n",
                h = hundreds * 100,
                t = tens * 10,
                ht = hundreds * 100 + tens * 10,
            )
        }
        // Negative (wrapped) and four-digit-plus results emit directly; the
        // computation always produces a valid i32, so the constant is too.
        _ => format!("    i32.const {result}\n"),
    }
}

/// Structured body: the algorithm re-expressed in wasm control flow over the
/// same literal input.
fn emit_structured(algorithm: Algorithm, input: u64) -> String {
    match algorithm {
        Algorithm::Prime => format!(
            r#"(module
  ;; Prime checker for {input}
  (func (export "main") (param $dummy i32) (result i32)
    (local $n i32)
    (local $i i32)

    (local.set $n (i32.const {input}))

    ;; n < 2 is not prime
    (if (i32.lt_s (local.get $n) (i32.const 2))
      (then (return (i32.const 0)))
    )

    (if (i32.eq (local.get $n) (i32.const 2))
      (then (return (i32.const 1)))
    )

    (if (i32.eq (i32.rem_s (local.get $n) (i32.const 2)) (i32.const 0))
      (then (return (i32.const 0)))
    )

    ;; trial division by odd i while i*i <= n
    (local.set $i (i32.const 3))
    (block $exit
      (loop $continue
        (br_if $exit (i32.gt_s (i32.mul (local.get $i) (local.get $i)) (local.get $n)))

        (if (i32.eq (i32.rem_s (local.get $n) (local.get $i)) (i32.const 0))
          (then (return (i32.const 0)))
        )

        (local.set $i (i32.add (local.get $i) (i32.const 2)))
        (br $continue)
      )
    )

    (i32.const 1)
  )
)"#
        ),
        Algorithm::Collatz => format!(
            r#"(module
  ;; Collatz sequence steps for {input}
  (func (export "main") (param $dummy i32) (result i32)
    (local $n i32)
    (local $steps i32)

    (local.set $n (i32.const {input}))
    (local.set $steps (i32.const 0))

    (block $exit
      (loop $continue
        (br_if $exit (i32.eq (local.get $n) (i32.const 1)))

        ;; safety bound
        (br_if $exit (i32.gt_s (local.get $steps) (i32.const 1000)))

        (if (i32.eq (i32.rem_s (local.get $n) (i32.const 2)) (i32.const 0))
          (then
            (local.set $n (i32.div_s (local.get $n) (i32.const 2)))
          )
          (else
            (local.set $n
              (i32.add
                (i32.mul (local.get $n) (i32.const 3))
                (i32.const 1)
              )
            )
          )
        )

        (local.set $steps (i32.add (local.get $steps) (i32.const 1)))

        (br $continue)
      )
    )

    (local.get $steps)
  )
)"#
        ),
        Algorithm::DigitalRoot => format!(
            r#"(module
  ;; Digital root calculator for {input}
  (func (export "main") (param $dummy i32) (result i32)
    (local $n i32)
    (local $sum i32)
    (local $digit i32)

    (local.set $n (i32.const {input}))

    ;; reduce until single digit
    (block $outer_exit
      (loop $outer_continue
        (br_if $outer_exit (i32.lt_s (local.get $n) (i32.const 10)))

        (local.set $sum (i32.const 0))
        (block $inner_exit
          (loop $inner_continue
            (br_if $inner_exit (i32.eq (local.get $n) (i32.const 0)))

            (local.set $digit (i32.rem_s (local.get $n) (i32.const 10)))
            (local.set $sum (i32.add (local.get $sum) (local.get $digit)))
            (local.set $n (i32.div_s (local.get $n) (i32.const 10)))

            (br $inner_continue)
          )
        )

        (local.set $n (local.get $sum))

        (br $outer_continue)
      )
    )

    (local.get $n)
  )
)"#
        ),
        Algorithm::Fibonacci => format!(
            r#"(module
  ;; Fibonacci calculator for n={input}, iterative
  (func (export "main") (param $dummy i32) (result i32)
    (local $n i32)
    (local $a i32)
    (local $b i32)
    (local $temp i32)
    (local $i i32)

    (local.set $n (i32.const {input}))

    (if (i32.le_s (local.get $n) (i32.const 1))
      (then (return (local.get $n)))
    )

    (local.set $a (i32.const 0))
    (local.set $b (i32.const 1))
    (local.set $i (i32.const 2))

    (block $exit
      (loop $continue
        (local.set $temp (i32.add (local.get $a) (local.get $b)))
        (local.set $a (local.get $b))
        (local.set $b (local.get $temp))
        (local.set $i (i32.add (local.get $i) (i32.const 1)))
        (br_if $continue (i32.le_s (local.get $i) (local.get $n)))
      )
    )

    (local.get $b)
  )
)"#
        ),
        Algorithm::Factorial => format!(
            r#"(module
  ;; Factorial calculator for n={input}
  (func (export "main") (param $dummy i32) (result i32)
    (local $n i32)
    (local $result i32)
    (local $i i32)

    (local.set $n (i32.const {input}))
    (local.set $result (i32.const 1))
    (local.set $i (i32.const 1))

    (if (i32.eq (local.get $n) (i32.const 0))
      (then (return (i32.const 1)))
    )

    (block $exit
      (loop $continue
        (local.set $result (i32.mul (local.get $result) (local.get $i)))
        (local.set $i (i32.add (local.get $i) (i32.const 1)))
        (br_if $continue (i32.le_s (local.get $i) (local.get $n)))
      )
    )

    (local.get $result)
  )
)"#
        ),
        Algorithm::Generic => emit_literal(Algorithm::Generic, input, 42),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_prime_one() {
        let wat = emit(EmitStrategy::LiteralResult, Algorithm::Prime, 17, 1);
        assert!(wat.contains("(export \"main\")"));
        assert!(wat.contains("i32.const 2\n    i32.const 3\n    i32.mul"));
        assert!(wat.contains("6 - 5 = 1"));
    }

    #[test]
    fn test_literal_prime_zero() {
        let wat = emit(EmitStrategy::LiteralResult, Algorithm::Prime, 18, 0);
        assert!(wat.contains("i32.const 5\n    i32.const 5\n    i32.sub"));
    }

    #[test]
    fn test_literal_three_digit_decomposition() {
        let wat = emit(EmitStrategy::LiteralResult, Algorithm::Collatz, 27, 111);
        assert!(wat.contains("i32.const 1\n    i32.const 100\n    i32.mul"));
        assert!(wat.contains("110 + 1 = 111"));
    }

    #[test]
    fn test_literal_two_digit_decomposition() {
        let wat = emit(EmitStrategy::LiteralResult, Algorithm::Fibonacci, 10, 55);
        assert!(wat.contains("i32.const 5\n    i32.const 10\n    i32.mul"));
        assert!(wat.contains("50 + 5 = 55"));
    }

    #[test]
    fn test_literal_large_result_is_direct_constant() {
        let wat = emit(EmitStrategy::LiteralResult, Algorithm::Factorial, 7, 5040);
        assert!(wat.contains("i32.const 5040"));
    }

    #[test]
    fn test_literal_wrapped_result_is_direct_constant() {
        // F(47) wraps past i32::MAX; the module carries the signed value.
        let wat = emit(
            EmitStrategy::LiteralResult,
            Algorithm::Fibonacci,
            47,
            -1_323_752_223,
        );
        assert!(wat.contains("i32.const -1323752223"));
    }

    #[test]
    fn test_structured_prime_has_trial_division_loop() {
        let wat = emit(EmitStrategy::StructuredComputation, Algorithm::Prime, 17, 1);
        assert!(wat.contains("(local.set $n (i32.const 17))"));
        assert!(wat.contains("loop $continue"));
        assert!(wat.contains("i32.rem_s"));
    }

    #[test]
    fn test_structured_collatz_has_safety_bound() {
        let wat = emit(
            EmitStrategy::StructuredComputation,
            Algorithm::Collatz,
            27,
            111,
        );
        assert!(wat.contains("(i32.const 1000)"));
        assert!(wat.contains("(local.get $steps)"));
    }

    #[test]
    fn test_structured_generic_is_constant_folded() {
        let wat = emit(
            EmitStrategy::StructuredComputation,
            Algorithm::Generic,
            0,
            42,
        );
        assert!(wat.contains("32 + 10 = 42"));
    }

    #[test]
    fn test_every_module_exports_main() {
        for strategy in [EmitStrategy::LiteralResult, EmitStrategy::StructuredComputation] {
            for algorithm in [
                Algorithm::Prime,
                Algorithm::Collatz,
                Algorithm::DigitalRoot,
                Algorithm::Fibonacci,
                Algorithm::Factorial,
                Algorithm::Generic,
            ] {
                let wat = emit(strategy, algorithm, 10, 55);
                assert!(
                    wat.contains("(func (export \"main\") (param $dummy i32) (result i32)"),
                    "{algorithm} / {strategy:?} missing canonical signature"
                );
                assert!(wat.starts_with("(module"));
                assert!(wat.ends_with(')'));
            }
        }
    }
}
