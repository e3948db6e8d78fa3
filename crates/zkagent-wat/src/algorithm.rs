//! Algorithm detection, input extraction, and reference computation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The closed set of computations the synthesizer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Prime,
    Collatz,
    DigitalRoot,
    Fibonacci,
    Factorial,
    /// Placeholder when nothing was recognized; fixed result.
    Generic,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Prime => "prime",
            Algorithm::Collatz => "collatz",
            Algorithm::DigitalRoot => "digital_root",
            Algorithm::Fibonacci => "fibonacci",
            Algorithm::Factorial => "factorial",
            Algorithm::Generic => "generic",
        }
    }

    /// Input used when the source names none.
    pub fn default_input(&self) -> u64 {
        match self {
            Algorithm::Prime => 17,
            Algorithm::Collatz => 27,
            Algorithm::DigitalRoot => 12345,
            Algorithm::Fibonacci => 10,
            Algorithm::Factorial => 5,
            Algorithm::Generic => 0,
        }
    }

    /// Variable names conventionally assigned the input, tried in order.
    fn input_variables(&self) -> &'static [&'static str] {
        match self {
            Algorithm::Prime => &["number_to_check", "n", "num"],
            Algorithm::Collatz => &["starting_number", "start", "n"],
            Algorithm::DigitalRoot => &["input_number", "num", "n"],
            Algorithm::Fibonacci | Algorithm::Factorial => &["n", "num", "value"],
            Algorithm::Generic => &[],
        }
    }

    /// Call-style names whose first literal argument is the input.
    fn call_names(&self) -> &'static [&'static str] {
        match self {
            Algorithm::Prime => &["is_prime"],
            Algorithm::Collatz => &["collatz_steps", "collatz"],
            Algorithm::DigitalRoot => &["digital_root", "digit_sum"],
            Algorithm::Fibonacci => &["fibonacci", "fib"],
            Algorithm::Factorial => &["factorial"],
            Algorithm::Generic => &[],
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect which algorithm the source represents, by ordered substring search.
pub fn detect(source: &str) -> Algorithm {
    let lower = source.to_lowercase();
    if source.contains("is_prime") {
        Algorithm::Prime
    } else if lower.contains("collatz") {
        Algorithm::Collatz
    } else if source.contains("digital_root") || source.contains("digit_sum") {
        Algorithm::DigitalRoot
    } else if source.contains("fibonacci") {
        Algorithm::Fibonacci
    } else if source.contains("factorial") {
        Algorithm::Factorial
    } else {
        Algorithm::Generic
    }
}

static VAR_RE_CACHE: Lazy<Vec<(String, Regex)>> = Lazy::new(|| {
    let mut cache = Vec::new();
    for name in [
        "number_to_check",
        "starting_number",
        "input_number",
        "start",
        "num",
        "value",
        "n",
    ] {
        let re = Regex::new(&format!(r"\b{name}\b\s*=\s*(\d+)")).unwrap();
        cache.push((name.to_string(), re));
    }
    cache
});

static CALL_RE_CACHE: Lazy<Vec<(String, Regex)>> = Lazy::new(|| {
    let mut cache = Vec::new();
    for name in [
        "is_prime",
        "collatz_steps",
        "collatz",
        "digital_root",
        "digit_sum",
        "fibonacci",
        "fib",
        "factorial",
    ] {
        let re = Regex::new(&format!(r"\b{name}\s*\(\s*(\d+)\s*\)")).unwrap();
        cache.push((name.to_string(), re));
    }
    cache
});

fn lookup_var(source: &str, name: &str) -> Option<u64> {
    VAR_RE_CACHE
        .iter()
        .find(|(n, _)| n == name)
        .and_then(|(_, re)| re.captures(source))
        .and_then(|caps| caps[1].parse().ok())
}

fn lookup_call(source: &str, name: &str) -> Option<u64> {
    CALL_RE_CACHE
        .iter()
        .find(|(n, _)| n == name)
        .and_then(|(_, re)| re.captures(source))
        .and_then(|caps| caps[1].parse().ok())
}

/// Upper bound on extracted inputs. The emitted modules compute in wasm
/// `i32`, so a larger literal could not appear in an `i32.const` anyway.
pub const MAX_INPUT: u64 = i32::MAX as u64;

/// Extract the numeric input for a detected algorithm.
///
/// Conventional variable assignments are tried first, then call-style
/// literals; a miss falls back to the algorithm's default. Values are
/// clamped to [`MAX_INPUT`].
pub fn extract_input(source: &str, algorithm: Algorithm) -> u64 {
    algorithm
        .input_variables()
        .iter()
        .find_map(|name| lookup_var(source, name))
        .or_else(|| {
            algorithm
                .call_names()
                .iter()
                .find_map(|name| lookup_call(source, name))
        })
        .unwrap_or_else(|| algorithm.default_input())
        .min(MAX_INPUT)
}

/// Iteration bound for the Collatz walk. A safety bound, not a success
/// condition: the step count stops growing once it is hit.
const COLLATZ_STEP_CAP: i32 = 1000;

/// Compute the true result of an algorithm on an input.
///
/// Total for any input, and exact with respect to the emitted module: the
/// walks below use the same `i32` arithmetic (wrapping add/mul, identical
/// loop bounds) the structured WAT performs, so the returned value is what
/// the module evaluates to. The input is clamped to [`MAX_INPUT`] first.
pub fn compute(algorithm: Algorithm, input: u64) -> i64 {
    let n = input.min(MAX_INPUT) as i32;
    let result = match algorithm {
        Algorithm::Prime => i32::from(is_prime(n)),
        Algorithm::Collatz => collatz_steps(n),
        Algorithm::DigitalRoot => digital_root(n),
        Algorithm::Fibonacci => fibonacci(n),
        Algorithm::Factorial => factorial(n),
        Algorithm::Generic => 42,
    };
    i64::from(result)
}

fn is_prime(n: i32) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let n = n as u64;
    let mut i = 3u64;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

fn collatz_steps(start: i32) -> i32 {
    let mut n = start;
    let mut steps = 0;
    // 3n+1 wraps exactly like the module's i32.mul/i32.add
    while n != 1 && steps <= COLLATZ_STEP_CAP {
        if n % 2 == 0 {
            n /= 2;
        } else {
            n = n.wrapping_mul(3).wrapping_add(1);
        }
        steps += 1;
    }
    steps
}

fn digital_root(mut n: i32) -> i32 {
    while n >= 10 {
        let mut sum = 0;
        while n > 0 {
            sum += n % 10;
            n /= 10;
        }
        n = sum;
    }
    n
}

fn fibonacci(n: i32) -> i32 {
    if n <= 1 {
        return n;
    }
    let (mut a, mut b) = (0i32, 1i32);
    for _ in 2..=n {
        let next = a.wrapping_add(b);
        a = b;
        b = next;
    }
    b
}

fn factorial(n: i32) -> i32 {
    let mut result = 1i32;
    for i in 1..=n {
        result = result.wrapping_mul(i);
    }
    result
}
