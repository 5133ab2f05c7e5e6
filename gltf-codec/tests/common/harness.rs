//! Test harness for running fixture cases with stochastic variations

use crate::common::{Gen, TestCase};
use gltf_codec::{from_slice, to_string, Error, ErrorKind, Property};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: Vec<u8>,
    pub expected: String,
    pub actual: String,
    pub seed: u64,
}

/// Variant name used by fixtures to name an expected failure.
fn kind_name(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Structural { .. } => "Structural",
        ErrorKind::Truncated { .. } => "Truncated",
        ErrorKind::ScalarConversion { .. } => "ScalarConversion",
        ErrorKind::ReferenceResolution { .. } => "ReferenceResolution",
        ErrorKind::Syntax { .. } => "Syntax",
        ErrorKind::DepthLimit { .. } => "DepthLimit",
        ErrorKind::ConflictingCameraVariants => "ConflictingCameraVariants",
        ErrorKind::NonFiniteNumber { .. } => "NonFiniteNumber",
        ErrorKind::TrailingContent { .. } => "TrailingContent",
        ErrorKind::Writer { .. } => "Writer",
    }
}

fn format_error(kind: &str, path: &str) -> String {
    format!("error {} at {:?}", kind, path)
}

fn describe(err: &Error) -> String {
    format_error(kind_name(err.kind()), &err.path())
}

/// Read `input` as `T`, write it back, and compare against the case.
fn run_input<T: Property>(case: &TestCase, input: Vec<u8>, seed: u64) -> TestResult {
    let expected = match &case.error {
        Some(err) => format_error(&err.kind, &err.path),
        None => case.expected_output().to_string(),
    };
    let actual = match from_slice::<T>(&input).and_then(|value| to_string(&value)) {
        Ok(text) => text,
        Err(err) => describe(&err),
    };

    TestResult {
        passed: actual == expected,
        input,
        expected,
        actual,
        seed,
    }
}

/// Run a single test case (canonical, no variations)
pub fn run_test<T: Property>(case: &TestCase) -> TestResult {
    run_input::<T>(case, case.input.as_bytes().to_vec(), 0)
}

/// Run test with random insignificant whitespace injected.
///
/// Whitespace never changes the result, so the expectation is the same as
/// for the canonical run.
pub fn run_with_variations<T: Property>(case: &TestCase, gen: &mut Gen) -> TestResult {
    let input = gen.respace(&case.input);
    run_input::<T>(case, input, gen.seed)
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set GLTF_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nInput:");
        eprintln!("{}", String::from_utf8_lossy(&self.input));
        eprintln!("\nExpected:");
        eprintln!("  {}", self.expected);
        eprintln!("\nActual:");
        eprintln!("  {}", self.actual);
    }
}
