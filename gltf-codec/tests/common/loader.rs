//! Fixture loading from YAML files

use serde::Deserialize;
use std::path::Path;

/// A single test case from a fixture file.
///
/// With neither `output` nor `error`, the input is expected to come back out
/// unchanged, so it must already be compact.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    pub input: String,
    /// Expected serialization when it differs from the input.
    #[serde(default)]
    pub output: Option<String>,
    /// Expected failure instead of output.
    #[serde(default)]
    pub error: Option<ExpectedError>,
}

/// Failure a case must produce.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedError {
    /// `ErrorKind` variant name, e.g. `Truncated`.
    pub kind: String,
    /// Rendered error path, e.g. `cameras[0].type`.
    #[serde(default)]
    pub path: String,
}

impl TestCase {
    /// Serialization the case expects on success.
    pub fn expected_output(&self) -> &str {
        self.output.as_deref().unwrap_or(&self.input)
    }
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    load_fixtures(&path)
}
