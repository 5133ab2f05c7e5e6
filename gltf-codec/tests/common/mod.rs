//! Test infrastructure for the glTF codec
//!
//! Provides fixture loading, stochastic input variations, and logging setup.

#![allow(dead_code)]

mod generators;
mod harness;
mod loader;

pub use generators::Gen;
pub use harness::{run_test, run_with_variations, TestResult};
pub use loader::{load_fixtures_by_name, TestCase};

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
