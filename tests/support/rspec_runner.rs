//! Helpers for running the behaviour-style `rspec` suites.

use rspec::{block::Suite, ConfigurationBuilder, Logger, Runner};
use std::sync::Arc;

/// Runs `suite` on a single thread and fails the test process if any example
/// fails.
///
/// Each example steps its own cloned world. On one thread the runner's
/// output, and any log lines a failing tick emits, stay grouped under the
/// example that produced them in declaration order. rspec only
/// reports failed examples in its output, so `exit_on_failure` is what turns
/// a failing scenario into a failing `cargo test`.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + std::fmt::Debug,
{
    let logger = Arc::new(Logger::new(std::io::stdout()));
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(true)
        .build()
        .unwrap_or_else(|e| panic!("rspec configuration failed: {e}"));
    Runner::new(config, vec![logger]).run(suite);
}
