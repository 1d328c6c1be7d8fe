//! Scenario and property-based test harness for `ignition-core`.
//!
//! A `TestRecord`/`TestCategory` report type driving a small runner binary
//! that exercises the lifecycle core's bootstrap, ID-allocator, and status
//! surfaces end to end.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub mod scenarios;
#[cfg(feature = "property-based-tests")]
pub mod property_based;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("scenario {name} failed: {message}")]
    ScenarioFailed { name: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TestCategory {
    Bootstrap,
    FlagOverride,
    IdAllocator,
    Status,
    EndToEnd,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TestOutcome {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRecord {
    pub name: String,
    pub category: TestCategory,
    pub outcome: TestOutcome,
    pub duration: Duration,
    pub error_message: Option<String>,
}

impl TestRecord {
    pub fn passed(name: &str, category: TestCategory, duration: Duration) -> Self {
        TestRecord { name: name.to_string(), category, outcome: TestOutcome::Pass, duration, error_message: None }
    }

    pub fn failed(name: &str, category: TestCategory, duration: Duration, message: impl Into<String>) -> Self {
        TestRecord {
            name: name.to_string(),
            category,
            outcome: TestOutcome::Fail,
            duration,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub records: Vec<TestRecord>,
}

impl ScenarioReport {
    pub fn pass_count(&self) -> usize {
        self.records.iter().filter(|r| r.outcome == TestOutcome::Pass).count()
    }

    pub fn fail_count(&self) -> usize {
        self.records.iter().filter(|r| r.outcome == TestOutcome::Fail).count()
    }

    pub fn all_passed(&self) -> bool {
        self.fail_count() == 0
    }
}
