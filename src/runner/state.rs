use std::fmt;

use serde::{Deserialize, Serialize};

/// Execution status shared by test steps and the owning plan.
///
/// Steps only ever report `Pass` or `Fail`; `Running` and `Abort` belong to
/// the plan lifecycle. There is one status type for the whole system and it
/// carries no numeric semantics, only identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Running,
    Pass,
    Fail,
    Abort,
}

impl TestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TestStatus::Running)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TestStatus::Running => "RUNNING",
            TestStatus::Pass => "PASS",
            TestStatus::Fail => "FAIL",
            TestStatus::Abort => "ABORT",
        };
        f.write_str(label)
    }
}

/// Rule for folding step statuses into the plan result.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Aggregation {
    /// The plan passes only if every step passes.
    #[default]
    AllPass,
    /// The last executed step decides, final-smoke-check semantics.
    LastStep,
}

/// Record of a single executed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub name: String,
    pub status: TestStatus,
    pub duration_ms: u64,
}
