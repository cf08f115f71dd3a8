use std::fmt;
use std::str::FromStr;

use crate::review::request::StatusUpdateState;

pub const JOB_SUCCEEDED: &str = "job succeeded";
pub const JOB_ABORTED: &str = "job aborted";
pub const JOB_NOT_BUILT: &str = "job not built";
pub const JOB_UNSTABLE: &str = "job unstable";
pub const JOB_FAILED: &str = "job failed";

/// 构建的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildResult {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
}

impl BuildResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildResult::Success => "success",
            BuildResult::Unstable => "unstable",
            BuildResult::Failure => "failure",
            BuildResult::NotBuilt => "not-built",
            BuildResult::Aborted => "aborted",
        }
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 无法识别的结果一律按失败处理，解析永不报错
impl FromStr for BuildResult {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Ok(match normalized.as_str() {
            "success" | "successful" => BuildResult::Success,
            "unstable" => BuildResult::Unstable,
            "not-built" | "notbuilt" => BuildResult::NotBuilt,
            "aborted" => BuildResult::Aborted,
            _ => BuildResult::Failure,
        })
    }
}

/// 构建结果对应的状态和说明
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOutcome {
    pub state: StatusUpdateState,
    pub description: &'static str,
}

pub fn classify(result: BuildResult) -> BuildOutcome {
    let (state, description) = match result {
        BuildResult::Success => (StatusUpdateState::Success, JOB_SUCCEEDED),
        BuildResult::Aborted => (StatusUpdateState::Error, JOB_ABORTED),
        BuildResult::NotBuilt => (StatusUpdateState::Error, JOB_NOT_BUILT),
        BuildResult::Unstable => (StatusUpdateState::Failure, JOB_UNSTABLE),
        BuildResult::Failure => (StatusUpdateState::Failure, JOB_FAILED),
    };

    BuildOutcome { state, description }
}
