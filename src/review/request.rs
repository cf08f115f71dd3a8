use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::infrastructure::error::ReviewBoardError;

/// 参数缺失时使用的哨兵值
pub const ABSENT_ID: i64 = -1;

/// 触发本次构建的审查请求信息
///
/// 每次构建步骤开始时从构建参数解析一次，之后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewRequest {
    review_id: Option<i64>,
    revision: Option<i64>,
    status_update_id: Option<i64>,
    server_url: Option<Url>,
}

impl ReviewRequest {
    pub fn new(
        review_id: Option<i64>,
        revision: Option<i64>,
        status_update_id: Option<i64>,
        server_url: Option<Url>,
    ) -> Self {
        Self {
            review_id: review_id.filter(|id| *id != ABSENT_ID),
            revision: revision.filter(|id| *id != ABSENT_ID),
            status_update_id: status_update_id.filter(|id| *id != ABSENT_ID),
            server_url,
        }
    }

    pub fn review_id(&self) -> Option<i64> {
        self.review_id
    }

    pub fn revision(&self) -> Option<i64> {
        self.revision
    }

    pub fn status_update_id(&self) -> Option<i64> {
        self.status_update_id
    }

    pub fn server_url(&self) -> Option<&Url> {
        self.server_url.as_ref()
    }

    /// 发送构建结果通知所需的字段是否齐全
    pub fn is_complete_for_notification(&self) -> bool {
        self.review_id.is_some() && self.status_update_id.is_some() && self.server_url.is_some()
    }

    /// 应用补丁还需要 diff 版本号
    pub fn is_complete_for_patch(&self) -> bool {
        self.is_complete_for_notification() && self.revision.is_some()
    }

    /// 取出状态更新资源的定位信息，字段不全时返回 IncompleteDescriptor
    pub fn status_update_target(&self) -> Result<StatusUpdateTarget<'_>, ReviewBoardError> {
        match (self.review_id, self.status_update_id, self.server_url.as_ref()) {
            (Some(review_id), Some(status_update_id), Some(server_url)) => Ok(StatusUpdateTarget {
                review_id,
                status_update_id,
                server_url,
            }),
            _ => Err(ReviewBoardError::incomplete(NOTIFY_PARAMETERS_MISSING)),
        }
    }
}

/// 通知步骤缺少参数时输出的固定消息
pub const NOTIFY_PARAMETERS_MISSING: &str =
    "REVIEWBOARD_REVIEW_ID, or REVIEWBOARD_STATUS_UPDATE_ID, or REVIEWBOARD_SERVER not provided in parameters";

/// 补丁步骤缺少参数时输出的固定消息
pub const SETUP_PARAMETERS_MISSING: &str =
    "REVIEWBOARD_REVIEW_ID, REVIEWBOARD_DIFF_REVISION or REVIEWBOARD_STATUS_UPDATE_ID, or REVIEWBOARD_SERVER not provided in parameters";

#[derive(Debug, Clone, Copy)]
pub struct StatusUpdateTarget<'a> {
    pub review_id: i64,
    pub status_update_id: i64,
    pub server_url: &'a Url,
}

/// 状态更新的状态值，线上取值固定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StatusUpdateState {
    Pending,
    Success,
    Failure,
    Error,
    TimedOut,
}

impl StatusUpdateState {
    pub const ALL: [StatusUpdateState; 5] = [
        StatusUpdateState::Pending,
        StatusUpdateState::Success,
        StatusUpdateState::Failure,
        StatusUpdateState::Error,
        StatusUpdateState::TimedOut,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusUpdateState::Pending => "pending",
            StatusUpdateState::Success => "done-success",
            StatusUpdateState::Failure => "done-failure",
            StatusUpdateState::Error => "error",
            StatusUpdateState::TimedOut => "timed-out",
        }
    }
}

impl fmt::Display for StatusUpdateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusUpdateState {
    type Err = ReviewBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusUpdateState::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| {
                ReviewBoardError::invalid_argument(format!(
                    "unknown status update state '{}', expected one of: pending, done-success, done-failure, error, timed-out",
                    s
                ))
            })
    }
}

impl From<StatusUpdateState> for String {
    fn from(state: StatusUpdateState) -> Self {
        state.as_str().to_string()
    }
}

impl TryFrom<String> for StatusUpdateState {
    type Error = ReviewBoardError;

    fn try_from(value: String) -> Result<Self, ReviewBoardError> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Url {
        Url::parse("http://localhost").unwrap()
    }

    #[test]
    fn test_sentinel_is_absent() {
        let request = ReviewRequest::new(Some(ABSENT_ID), Some(3), Some(ABSENT_ID), None);
        assert_eq!(request.review_id(), None);
        assert_eq!(request.revision(), Some(3));
        assert_eq!(request.status_update_id(), None);
    }

    #[test]
    fn test_completeness() {
        let notify_only = ReviewRequest::new(Some(1), None, Some(2), Some(server()));
        assert!(notify_only.is_complete_for_notification());
        assert!(!notify_only.is_complete_for_patch());

        let full = ReviewRequest::new(Some(1), Some(3), Some(2), Some(server()));
        assert!(full.is_complete_for_patch());

        let no_server = ReviewRequest::new(Some(1), Some(3), Some(2), None);
        assert!(!no_server.is_complete_for_notification());
        assert!(!no_server.is_complete_for_patch());
    }

    #[test]
    fn test_status_update_target() {
        let request = ReviewRequest::new(Some(1), None, Some(2), Some(server()));
        let target = request.status_update_target().unwrap();
        assert_eq!(target.review_id, 1);
        assert_eq!(target.status_update_id, 2);

        let incomplete = ReviewRequest::new(Some(1), None, None, Some(server()));
        let err = incomplete.status_update_target().unwrap_err();
        assert_eq!(err.to_string(), NOTIFY_PARAMETERS_MISSING);
    }

    #[test]
    fn test_state_wire_values() {
        assert_eq!(StatusUpdateState::Pending.as_str(), "pending");
        assert_eq!(StatusUpdateState::Success.as_str(), "done-success");
        assert_eq!(StatusUpdateState::Failure.as_str(), "done-failure");
        assert_eq!(StatusUpdateState::Error.as_str(), "error");
        assert_eq!(StatusUpdateState::TimedOut.as_str(), "timed-out");
    }

    #[test]
    fn test_state_parse() {
        for state in StatusUpdateState::ALL {
            assert_eq!(state.as_str().parse::<StatusUpdateState>().unwrap(), state);
        }
        assert!("success".parse::<StatusUpdateState>().is_err());
        assert!("PENDING".parse::<StatusUpdateState>().is_err());
    }
}
