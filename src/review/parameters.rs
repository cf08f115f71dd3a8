use url::Url;

use crate::infrastructure::error::ReviewBoardError;
use crate::review::request::ReviewRequest;

pub const REVIEWBOARD_REVIEW_ID: &str = "REVIEWBOARD_REVIEW_ID";
pub const REVIEWBOARD_DIFF_REVISION: &str = "REVIEWBOARD_DIFF_REVISION";
pub const REVIEWBOARD_STATUS_UPDATE_ID: &str = "REVIEWBOARD_STATUS_UPDATE_ID";
pub const REVIEWBOARD_SERVER: &str = "REVIEWBOARD_SERVER";

/// 能够识别的全部构建参数名
pub const RECOGNIZED_PARAMETERS: [&str; 4] = [
    REVIEWBOARD_SERVER,
    REVIEWBOARD_REVIEW_ID,
    REVIEWBOARD_DIFF_REVISION,
    REVIEWBOARD_STATUS_UPDATE_ID,
];

/// 一次构建携带的有序参数列表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildParameters {
    entries: Vec<(String, String)>,
}

impl BuildParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从进程环境中读取已识别的参数，CI 宿主会把构建参数导出为环境变量
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut parameters = Self::new();
        for name in RECOGNIZED_PARAMETERS {
            if let Some(value) = lookup(name) {
                parameters.push(name, value);
            }
        }
        parameters
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// 解析 `NAME=VALUE` 形式的参数
    pub fn push_assignment(&mut self, assignment: &str) -> Result<(), ReviewBoardError> {
        match assignment.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                self.push(name.trim(), value);
                Ok(())
            }
            _ => Err(ReviewBoardError::invalid_argument(format!(
                "build parameter '{}' must be written as NAME=VALUE",
                assignment
            ))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn parse_review_request(&self) -> Result<ReviewRequest, ReviewBoardError> {
        parse_review_request_from_parameters(self.iter())
    }
}

/// 从构建参数中解析审查请求信息
///
/// 同名参数以最后出现的值为准，未识别的参数直接忽略。
pub fn parse_review_request_from_parameters<I, K, V>(
    parameters: I,
) -> Result<ReviewRequest, ReviewBoardError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut review_id = None;
    let mut revision = None;
    let mut status_update_id = None;
    let mut server_url = None;

    for (name, value) in parameters {
        let name = name.as_ref();
        let value = value.as_ref();

        match name {
            REVIEWBOARD_REVIEW_ID => review_id = Some(parse_id(name, value)?),
            REVIEWBOARD_DIFF_REVISION => revision = Some(parse_id(name, value)?),
            REVIEWBOARD_STATUS_UPDATE_ID => status_update_id = Some(parse_id(name, value)?),
            REVIEWBOARD_SERVER => server_url = Some(parse_server_url(value)?),
            _ => {}
        }
    }

    Ok(ReviewRequest::new(review_id, revision, status_update_id, server_url))
}

fn parse_id(name: &str, value: &str) -> Result<i64, ReviewBoardError> {
    value
        .parse::<i64>()
        .map_err(|e| ReviewBoardError::MalformedParameter {
            name: name.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// 解析 REVIEWBOARD_SERVER，只做语法检查
///
/// 其他协议的 URL 同样接受，之后在查找服务器配置时自然找不到匹配项。
pub fn parse_server_url(value: &str) -> Result<Url, ReviewBoardError> {
    Url::parse(value).map_err(|e| ReviewBoardError::invalid_server_url(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_parameters() {
        let parameters = BuildParameters::new()
            .with(REVIEWBOARD_SERVER, "http://localhost")
            .with(REVIEWBOARD_REVIEW_ID, "1")
            .with(REVIEWBOARD_DIFF_REVISION, "3")
            .with(REVIEWBOARD_STATUS_UPDATE_ID, "2")
            .with("UNRELATED", "ignored");

        let request = parameters.parse_review_request().unwrap();
        assert_eq!(request.review_id(), Some(1));
        assert_eq!(request.revision(), Some(3));
        assert_eq!(request.status_update_id(), Some(2));
        assert_eq!(request.server_url().unwrap().as_str(), "http://localhost/");
        assert!(request.is_complete_for_patch());
    }

    #[test]
    fn test_missing_parameters_stay_absent() {
        let request = parse_review_request_from_parameters([(REVIEWBOARD_REVIEW_ID, "5")]).unwrap();
        assert_eq!(request.review_id(), Some(5));
        assert_eq!(request.revision(), None);
        assert_eq!(request.status_update_id(), None);
        assert!(request.server_url().is_none());
        assert!(!request.is_complete_for_notification());
    }

    #[test]
    fn test_last_write_wins() {
        let request = parse_review_request_from_parameters([
            (REVIEWBOARD_REVIEW_ID, "1"),
            (REVIEWBOARD_SERVER, "http://first.example.com"),
            (REVIEWBOARD_REVIEW_ID, "7"),
            (REVIEWBOARD_SERVER, "http://second.example.com"),
        ])
        .unwrap();

        assert_eq!(request.review_id(), Some(7));
        assert_eq!(request.server_url().unwrap().host_str(), Some("second.example.com"));
    }

    #[test]
    fn test_invalid_server_url() {
        let err = parse_review_request_from_parameters([(REVIEWBOARD_SERVER, "htp?:/invalidurl?/.")])
            .unwrap_err();
        assert!(matches!(err, ReviewBoardError::InvalidServerUrl { .. }));

        assert!(matches!(
            parse_server_url("not a url").unwrap_err(),
            ReviewBoardError::InvalidServerUrl { .. }
        ));
    }

    #[test]
    fn test_other_schemes_are_syntactically_valid() {
        let request = parse_review_request_from_parameters([(REVIEWBOARD_SERVER, "ftp://localhost")]).unwrap();
        assert_eq!(request.server_url().unwrap().scheme(), "ftp");
    }

    #[test]
    fn test_malformed_integer() {
        let err = parse_review_request_from_parameters([(REVIEWBOARD_STATUS_UPDATE_ID, "two")])
            .unwrap_err();
        match err {
            ReviewBoardError::MalformedParameter { name, value, .. } => {
                assert_eq!(name, REVIEWBOARD_STATUS_UPDATE_ID);
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_lookup_reads_recognized_names() {
        let parameters = BuildParameters::from_lookup(|name| match name {
            REVIEWBOARD_REVIEW_ID => Some("9".to_string()),
            REVIEWBOARD_SERVER => Some("https://rb.example.com".to_string()),
            _ => None,
        });

        assert_eq!(parameters.len(), 2);
        let request = parameters.parse_review_request().unwrap();
        assert_eq!(request.review_id(), Some(9));
    }

    #[test]
    fn test_push_assignment() {
        let mut parameters = BuildParameters::new();
        parameters.push_assignment("REVIEWBOARD_REVIEW_ID=4").unwrap();
        parameters.push_assignment("REVIEWBOARD_SERVER=http://host/rb?x=1").unwrap();
        assert!(parameters.push_assignment("no-equals").is_err());
        assert!(parameters.push_assignment("=value").is_err());

        let values: Vec<_> = parameters.iter().collect();
        assert_eq!(values[1], (REVIEWBOARD_SERVER, "http://host/rb?x=1"));
    }
}
