use thiserror::Error;

/// Review Board 交互过程中的错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewBoardError {
    #[error("URL provided in REVIEWBOARD_SERVER is not a valid URL: {message}")]
    InvalidServerUrl { message: String },

    #[error("Parameter {name} has a malformed value '{value}': {message}")]
    MalformedParameter {
        name: String,
        value: String,
        message: String,
    },

    #[error("{message}")]
    IncompleteDescriptor { message: String },

    #[error("No Review Board server configurations found.")]
    NoServerConfigurationsLoaded,

    #[error("No Review Board server configuration found for server URL '{server_url}'.")]
    NoServerConfiguration { server_url: String },

    #[error("Unable to reach Review Board server {url}: {message}")]
    ServerUnreachable { url: String, message: String },

    #[error("The status update or review request does not exist ({url})")]
    ResourceNotFound { url: String },

    #[error("The API token does not have permission to update the status update ({url})")]
    Forbidden { url: String },

    #[error("The API token is invalid ({url})")]
    Unauthorized { url: String },

    #[error("Unexpected response from Review Board: HTTP {code}")]
    UnexpectedResponse { code: u16 },

    #[error("External process exited with code {exit_code}: {message}")]
    ExternalProcessFailed { exit_code: i32, message: String },

    #[error("Server configuration store error: {message}")]
    ConfigurationPersistence { message: String },

    #[error("Credential store error: {message}")]
    CredentialsUnavailable { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl ReviewBoardError {
    /// 是否为服务端返回的 HTTP 错误
    pub fn is_http_failure(&self) -> bool {
        matches!(
            self,
            ReviewBoardError::ResourceNotFound { .. }
                | ReviewBoardError::Forbidden { .. }
                | ReviewBoardError::Unauthorized { .. }
                | ReviewBoardError::UnexpectedResponse { .. }
        )
    }

    pub fn invalid_server_url(message: impl Into<String>) -> Self {
        ReviewBoardError::InvalidServerUrl {
            message: message.into(),
        }
    }

    pub fn incomplete(message: impl Into<String>) -> Self {
        ReviewBoardError::IncompleteDescriptor {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        ReviewBoardError::ConfigurationPersistence {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ReviewBoardError::InvalidArgument {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ReviewBoardError {
    fn from(error: std::io::Error) -> Self {
        ReviewBoardError::persistence(error.to_string())
    }
}

impl From<toml::de::Error> for ReviewBoardError {
    fn from(error: toml::de::Error) -> Self {
        ReviewBoardError::persistence(format!("TOML parse error: {}", error))
    }
}

impl From<toml::ser::Error> for ReviewBoardError {
    fn from(error: toml::ser::Error) -> Self {
        ReviewBoardError::persistence(format!("TOML serialize error: {}", error))
    }
}
