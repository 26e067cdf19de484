use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// 根域名校验错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("domain is required")]
    Empty,
    #[error("domain has surrounding whitespace: {0:?}")]
    SurroundingWhitespace(String),
    #[error("domain contains invalid character {1:?}: {0}")]
    InvalidCharacter(String, char),
}

/// 单个数据源查询失败的原因
#[derive(Error, Debug)]
pub enum SourceError {
    /// 连接或传输失败
    #[error("transport error: {0}")]
    Transport(String),
    /// 非 2xx 响应
    #[error("received non-success response status: {0}")]
    Status(u16),
    /// 响应体无法解析
    #[error("malformed response body: {0}")]
    Format(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// 任务异常退出（panic 或被取消）
    #[error("source task aborted: {0}")]
    Task(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            SourceError::Status(status.as_u16())
        } else if err.is_decode() {
            SourceError::Format(err.to_string())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Format(err.to_string())
    }
}

/// 带有数据源名称的失败记录
#[derive(Error, Debug)]
#[error("error from {source_name}: {error}")]
pub struct SourceFailure {
    pub source_name: String,
    pub error: SourceError,
}

impl SourceFailure {
    pub fn new(source_name: impl Into<String>, error: SourceError) -> Self {
        SourceFailure {
            source_name: source_name.into(),
            error,
        }
    }
}

/// 子域名发现阶段的整体错误
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("no subdomain sources configured")]
    NoSources,
    #[error("{}", FailureList(.0))]
    SourcesFailed(Vec<SourceFailure>),
}

impl DiscoveryError {
    /// 第一个失败的数据源（按注册顺序）
    pub fn first_failure(&self) -> Option<&SourceFailure> {
        match self {
            DiscoveryError::SourcesFailed(failures) => failures.first(),
            DiscoveryError::NoSources => None,
        }
    }

    pub fn failed_sources(&self) -> Vec<&str> {
        match self {
            DiscoveryError::SourcesFailed(failures) => {
                failures.iter().map(|f| f.source_name.as_str()).collect()
            }
            DiscoveryError::NoSources => Vec::new(),
        }
    }
}

struct FailureList<'a>(&'a [SourceFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

/// DNS 解析器构建错误
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("invalid resolver address {0:?}: expected ip:port or ip")]
    InvalidAddress(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_failure_names_the_source() {
        let failure = SourceFailure::new("crt.sh", SourceError::Status(503));
        assert_eq!(
            failure.to_string(),
            "error from crt.sh: received non-success response status: 503"
        );
    }

    #[test]
    fn discovery_error_lists_every_failure() {
        let err = DiscoveryError::SourcesFailed(vec![
            SourceFailure::new("a", SourceError::Transport("refused".into())),
            SourceFailure::new("b", SourceError::Format("eof".into())),
        ]);
        let text = err.to_string();
        assert!(text.contains("error from a: transport error: refused"));
        assert!(text.contains("error from b: malformed response body: eof"));
        assert_eq!(err.failed_sources(), vec!["a", "b"]);
        assert_eq!(err.first_failure().unwrap().source_name, "a");
    }
}
