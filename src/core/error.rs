//! 错误处理体系 (Error Handling System)
//!
//! 构造期错误走 `Result`，单次调用内的可恢复错误以 [`Envelope`] 数据形式返回。
//!
//! [`Envelope`]: crate::core::envelope::Envelope

use std::error::Error as StdError;

use thiserror::Error;

/// 全局错误定义 (Client Domain Errors)
#[derive(Error, Debug)]
pub enum InspectletError {
    #[error("Missing username.")]
    MissingUsername,

    #[error("Missing password.")]
    MissingPassword,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Form encoding error: {0}")]
    FormEncoding(#[from] serde_urlencoded::ser::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// 全局 Result 别名
pub type Result<T> = std::result::Result<T, InspectletError>;

/// 单次请求内的传输层失败
///
/// `Display` 文本即为失败信封中 `cURL Error: ` 之后的部分。
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("connection is not open")]
    Closed,

    #[error("{0}")]
    Custom(String),
}

impl TransportError {
    /// 展开 reqwest 的错误链，保留底层原因 (如 DNS/TLS 细节)
    pub fn detail(&self) -> String {
        match self {
            TransportError::Request(e) => {
                let mut text = e.to_string();
                let mut source = StdError::source(e);
                while let Some(cause) = source {
                    text.push_str(": ");
                    text.push_str(&cause.to_string());
                    source = StdError::source(cause);
                }
                text
            }
            other => other.to_string(),
        }
    }
}
