//! 结果信封 (Result Envelope)
//!
//! 所有公开调用的统一返回形态：
//! 成功 `{success: true, data, html?}`，失败 `{success: false, message}`。

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success {
        data: T,
        /// 仅站点列表操作携带原始 HTML
        html: Option<String>,
    },
    Failure {
        message: String,
    },
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Envelope::Success { data, html: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Envelope::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Envelope::Success { data, .. } => Some(data),
            Envelope::Failure { .. } => None,
        }
    }

    pub fn html(&self) -> Option<&str> {
        match self {
            Envelope::Success { html, .. } => html.as_deref(),
            Envelope::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Envelope::Success { .. } => None,
            Envelope::Failure { message } => Some(message),
        }
    }

    /// 转换成功负载，失败原样透传
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Envelope::Success { data, html } => Envelope::Success { data: f(data), html },
            Envelope::Failure { message } => Envelope::Failure { message },
        }
    }

    /// 丢弃附带的原始 HTML
    pub fn without_html(self) -> Self {
        match self {
            Envelope::Success { data, .. } => Envelope::Success { data, html: None },
            failure => failure,
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Envelope::Success { data, html } => {
                let mut map = serializer.serialize_map(Some(if html.is_some() { 3 } else { 2 }))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
                if let Some(html) = html {
                    map.serialize_entry("html", html)?;
                }
                map.end()
            }
            Envelope::Failure { message } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", message)?;
                map.end()
            }
        }
    }
}

impl<T: Serialize> Envelope<T> {
    /// 序列化为线上格式的 JSON 值
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "success": false, "message": e.to_string() })
        })
    }
}
