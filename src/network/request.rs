//! 请求描述与编码 (Request Descriptor & Encoding)

use indexmap::IndexMap;
use serde_json::Value;
use strum::{Display, EnumString};

use crate::core::error::Result;

pub const CONTENT_JSON: &str = "application/json;charset=UTF-8";
pub const CONTENT_FORM: &str = "application/x-www-form-urlencoded";
pub const CONTENT_HTML: &str = "text/html";

/// 请求参数 (键唯一，顺序无关)
pub type Params = IndexMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Method {
    Get,
    Post,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// 响应格式标记，同时决定请求编码与响应解码方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Format {
    Json,
    Html,
}

/// 调用方请求描述
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub path: String,
    pub method: Method,
    pub format: Format,
    pub params: Params,
}

impl ApiRequest {
    /// 默认 POST + JSON，无参数
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: Method::Post,
            format: Format::Json,
            params: Params::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// 按 (method, format) 编码请求体与 Content-Type
    pub fn encode(&self) -> Result<EncodedBody> {
        let encoded = match (self.method, self.format) {
            (Method::Post, Format::Json) => EncodedBody {
                content_type: CONTENT_JSON,
                body: Some(encode_json(&self.params)?),
            },
            (Method::Post, Format::Html) => EncodedBody {
                content_type: CONTENT_FORM,
                body: Some(encode_form(&self.params)?),
            },
            (Method::Get, Format::Json) => EncodedBody {
                content_type: CONTENT_JSON,
                body: None,
            },
            // 兜底分支：无请求体，按 HTML 请求
            (Method::Get, Format::Html) => EncodedBody {
                content_type: CONTENT_HTML,
                body: None,
            },
        };
        Ok(encoded)
    }
}

/// 编码结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: &'static str,
    pub body: Option<String>,
}

fn encode_json(params: &Params) -> Result<String> {
    if params.is_empty() {
        return Ok("{}".to_string());
    }
    Ok(serde_json::to_string(params)?)
}

/// 参数映射整体交给表单编码，标量按原文本，复合值以 JSON 文本传递
fn encode_form(params: &Params) -> Result<String> {
    let fields: Vec<(&str, String)> = params
        .iter()
        .map(|(k, v)| {
            let text = match v {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                composite => composite.to_string(),
            };
            (k.as_str(), text)
        })
        .collect();
    Ok(serde_urlencoded::to_string(fields)?)
}
