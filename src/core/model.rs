use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{InspectletError, Result};

/// 账户凭据，构造后不可变
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let email = email.into();
        let password = password.into();
        if email.is_empty() {
            return Err(InspectletError::MissingUsername);
        }
        if password.is_empty() {
            return Err(InspectletError::MissingPassword);
        }
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// 站点记录 (从仪表盘列表页抓取)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: String,
    pub name: String,
    pub captures: String,
    pub heatmaps: String,
    pub forms: String,
    pub status: String,
}

/// 调度器解码后的负载
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn into_json(self) -> Value {
        match self {
            Payload::Json(v) => v,
            Payload::Text(s) => Value::String(s),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Payload::Json(v) => v.to_string(),
            Payload::Text(s) => s,
        }
    }
}
