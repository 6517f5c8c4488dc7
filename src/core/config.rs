//! 配置管理系统 (Configuration Management)
//!
//! `ClientConfig` 描述单个客户端实例的传输参数；`AppConfig` 供命令行入口使用，
//! 从 `config.toml` 与 `INSPECTLET_` 前缀的环境变量加载。

use std::path::Path;

use bon::Builder;
use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

use crate::core::error::{InspectletError, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.inspectlet.com";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows; U; Windows NT 5.1; rv:1.7.3) Gecko/20041001 Firefox/0.10.1";

/// TLS 证书校验策略
///
/// 默认 `TrustAll`：接受任意证书，信任所配置的主机名。这是显式策略，
/// 可通过配置改为 `Verify`。
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TlsPolicy {
    #[default]
    TrustAll,
    Verify,
}

/// 会话关联 Cookie
///
/// 在每次连接建立时写入 Cookie Jar，替代隐式的全局会话标识。
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}

/// 客户端传输配置
#[derive(Debug, Deserialize, Builder, Clone)]
pub struct ClientConfig {
    /// 站点根地址
    #[serde(default = "default_base_url")]
    #[builder(default = default_base_url())]
    pub base_url: String,

    /// 模拟浏览器 UA
    #[serde(default = "default_user_agent")]
    #[builder(default = default_user_agent())]
    pub user_agent: String,

    /// 重定向跟随上限
    #[serde(default = "default_max_redirects")]
    #[builder(default = default_max_redirects())]
    pub max_redirects: usize,

    /// 连接超时 (秒)
    #[serde(default = "default_timeout_secs")]
    #[builder(default = default_timeout_secs())]
    pub connect_timeout_secs: u64,

    /// 总超时 (秒)
    #[serde(default = "default_timeout_secs")]
    #[builder(default = default_timeout_secs())]
    pub timeout_secs: u64,

    #[serde(default)]
    #[builder(default)]
    pub tls: TlsPolicy,

    #[serde(default)]
    pub session_cookie: Option<SessionCookie>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
            connect_timeout_secs: default_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            tls: TlsPolicy::default(),
            session_cookie: None,
        }
    }
}

impl ClientConfig {
    /// 解析站点根地址
    pub fn base(&self) -> Result<Url> {
        Url::parse(&self.base_url).map_err(InspectletError::InvalidUrl)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_max_redirects() -> usize {
    10
}
fn default_timeout_secs() -> u64 {
    5
}

/// 命令行入口配置
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// 账户邮箱
    #[serde(default)]
    pub email: String,
    /// 账户密码
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub client: ClientConfig,
}

impl AppConfig {
    /// 从 `config.toml` 与环境变量加载配置
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let builder = Config::builder();

        let builder = if config_path.exists() {
            builder.add_source(File::from(config_path))
        } else {
            builder
        };

        let settings = builder
            .add_source(Environment::with_prefix("INSPECTLET").separator("__"))
            .build()
            .map_err(InspectletError::Config)?;
        settings.try_deserialize().map_err(InspectletError::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_browser_profile() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://www.inspectlet.com");
        assert_eq!(config.max_redirects, 10);
        assert_eq!(config.connect_timeout_secs, 5);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.tls, TlsPolicy::TrustAll);
        assert!(config.session_cookie.is_none());
        assert!(config.user_agent.contains("Firefox/0.10.1"));
    }

    #[test]
    fn builder_fills_defaults() {
        let config = ClientConfig::builder()
            .base_url("http://127.0.0.1:8080".to_string())
            .tls(TlsPolicy::Verify)
            .build();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.tls, TlsPolicy::Verify);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = ClientConfig::builder().base_url("not a url".to_string()).build();
        assert!(matches!(config.base(), Err(InspectletError::InvalidUrl(_))));
    }

    #[test]
    fn tls_policy_deserializes_snake_case() {
        let policy: TlsPolicy = serde_json::from_str("\"verify\"").unwrap();
        assert_eq!(policy, TlsPolicy::Verify);
        let config: ClientConfig = serde_json::from_str(r#"{"tls":"trust_all"}"#).unwrap();
        assert_eq!(config.tls, TlsPolicy::TrustAll);
        assert_eq!(config.max_redirects, 10);
    }
}
