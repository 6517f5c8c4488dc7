//! 登录协议 (Auth Protocol)
//!
//! 登录：表单 POST 凭据；登出：GET。两者的成功判定相同：
//! 传输未失败且状态码为 200 或 302。

use tracing::{debug, warn};
use url::Url;

use crate::core::error::Result;
use crate::core::model::Credentials;
use crate::interfaces::TransportRequest;
use crate::network::guard::ConnectionGuard;
use crate::network::request::{CONTENT_FORM, CONTENT_HTML};

/// 登录/登出端点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEndpoints {
    pub login: String,
    pub logout: String,
}

#[derive(Debug, Clone)]
pub struct Authenticator {
    login_url: Url,
    logout_url: Url,
    form: String,
}

impl Authenticator {
    pub fn new(base: &Url, endpoints: &AuthEndpoints, credentials: &Credentials) -> Result<Self> {
        let form = serde_urlencoded::to_string(vec![
            ("email", credentials.email()),
            ("password", credentials.password()),
            ("submform", "Sign In"),
        ])?;
        Ok(Self {
            login_url: base.join(&endpoints.login)?,
            logout_url: base.join(&endpoints.logout)?,
            form,
        })
    }

    pub async fn log_in(&self, conn: &mut ConnectionGuard) -> bool {
        if !conn.is_open() {
            return false;
        }

        let request = TransportRequest {
            method: reqwest::Method::POST,
            url: self.login_url.clone(),
            content_type: CONTENT_FORM,
            body: Some(self.form.clone()),
            include_headers: true,
        };

        match conn.execute(request).await {
            Ok(resp) if resp.is_accepted() => {
                debug!("登录成功 [{}]", resp.status);
                true
            }
            Ok(resp) => {
                debug!("登录被拒绝 [{}]", resp.status);
                false
            }
            Err(e) => {
                debug!("登录请求失败: {}", e.detail());
                false
            }
        }
    }

    pub async fn log_out(&self, conn: &mut ConnectionGuard) -> bool {
        if !conn.is_open() {
            return false;
        }

        let request = TransportRequest {
            method: reqwest::Method::GET,
            url: self.logout_url.clone(),
            content_type: CONTENT_HTML,
            body: None,
            include_headers: true,
        };

        match conn.execute(request).await {
            Ok(resp) if resp.is_accepted() => true,
            Ok(resp) => {
                warn!("登出失败，忽略 [{}]", resp.status);
                false
            }
            Err(e) => {
                warn!("登出失败，忽略: {}", e.detail());
                false
            }
        }
    }
}
