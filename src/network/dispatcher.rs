//! 请求调度器 (Request Dispatcher)
//!
//! 单次调用的完整生命周期：建立连接 → 登录 → 业务请求 → 登出 → 释放连接 → 解释响应。
//! 可恢复的错误一律以失败信封返回，不以 `Err` 形式向上传播。

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::core::envelope::Envelope;
use crate::core::error::Result;
use crate::core::model::Payload;
use crate::interfaces::{Connector, TransportRequest};
use crate::network::auth::Authenticator;
use crate::network::guard::ConnectionGuard;
use crate::network::request::{ApiRequest, EncodedBody};
use crate::network::response::interpret;

pub const MSG_NO_CONNECTION: &str = "Cannot initialize connection.";
pub const MSG_LOGIN_FAILED: &str = "Failed to log in.";

#[derive(Clone)]
pub struct Dispatcher {
    base: Url,
    connector: Arc<dyn Connector>,
    auth: Authenticator,
}

impl Dispatcher {
    pub fn new(base: Url, connector: Arc<dyn Connector>, auth: Authenticator) -> Self {
        Self {
            base,
            connector,
            auth,
        }
    }

    /// 在建立连接之前完成 URL 与请求体的构造
    fn prepare(&self, request: &ApiRequest) -> Result<(Url, EncodedBody)> {
        let url = self.base.join(&request.path)?;
        Ok((url, request.encode()?))
    }

    pub async fn run(&self, request: ApiRequest) -> Envelope<Payload> {
        let (url, encoded) = match self.prepare(&request) {
            Ok(prepared) => prepared,
            Err(e) => return Envelope::failure(format!("Invalid request: {}", e)),
        };

        let mut conn = match self.connector.acquire() {
            Ok(conn) => ConnectionGuard::new(conn),
            Err(e) => {
                warn!("连接初始化失败: {}", e);
                return Envelope::failure(MSG_NO_CONNECTION);
            }
        };

        if !self.auth.log_in(&mut conn).await {
            conn.release();
            return Envelope::failure(MSG_LOGIN_FAILED);
        }

        debug!("{} {} ({})", request.method, url, request.format);
        let outgoing = TransportRequest {
            method: request.method.into(),
            url,
            content_type: encoded.content_type,
            body: encoded.body,
            include_headers: false,
        };

        let resp = match conn.execute(outgoing).await {
            Ok(resp) => resp,
            Err(e) => {
                conn.release();
                return Envelope::failure(format!("cURL Error: {}", e.detail()));
            }
        };

        if !resp.is_accepted() {
            conn.release();
            return Envelope::failure(format!(
                "HTTP Error [{}]: {}",
                resp.status.as_u16(),
                resp.body_text()
            ));
        }

        // 登出失败不影响本次结果
        self.auth.log_out(&mut conn).await;
        conn.release();

        interpret(request.format, resp.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Credentials;
    use crate::network::auth::AuthEndpoints;
    use crate::network::mock::ScriptedConnector;
    use crate::network::request::{CONTENT_HTML, Format, Method};
    use serde_json::{Value, json};

    fn dispatcher(connector: &ScriptedConnector) -> Dispatcher {
        let base = Url::parse("https://www.inspectlet.com").unwrap();
        let endpoints = AuthEndpoints {
            login: "/signin/login".into(),
            logout: "/control/logout".into(),
        };
        let creds = Credentials::new("me@example.com", "secret").unwrap();
        let auth = Authenticator::new(&base, &endpoints, &creds).unwrap();
        Dispatcher::new(base, Arc::new(connector.clone()), auth)
    }

    fn paths(connector: &ScriptedConnector) -> Vec<String> {
        connector
            .requests()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect()
    }

    #[tokio::test]
    async fn acquire_failure_skips_everything() {
        let connector = ScriptedConnector::refusing();
        let env = dispatcher(&connector).run(ApiRequest::new("/x")).await;
        assert_eq!(env.message(), Some(MSG_NO_CONNECTION));
        assert!(connector.requests().is_empty());
        assert_eq!(connector.releases(), 0);
    }

    #[tokio::test]
    async fn login_failure_never_issues_user_request() {
        let connector = ScriptedConnector::new().respond(403, "nope");
        let env = dispatcher(&connector).run(ApiRequest::new("/x")).await;
        assert_eq!(env.message(), Some(MSG_LOGIN_FAILED));
        assert_eq!(paths(&connector), vec!["/signin/login"]);
        assert_eq!(connector.releases(), 1);
    }

    #[tokio::test]
    async fn login_transport_failure_is_generic() {
        let connector = ScriptedConnector::new().fail("dns error");
        let env = dispatcher(&connector).run(ApiRequest::new("/x")).await;
        assert_eq!(env.message(), Some(MSG_LOGIN_FAILED));
        assert_eq!(connector.releases(), 1);
    }

    #[tokio::test]
    async fn transport_failure_skips_logout() {
        let connector = ScriptedConnector::new()
            .respond(302, "")
            .fail("operation timed out");
        let env = dispatcher(&connector).run(ApiRequest::new("/x")).await;
        assert_eq!(env.message(), Some("cURL Error: operation timed out"));
        assert_eq!(paths(&connector), vec!["/signin/login", "/x"]);
        assert_eq!(connector.releases(), 1);
    }

    #[tokio::test]
    async fn http_error_skips_logout() {
        let connector = ScriptedConnector::new()
            .respond(200, "")
            .respond(404, "Not Found");
        let env = dispatcher(&connector).run(ApiRequest::new("/x")).await;
        assert_eq!(env.message(), Some("HTTP Error [404]: Not Found"));
        assert_eq!(paths(&connector), vec!["/signin/login", "/x"]);
        assert_eq!(connector.releases(), 1);
    }

    #[tokio::test]
    async fn success_logs_out_then_decodes() {
        let connector = ScriptedConnector::new()
            .respond(200, "")
            .respond(200, r#"{"captures":[1,2]}"#)
            .respond(302, "");
        let env = dispatcher(&connector).run(ApiRequest::new("/x")).await;
        assert_eq!(
            env,
            Envelope::success(Payload::Json(json!({"captures": [1, 2]})))
        );
        assert_eq!(
            paths(&connector),
            vec!["/signin/login", "/x", "/control/logout"]
        );
        assert_eq!(connector.acquires(), 1);
        assert_eq!(connector.releases(), 1);
    }

    #[tokio::test]
    async fn logout_failure_does_not_change_outcome() {
        let connector = ScriptedConnector::new()
            .respond(200, "")
            .respond(302, "null")
            .fail("connection reset");
        let env = dispatcher(&connector).run(ApiRequest::new("/x")).await;
        assert_eq!(env, Envelope::success(Payload::Json(Value::Null)));
        assert_eq!(connector.releases(), 1);
    }

    #[tokio::test]
    async fn undecodable_json_after_clean_logout() {
        let connector = ScriptedConnector::new()
            .respond(200, "")
            .respond(200, "not json")
            .respond(200, "");
        let env = dispatcher(&connector).run(ApiRequest::new("/x")).await;
        assert!(env.message().unwrap().starts_with("JSON Error ["));
        assert_eq!(connector.requests().len(), 3);
        assert_eq!(connector.releases(), 1);
    }

    #[tokio::test]
    async fn raw_bytes_reach_the_json_decoder() {
        let connector = ScriptedConnector::new()
            .respond(200, "")
            .respond(200, b"{\"a\":\"\xc3\x28\"}".to_vec())
            .respond(200, "");
        let env = dispatcher(&connector).run(ApiRequest::new("/x")).await;
        assert_eq!(env.message(), Some("JSON Error [5]"));
        assert_eq!(connector.releases(), 1);
    }

    #[tokio::test]
    async fn http_error_body_is_shown_lossily() {
        let connector = ScriptedConnector::new()
            .respond(200, "")
            .respond(500, b"bad \xff".to_vec());
        let env = dispatcher(&connector).run(ApiRequest::new("/x")).await;
        assert_eq!(env.message(), Some("HTTP Error [500]: bad \u{FFFD}"));
    }

    #[tokio::test]
    async fn user_request_never_includes_headers() {
        let connector = ScriptedConnector::new()
            .respond(200, "")
            .respond(200, "<html></html>")
            .respond(200, "");
        let req = ApiRequest::new("/dashboard")
            .method(Method::Get)
            .format(Format::Html);
        let env = dispatcher(&connector).run(req).await;
        assert_eq!(env, Envelope::success(Payload::Text("<html></html>".into())));

        let sent = connector.requests();
        assert!(sent[0].include_headers);
        assert!(!sent[1].include_headers);
        assert_eq!(sent[1].method, reqwest::Method::GET);
        assert_eq!(sent[1].content_type, CONTENT_HTML);
        assert_eq!(sent[1].body, None);
    }
}
