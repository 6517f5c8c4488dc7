//! 会话传输 (Session Transport)
//!
//! 基于 reqwest 的连接实现。每次 `acquire` 构建一个全新的 `reqwest::Client`，
//! 固定配置：浏览器 UA、共享 Cookie Jar、最多 10 次重定向并自动填充 Referer、
//! 5 秒连接/总超时、响应体以原始字节整体读入内存。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use tracing::{debug, warn};

use crate::core::config::{ClientConfig, TlsPolicy};
use crate::core::error::{InspectletError, Result, TransportError};
use crate::interfaces::{Connection, Connector, TransportRequest, TransportResponse};
use crate::network::session::Session;

/// 生产环境连接工厂
#[derive(Debug, Clone)]
pub struct ReqwestConnector {
    config: ClientConfig,
    session: Arc<Session>,
}

impl ReqwestConnector {
    pub fn new(config: ClientConfig, session: Arc<Session>) -> Self {
        Self { config, session }
    }

    /// 构建底层的 HTTP 客户端
    fn build_client(&self) -> Result<reqwest::Client> {
        let builder = reqwest::Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .cookie_provider(self.session.jar())
            .redirect(reqwest::redirect::Policy::limited(self.config.max_redirects))
            .referer(true)
            .connect_timeout(Duration::from_secs(self.config.connect_timeout_secs))
            .timeout(Duration::from_secs(self.config.timeout_secs));

        let builder = match self.config.tls {
            TlsPolicy::TrustAll => {
                warn!("TLS 证书校验已关闭 (TrustAll): {}", self.session.base());
                builder.danger_accept_invalid_certs(true)
            }
            TlsPolicy::Verify => builder,
        };

        builder.build().map_err(InspectletError::Network)
    }
}

impl Connector for ReqwestConnector {
    fn acquire(&self) -> Result<Box<dyn Connection>> {
        let client = self.build_client()?;
        self.session.seed();
        debug!("连接已建立");
        Ok(Box::new(ReqwestConnection {
            client: Some(client),
        }))
    }
}

/// 单次调用内的连接句柄
pub struct ReqwestConnection {
    client: Option<reqwest::Client>,
}

#[async_trait]
impl Connection for ReqwestConnection {
    async fn execute(
        &mut self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let client = self.client.as_ref().ok_or(TransportError::Closed)?;

        let mut rb = client
            .request(request.method.clone(), request.url.clone())
            .header(CONTENT_TYPE, request.content_type);
        if let Some(body) = request.body {
            rb = rb.body(body);
        }

        let resp = rb.send().await?;
        let status = resp.status();
        let head = request
            .include_headers
            .then(|| render_head(resp.version(), status, resp.headers()));
        let bytes = resp.bytes().await?;

        debug!("{} {} -> {} ({} bytes)", request.method, request.url, status, bytes.len());

        let body = match head {
            Some(head) => {
                let mut body = head.into_bytes();
                body.extend_from_slice(&bytes);
                body
            }
            None => bytes.to_vec(),
        };
        Ok(TransportResponse { status, body })
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            debug!("连接已关闭");
        }
    }
}

/// 还原响应头文本 (状态行 + 头部 + 空行)
fn render_head(version: reqwest::Version, status: reqwest::StatusCode, headers: &HeaderMap) -> String {
    let mut head = format!("{:?} {}\r\n", version, status);
    for (name, value) in headers {
        head.push_str(name.as_str());
        head.push_str(": ");
        head.push_str(&String::from_utf8_lossy(value.as_bytes()));
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    head
}
