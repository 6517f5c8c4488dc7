use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use url::Url;

use crate::core::error::{Result, TransportError};

/// 单次传输请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub content_type: &'static str,
    pub body: Option<String>,
    /// 是否将响应头拼接进捕获的响应体
    pub include_headers: bool,
}

/// 传输层响应 (响应体以原始字节完整读入内存)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// 站点认可的成功状态：200 或 302
    pub fn is_accepted(&self) -> bool {
        self.status == StatusCode::OK || self.status == StatusCode::FOUND
    }

    /// 响应体文本，仅用于错误信息 (非法 UTF-8 以替换字符显示)
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// 一条连接句柄
///
/// 同一连接上的所有请求共享所属会话的 Cookie Jar。
#[async_trait]
pub trait Connection: Send {
    async fn execute(
        &mut self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError>;

    /// 关闭连接，释放底层资源
    fn close(&mut self);
}

/// 连接工厂
///
/// - 负责：按固定的浏览器配置创建全新的连接。
/// - 不负责：跨调用复用连接。
pub trait Connector: Send + Sync {
    fn acquire(&self) -> Result<Box<dyn Connection>>;
}
