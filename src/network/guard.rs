use tracing::debug;

use crate::core::error::TransportError;
use crate::interfaces::{Connection, TransportRequest, TransportResponse};

/// 调用作用域内独占的连接
///
/// 采用显式的所有权管理：`release` 消费自身并关闭连接；
/// 若调用在中途被取消 (future 被丢弃)，`Drop` 负责兜底关闭。
/// 无论哪条路径，底层连接恰好关闭一次。
pub struct ConnectionGuard {
    conn: Option<Box<dyn Connection>>,
}

impl ConnectionGuard {
    pub fn new(conn: Box<dyn Connection>) -> Self {
        Self { conn: Some(conn) }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub async fn execute(
        &mut self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        match self.conn.as_mut() {
            Some(conn) => conn.execute(request).await,
            None => Err(TransportError::Closed),
        }
    }

    /// 显式释放连接
    pub fn release(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            conn.close();
        }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.conn.is_some() {
            debug!("连接未显式释放，执行兜底关闭");
            self.close();
        }
    }
}
