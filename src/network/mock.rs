//! 脚本化的内存连接，用于测试调度流程。

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;

use crate::core::error::{InspectletError, Result, TransportError};
use crate::interfaces::{Connection, Connector, TransportRequest, TransportResponse};

enum Scripted {
    Respond(StatusCode, Vec<u8>),
    Fail(String),
}

#[derive(Default)]
struct State {
    script: VecDeque<Scripted>,
    requests: Vec<TransportRequest>,
    acquires: usize,
    releases: usize,
    refuse_acquire: bool,
}

/// 按顺序回放预设响应并记录收到的请求
#[derive(Clone, Default)]
pub struct ScriptedConnector {
    state: Arc<Mutex<State>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 连接创建总是失败
    pub fn refusing() -> Self {
        let connector = Self::default();
        connector.state.lock().refuse_acquire = true;
        connector
    }

    pub fn respond(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        let status = StatusCode::from_u16(status).expect("valid status");
        self.state
            .lock()
            .script
            .push_back(Scripted::Respond(status, body.into()));
        self
    }

    pub fn fail(self, message: impl Into<String>) -> Self {
        self.state
            .lock()
            .script
            .push_back(Scripted::Fail(message.into()));
        self
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.state.lock().requests.clone()
    }

    pub fn acquires(&self) -> usize {
        self.state.lock().acquires
    }

    pub fn releases(&self) -> usize {
        self.state.lock().releases
    }
}

impl Connector for ScriptedConnector {
    fn acquire(&self) -> Result<Box<dyn Connection>> {
        let mut state = self.state.lock();
        if state.refuse_acquire {
            return Err(InspectletError::InvalidUrl(url::ParseError::EmptyHost));
        }
        state.acquires += 1;
        Ok(Box::new(ScriptedConnection {
            state: self.state.clone(),
            open: true,
        }))
    }
}

struct ScriptedConnection {
    state: Arc<Mutex<State>>,
    open: bool,
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn execute(
        &mut self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        if !self.open {
            return Err(TransportError::Closed);
        }
        let mut state = self.state.lock();
        state.requests.push(request);
        match state.script.pop_front() {
            Some(Scripted::Respond(status, body)) => Ok(TransportResponse { status, body }),
            Some(Scripted::Fail(message)) => Err(TransportError::Custom(message)),
            None => Err(TransportError::Custom("script exhausted".into())),
        }
    }

    fn close(&mut self) {
        self.open = false;
        self.state.lock().releases += 1;
    }
}
