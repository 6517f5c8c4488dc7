//! Inspectlet 仪表盘客户端 (Session-authenticated Dashboard Client)
//!
//! 站点不提供公开 API：客户端通过 HTML 登录表单认证，在一次调用内维持
//! 浏览器式的 Cookie 会话，按格式编码请求，并从服务端渲染的列表页中抓取结构化数据。

pub mod core;
pub mod interfaces;
pub mod network;
pub mod sites;

pub use crate::core::config::{ClientConfig, SessionCookie, TlsPolicy};
pub use crate::core::envelope::Envelope;
pub use crate::core::error::{InspectletError, Result};
pub use crate::core::model::{Credentials, Payload, SiteRecord};
pub use crate::network::{ApiRequest, Format, Method, Params};
pub use crate::sites::Inspectlet;
