//! Inspectlet 站点模块
//!
//! 仪表盘没有公开 API：每次调用都完整执行 登录 → 请求 → 登出，
//! 站点列表从服务端渲染的 HTML 中抓取。

mod listing;
mod selectors;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::core::config::ClientConfig;
use crate::core::envelope::Envelope;
use crate::core::error::Result;
use crate::core::model::{Credentials, Payload, SiteRecord};
use crate::interfaces::Connector;
use crate::network::{
    ApiRequest, AuthEndpoints, Authenticator, Dispatcher, Format, Method, Params,
    ReqwestConnector, Session,
};

pub use self::listing::{CAPTURES_PREFIX, ScrapeError, extract_sites};
pub use self::selectors::ListingSelectors;

pub const LOGIN_PATH: &str = "/signin/login";
pub const LOGOUT_PATH: &str = "/control/logout";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const CAPTURE_API_PATH: &str = "/dashboard/captureapi/";

/// Inspectlet 仪表盘客户端
///
/// Cookie Jar 在实例内共享，连接则每次调用独立建立并释放。
#[derive(Clone)]
pub struct Inspectlet {
    dispatcher: Dispatcher,
}

impl Inspectlet {
    /// 以默认配置创建客户端；用户名或密码为空时失败
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::with_config(Credentials::new(username, password)?, ClientConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let base = config.base()?;
        let session = Arc::new(Session::new(base.clone()));
        session.set_session_cookie(config.session_cookie.clone());
        let connector = Arc::new(ReqwestConnector::new(config, session));
        Self::with_connector(credentials, base, connector)
    }

    /// 使用自定义连接工厂 (测试或替换传输层)
    pub fn with_connector(
        credentials: Credentials,
        base: Url,
        connector: Arc<dyn Connector>,
    ) -> Result<Self> {
        let endpoints = AuthEndpoints {
            login: LOGIN_PATH.to_string(),
            logout: LOGOUT_PATH.to_string(),
        };
        let auth = Authenticator::new(&base, &endpoints, &credentials)?;
        Ok(Self {
            dispatcher: Dispatcher::new(base, connector, auth),
        })
    }

    /// 执行任意已认证请求
    pub async fn run(&self, request: ApiRequest) -> Envelope<Payload> {
        self.dispatcher.run(request).await
    }

    /// 获取账户下的站点列表
    ///
    /// 成功时 `data` 为抓取出的记录，原始页面保存在 `html` 字段。
    pub async fn list_sites(&self) -> Envelope<Vec<SiteRecord>> {
        let request = ApiRequest::new(DASHBOARD_PATH)
            .method(Method::Get)
            .format(Format::Html);

        match self.dispatcher.run(request).await {
            Envelope::Success { data, .. } => {
                let html = data.into_text();
                let (sites, diagnostic) = extract_sites(&html);
                if let Some(e) = diagnostic {
                    warn!("站点列表抓取中断，保留 {} 条记录: {}", sites.len(), e);
                }
                debug!("共发现 {} 个站点", sites.len());
                Envelope::Success {
                    data: sites,
                    html: Some(html),
                }
            }
            Envelope::Failure { message } => Envelope::Failure { message },
        }
    }

    /// 获取指定站点的录屏数据，参数原样转发
    pub async fn get_captures(&self, site_id: &str, params: Params) -> Envelope<Value> {
        let request = ApiRequest::new(format!("{}{}", CAPTURE_API_PATH, site_id))
            .method(Method::Post)
            .format(Format::Json)
            .params(params);

        self.dispatcher.run(request).await.map(|p| p.into_json())
    }
}
