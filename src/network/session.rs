use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::cookie::Jar;
use url::Url;

use crate::core::config::SessionCookie;

/// 客户端实例级会话
///
/// 持有唯一的 Cookie Jar：同一实例打开的每条连接都读写它，
/// 登录写入的 Cookie 因此能带入业务请求，登出时由服务端清除。
#[derive(Debug)]
pub struct Session {
    base: Url,
    jar: Arc<Jar>,
    correlation: RwLock<Option<SessionCookie>>,
}

impl Session {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            jar: Arc::new(Jar::default()),
            correlation: RwLock::new(None),
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// 共享 Cookie Jar 句柄
    pub fn jar(&self) -> Arc<Jar> {
        self.jar.clone()
    }

    pub fn set_session_cookie(&self, cookie: Option<SessionCookie>) {
        *self.correlation.write() = cookie;
    }

    /// 将关联 Cookie 写入 Jar (每次建立连接时调用)
    pub fn seed(&self) {
        if let Some(cookie) = self.correlation.read().as_ref() {
            self.jar
                .add_cookie_str(&format!("{}={}", cookie.name, cookie.value), &self.base);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::cookie::CookieStore;

    #[test]
    fn seed_writes_correlation_cookie() {
        let base = Url::parse("https://www.inspectlet.com").unwrap();
        let session = Session::new(base.clone());
        session.seed();
        assert!(session.jar().cookies(&base).is_none());

        session.set_session_cookie(Some(SessionCookie {
            name: "PHPSESSID".into(),
            value: "abc123".into(),
        }));
        session.seed();
        let header = session.jar().cookies(&base).unwrap();
        assert_eq!(header.to_str().unwrap(), "PHPSESSID=abc123");
    }
}
