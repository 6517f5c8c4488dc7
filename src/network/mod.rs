pub mod auth;
pub mod client;
pub mod dispatcher;
pub mod guard;
pub mod request;
pub mod response;
pub mod session;

#[cfg(test)]
pub(crate) mod mock;

pub use auth::{AuthEndpoints, Authenticator};
pub use client::ReqwestConnector;
pub use dispatcher::Dispatcher;
pub use guard::ConnectionGuard;
pub use request::{ApiRequest, Format, Method, Params};
pub use session::Session;
