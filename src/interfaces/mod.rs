pub mod transport;

pub use transport::{Connection, Connector, TransportRequest, TransportResponse};
