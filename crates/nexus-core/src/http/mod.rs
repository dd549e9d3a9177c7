//! Outbound HTTP: the transport port and the retrying executor built on it.

pub mod executor;
pub mod transport;

pub use executor::ResilientExecutor;
pub use transport::HttpTransport;
