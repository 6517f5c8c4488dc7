pub mod config;
pub mod envelope;
pub mod error;
pub mod model;
