pub mod connection;
pub mod total_endpoint;

pub use connection::*;
pub use total_endpoint::*;
