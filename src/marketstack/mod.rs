pub mod client;
pub mod response;

pub use client::MarketstackClient;
pub use response::parse_eod;
