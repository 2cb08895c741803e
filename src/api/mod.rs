mod client;
mod connector;

pub use client::ApiClient;
pub use connector::Connector;
