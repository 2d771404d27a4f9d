pub mod api_client;
pub mod error;
pub mod session;
pub mod tools;
