pub mod error;
pub mod services;
pub mod upload_gateway;
