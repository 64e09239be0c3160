pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod render;

pub use http::HttpRoleService;
