pub mod app_context;
pub mod default_routers;
pub mod error_responses;
pub mod http_serve;
pub mod routers;
