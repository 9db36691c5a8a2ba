//! Server-rendered landing page with the issue map.

pub mod handlers;
pub mod routes;

pub use handlers::HomeState;
