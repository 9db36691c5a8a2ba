//! Location-tagged civic issues.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/issues?lat=&lng=&radius=&status=&category=` | Issues within `radius` km of a point |
//! | POST | `/api/issues` | Report a new issue |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;

pub use services::IssueService;
pub use stores::{IssueStore, PgIssueStore, ReferenceIssueStore};
