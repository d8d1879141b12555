//! tagwindow - maintenance window to image tag redirector.
//!
//! Images are built weekly on a configured image day and tagged with their
//! build date. Clients ask `GET /window/{day}/{hour}` for the tag that applies
//! to their maintenance window and are redirected to `/tag/<YYYYMMDD>`.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod resolver;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use resolver::{resolve_tag, ImageDay, MaintenanceWindow, ResolveError, Tag};
pub use routes::create_router;
pub use state::AppState;
