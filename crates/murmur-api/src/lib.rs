pub mod auth;
pub mod conversations;
pub mod error;
pub mod groups;
pub mod messages;
pub mod middleware;
pub mod reactions;
pub mod routes;
pub mod users;
pub mod validation;

pub use auth::{AppState, AppStateInner};
pub use routes::router;
