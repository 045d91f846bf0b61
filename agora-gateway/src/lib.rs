//! The marketplace's HTTP surface: an axum `Router` over the storage and
//! protocol layers, plus the bearer-token auth extractor and error taxonomy
//! every route shares.

mod auth;
mod error;
mod router;
mod routes;
mod state;

pub use auth::AuthenticatedAgent;
pub use error::AppError;
pub use router::router;
pub use state::AppState;
