//! REST surface of the store ratings service: bearer-token auth, role-gated
//! handlers and the sea-orm queries behind them.

pub mod auth;
pub mod error;
pub mod extract;
pub mod ratings;
pub mod routes;
pub mod seed;
pub mod state;
pub mod stores;
pub mod users;

pub use routes::router;
pub use state::AppState;
