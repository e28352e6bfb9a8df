//! Registration backend.
//!
//! Everything is wired once at startup: [`config::Config`] is read from the
//! environment, [`state::Storage::bootstrap`] builds the user store and
//! [`routes::router`] composes the routes over the resulting
//! [`state::AppState`].

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod validation;
