//! Client-side data layer for the HR portal: a typed gateway to the remote
//! API, a persisted session, a write-through entity store and role-scoped
//! views over it.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod models;
pub mod portal;
pub mod routes;
pub mod store;
pub mod utils;
pub mod views;

pub use api::{Gateway, HttpGateway};
pub use config::Config;
pub use error::{HrmError, HrmResult};
pub use portal::Portal;
pub use store::{EntityStore, LoadState};
