//! HTTP surface: session CRUD and move submission over REST.

pub mod errors;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
