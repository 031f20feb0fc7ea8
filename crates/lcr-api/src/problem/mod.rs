//! Tracked problems: creation, listing, notes, deletion, the due dashboard
//! and review events.

pub mod model;
pub mod routes;
pub mod service;

pub use routes::routes;
