//! inhibryx-web — Axum web server for Inhibryx.

pub mod handlers;
pub mod router;
pub mod state;
