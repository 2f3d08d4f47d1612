// src/api/mod.rs
pub mod assets;
pub mod handlers;
pub mod routes;
pub mod sessions;
pub mod state;

pub use routes::configure_routes;
pub use state::AppState;
