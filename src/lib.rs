// src/lib.rs
pub mod api;
pub mod banner;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod intake;
pub mod models;
pub mod presenter;
pub mod workflow;
