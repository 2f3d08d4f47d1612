// src/api/handlers/mod.rs
mod health;
mod sessions;

pub use health::health_check;
pub use sessions::{
    create_session, delete_session, drag, drop_file, get_session, reset, submit, upload_error_pages,
    upload_file,
};
