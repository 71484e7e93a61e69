//! Built-in request handlers

pub mod static_files;

pub use static_files::{mime_type, StaticFiles};
