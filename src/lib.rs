//! Backend for a two-pane file browser that hard-links entries from a source
//! tree into a destination directory.

pub mod core;
pub mod models;
pub mod server;
pub mod services;
