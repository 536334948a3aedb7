// src/filesystem/mod.rs

//! Filesystem helpers
//!
//! Path handling for untrusted names: archive entries and installer
//! filenames taken from URLs.

pub mod path;

pub use path::{resolve_entry_path, sanitize_filename};
