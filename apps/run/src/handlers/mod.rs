//! Builtin commands. Each module exposes `NAME`, `DOCS`, `validate_flags`, `run` and a
//! `descriptor()` registered in [`crate::dispatch::Registry::builtin`].

pub mod api;
pub mod db;
pub mod docker;
pub mod format;
pub mod lint;
pub mod structure;
