//! # Domain Models
//!
//! Plain configuration types shared by the runner crates.
//! Keep it lean: no I/O or process handling, just data and defaults.

pub mod config;
