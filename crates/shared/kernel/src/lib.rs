//! Kernel utilities shared by the runner.
//! Keep this crate lightweight; today it owns configuration loading.
//!
//! ## Config loading
//! ```rust,no_run
//! use folio_kernel::config::load_config;
//! use folio_kernel::domain::config::RunnerConfig;
//!
//! let cfg: RunnerConfig = load_config(None::<&str>).unwrap_or_default();
//! println!("{}", cfg.api.base_url);
//! ```
pub mod config;

pub use folio_domain as domain;
