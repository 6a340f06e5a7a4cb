pub mod docker;
pub mod files;
pub mod languages;
pub mod process;
