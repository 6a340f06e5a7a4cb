pub mod context;
pub mod outcome;

pub use context::Context;
pub use outcome::Outcome;
