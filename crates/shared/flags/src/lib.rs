//! # Flags
//!
//! Normalization and validation of `--flag` style command-line tokens.
//!
//! Raw tokens are turned into a [`FlagMap`] by [`normalize`]:
//!
//! * `--name` becomes [`FlagValue::Bool`] (`true`),
//! * `--name=value` becomes [`FlagValue::Text`] (surrounding quotes stripped),
//! * `--name="a|b|c"` becomes [`FlagValue::List`] (segments trimmed, empty ones dropped).
//!
//! Hyphens in flag names are folded into underscores, so `--dry-run` and `--dry_run`
//! address the same key. A handler then checks the map against its [`FlagSpec`].
//!
//! ## Example
//!
//! ```rust
//! use folio_flags::{FlagKind, FlagSpec, FlagValue, normalize};
//!
//! let flags = normalize(["--verbose", "--languages=py|js"]).unwrap();
//! assert_eq!(flags.get("verbose"), Some(&FlagValue::Bool(true)));
//!
//! let spec = FlagSpec::new()
//!     .flag("verbose", FlagKind::Bool)
//!     .flag("languages", FlagKind::List)
//!     .flag("mode", FlagKind::Text)
//!     .with_default("mode", "all");
//!
//! let validated = spec.validate(flags).unwrap();
//! assert_eq!(validated.text("mode"), Some("all"));
//! assert_eq!(validated.list("languages"), Some(&["py".to_owned(), "js".to_owned()][..]));
//! ```

mod error;
mod normalize;
mod spec;
mod validate;
mod value;

pub use crate::error::{FlagError, Result};
pub use crate::normalize::{normalize, normalize_name, to_args};
pub use crate::spec::{FlagDecl, FlagSpec};
pub use crate::validate::{
    apply_defaults, exactly_one_of, one_of_choices, validate_allowed, validate_required,
};
pub use crate::value::{FlagKind, FlagMap, FlagValue};
