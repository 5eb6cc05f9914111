//! vaultboy library
//!
//! Converts between `.env`/YAML configuration and flat Vault-style JSON.
//! The core is the flatten/unflatten transformation between nested
//! documents and dotted keys such as `a.b[2].c`.

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod flatten;
pub mod formats;
pub mod keypath;
pub mod merge;
pub mod unflatten;

pub use error::{ConvertError, ConvertResult};
pub use flatten::{FlatMap, flatten};
pub use merge::merge_all;
pub use unflatten::unflatten;
