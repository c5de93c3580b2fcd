//! Canonical schema model.
//!
//! These are the vendor-neutral value types every metadata source is reduced
//! to: portable [`DataType`]s, [`Column`]s, [`Index`]es and [`View`]s, plus
//! owned [`SchemaSnapshot`]s for output.

mod column;
mod index;
mod name;
mod snapshot;
mod types;
mod view;

pub use column::{Column, UNKNOWN_AUTONUMBER_START};
pub use index::Index;
pub use name::{name_key, names_match};
pub use snapshot::{SchemaSnapshot, TableSnapshot};
pub use types::DataType;
pub use view::{DatabaseView, DeclaredView, View};
