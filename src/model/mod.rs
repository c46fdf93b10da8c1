//! Data model for change manuals.
//!
//! [`Document`] is the read-only projection of the body part that the
//! extractors work on. [`Section`]/[`Field`] form the editable model and
//! [`PiezasGrupo`] the pieces inventory; [`ManualExtract`] aggregates one
//! parse.

mod document;
mod extract;
mod field;
mod paragraph;
mod pieces;
mod table;

pub use document::*;
pub use extract::*;
pub use field::*;
pub use paragraph::*;
pub use pieces::*;
pub use table::*;
