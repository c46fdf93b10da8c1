//! Canonicalization applied after extraction.
//!
//! Text folding, the two-valued yes/no rule, country-code collapsing, piece
//! status classification, section cleanup and pieces-group merging.

pub mod country;
pub mod fields;
pub mod pieces;
pub mod status;
pub mod text;
pub mod yes_no;

pub use country::{apply_country_selection, collapse, to_country_codes, CountryCode};
pub use fields::{dedup_sections, normalize_sections};
pub use pieces::merge_groups;
pub use status::normalize_status;
pub use yes_no::{to_yes_no, YesNo};
