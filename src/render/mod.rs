//! Output rendering for parse results.
//!
//! # Example
//!
//! ```no_run
//! use manualdoc::{parse_file, render::*};
//!
//! let extract = parse_file("manual.docx")?;
//!
//! // Render to JSON
//! let json = to_json(&extract, JsonFormat::Pretty)?;
//!
//! // Render a plain text summary
//! let text = to_text(&extract);
//! # Ok::<(), manualdoc::Error>(())
//! ```

mod json;
mod text;

pub use json::{sections_from_json, to_json, to_json_default, JsonFormat};
pub use text::to_text;
