//! Extraction and write options.

use crate::catalog::{DEFAULT_GROUP_NAME, DEFAULT_INSTALL_STATUS};

/// Options for parsing a manual.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Rows scanned above a pieces header for the group title
    pub group_lookback_rows: usize,

    /// Rows scanned above a stacked (vertical) pieces header for the group title
    pub vertical_lookback_rows: usize,

    /// Longest text accepted as a group title
    pub max_group_title_len: usize,

    /// Group name when no title is found
    pub default_group_name: String,

    /// Status for installation-table pieces when the row says nothing
    pub default_install_status: String,

    /// Collect loose "Key: Value" pairs
    pub detect_key_values: bool,

    /// Keep raw paragraph and table text in the result
    pub include_raw: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            group_lookback_rows: 4,
            vertical_lookback_rows: 5,
            max_group_title_len: 40,
            default_group_name: DEFAULT_GROUP_NAME.to_string(),
            default_install_status: DEFAULT_INSTALL_STATUS.to_string(),
            detect_key_values: true,
            include_raw: true,
        }
    }
}

impl ExtractOptions {
    /// Create new extract options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many rows above a header may hold the group title.
    pub fn with_group_lookback(mut self, rows: usize) -> Self {
        self.group_lookback_rows = rows;
        self
    }

    /// Set the longest accepted group title.
    pub fn with_max_group_title_len(mut self, len: usize) -> Self {
        self.max_group_title_len = len;
        self
    }

    /// Set the fallback group name.
    pub fn with_default_group_name(mut self, name: impl Into<String>) -> Self {
        self.default_group_name = name.into();
        self
    }

    /// Set the fallback status for installation-table pieces.
    pub fn with_default_install_status(mut self, status: impl Into<String>) -> Self {
        self.default_install_status = status.into();
        self
    }

    /// Enable or disable loose key/value detection.
    pub fn with_key_values(mut self, detect: bool) -> Self {
        self.detect_key_values = detect;
        self
    }

    /// Keep or drop raw text.
    pub fn with_raw(mut self, include: bool) -> Self {
        self.include_raw = include;
        self
    }
}

/// Options for filling a template.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Text written into selected country cells
    pub country_marker: String,

    /// Leave a cell alone when it already reads as the target value
    pub skip_unchanged: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            country_marker: "X".to_string(),
            skip_unchanged: true,
        }
    }
}

impl WriteOptions {
    /// Create new write options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the country marker text.
    pub fn with_country_marker(mut self, marker: impl Into<String>) -> Self {
        self.country_marker = marker.into();
        self
    }

    /// Write every field even when the cell already holds the value.
    pub fn always_write(mut self) -> Self {
        self.skip_unchanged = false;
        self
    }
}
