//! Shared primitive types used across the segmentation pipeline.

use std::collections::HashMap;

/// One input row: column name -> raw cell text.
pub type RawRow = HashMap<String, String>;

/// A stable identifier for a customer within one run.
pub type CustomerId = String;

/// An RFM score. Always within `[1, bins]`.
pub type Score = u8;

/// Bin counts accepted by the binning engine.
pub const MIN_BINS: u8 = 3;
pub const MAX_BINS: u8 = 7;
