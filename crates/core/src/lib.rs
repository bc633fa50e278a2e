//! `streetcheck-core` — house number ranges, normalization and street names.
//!
//! Pure value types shared by the config validator and the reconciliation
//! engine. No IO.

pub mod coverage;
pub mod housenumber;
pub mod ranges;
pub mod street;

pub use coverage::{Coverage, Locale};
pub use housenumber::{
    normalize, normalize_with_diagnostics, sort_numerically, split_house_number, DropReason,
    DroppedToken, HouseNumber,
};
pub use ranges::{Interpolation, Range, Ranges};
