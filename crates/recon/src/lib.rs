//! `streetcheck-recon` — street and house number reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded street lists, returns classified
//! results. The TSV adapters in [`input`] read from any `io::Read`; opening
//! files or fetching data is up to the caller.

pub mod engine;
pub mod error;
pub mod finder;
pub mod input;
pub mod model;
pub mod streets;
pub mod summary;

pub use engine::{load_input, run};
pub use error::ReconError;
pub use finder::{find, FinderOptions};
pub use model::{FinderResult, ReconInput, ReconReport, StreetDiff, StreetEntry, StreetNumbers};
