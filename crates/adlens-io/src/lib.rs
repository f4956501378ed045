//! adlens-io: Dataset sources and load outcomes.
//!
//! Reads the full marketing dataset from a file or an in-memory JSON
//! document and reports the result as a [`LoadOutcome`], so the
//! rendering layer shows either the views or a single failure message.

pub mod outcome;
pub mod source;

pub use outcome::LoadOutcome;
pub use source::{DataSource, FetchError, FileSource, JsonSource, parse_json};
