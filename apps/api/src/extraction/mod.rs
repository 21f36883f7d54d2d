// Result extraction: free-text analysis reply -> typed record.
// Pure and synchronous; no I/O happens in this module.

pub mod parser;
pub mod record;
pub mod section;

pub use parser::parse;
pub use record::{ResultRecord, ScoreBand};
