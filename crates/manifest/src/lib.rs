//! Loader for seaport world descriptions.
//!
//! A world description is a line-oriented text file. Each non-blank line
//! declares one object; lines starting with `//` are comments:
//!
//! ```text
//! port   <name> <index>
//! dock   <name> <index> <port>
//! pship  <name> <index> <dock|port> <weight> <length> <width> <draft> <passengers> <rooms> <occupied>
//! cship  <name> <index> <dock|port> <weight> <length> <width> <draft> <cargoWeight> <cargoVolume> <cargoValue>
//! person <name> <index> <port> <skill>
//! job    <name> <index> <ship> <duration> [<skill> ...]
//! ```
//!
//! Objects must be declared before they are referenced. Loading never stops
//! at a bad line; see [`LoadReport`] for what gets reported.
//!
//! ## Architectural Layer
//!
//! **Adapter.** Turns text into calls on [`harbor::WorldBuilder`]; owns no
//! engine state of its own.

pub mod errors;
pub mod loader;
pub mod record;
pub mod report;

pub use errors::ManifestError;
pub use loader::{load_file, load_str, populate, Loaded};
pub use record::{parse_line, Record};
pub use report::{LoadReport, Notice, MALFORMED_NOTICE_LIMIT};
