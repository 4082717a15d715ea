//! Sequential byte sources for xtxt decoding.
//!
//! The decoder never reads files itself. It asks a [`ByteSource`] for the next
//! buffer until the source reports end of input:
//! - [`ReaderSource`] fills fixed-size buffers from any `Read` (files, stdin)
//! - [`SliceSource`] replays an in-memory input with arbitrary split sizes
//!
//! Buffer boundaries are observable in the decoded output (literal runs are
//! not reassembled across reads), so sources always deliver full buffers
//! except for the final one.

pub mod error;
pub mod reader;
pub mod slice;
pub mod traits;

pub use error::{Result, SourceError};
pub use reader::{ReaderSource, DEFAULT_BUFFER_SIZE};
pub use slice::SliceSource;
pub use traits::ByteSource;
