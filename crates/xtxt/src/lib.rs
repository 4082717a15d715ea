//! Decode, inspect and build xtxt multiplexed text containers.
//!
//! # Crate Structure
//!
//! - [`source`]: Sequential buffer sources (files, readers, in-memory)
//! - [`demux`]: Marker decoder, stream demultiplexer, renderer and encoder

/// Re-export source types.
pub mod source {
    pub use xtxt_source::*;
}

/// Re-export demux types.
pub mod demux {
    pub use xtxt_demux::*;
}
