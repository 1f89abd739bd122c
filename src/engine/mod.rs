// src/engine/mod.rs
//! Provider-independent core: parse, select, normalize, aggregate.
//! Nothing in here touches the network or the file system.

pub mod aggregate;
pub mod fixed_width;
pub mod normalize;
pub mod select;

pub use aggregate::{aggregate, Skip, SourceOutcome};
pub use fixed_width::FixedLayout;
pub use normalize::{NormalizedTable, Schema};
