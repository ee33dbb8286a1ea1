//! Tree construction - the target-stack engine and attribute extraction.
//!
//! `Builder` accumulates an ordered JSON tree under a stack-of-frames
//! discipline; `read_fields` pulls named fields off arbitrary serde
//! sources for the extraction operations.

pub mod builder;
pub mod extract;

pub use builder::Builder;
pub use extract::read_fields;
