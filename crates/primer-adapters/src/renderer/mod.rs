//! Template renderers.

mod marker;

pub use marker::{MarkerRenderer, Segment, resolve_blocks, segments, substitute};
