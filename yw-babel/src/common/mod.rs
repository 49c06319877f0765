//! Format agnostic project logic: markup conversion, scene splitting and merging.

pub mod markup;
pub mod merge;
pub mod split;
