mod expander;

pub use expander::{PathError, PathExpander};
