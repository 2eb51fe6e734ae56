//! Built-in nodes, grouped by menu category.

pub mod convert;
pub mod draw;
pub mod input;
pub mod json;
pub mod output;
pub mod prep;
