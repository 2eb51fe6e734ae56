//! Staged WebM export with a per-run diagnostic log.

pub mod log;
pub mod webm;
