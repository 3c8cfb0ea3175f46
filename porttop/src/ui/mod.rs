//! UI module root: exposes drawing functions for individual panels.

pub mod detail;
pub mod header;
pub mod ports;
pub mod prompt;
pub mod theme;
pub mod util;
