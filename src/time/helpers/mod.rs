//! Calendar arithmetic shared by the relative grammars.

pub mod boundaries;
pub mod shift;
