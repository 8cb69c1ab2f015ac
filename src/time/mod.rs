//! Time bound resolution: relative grammars, absolute formats and the
//! calendar helpers they share.

pub mod helpers;
pub mod relative;
pub mod resolver;
