//! Command implementations

mod rules;
mod scan;

pub use rules::rules;
pub use scan::scan;
