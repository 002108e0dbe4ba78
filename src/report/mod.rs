/// Reporting routines. Each is a pure function of the cleaned table (or the
/// season view) that returns a chart description; none of them share state,
/// so they can be evaluated in any order.

pub mod correlation;
pub mod distribution;
pub mod segmentation;
pub mod stats;
pub mod trend;
