//! Go/no-go decision for a home location

pub mod composer;
pub mod evaluator;

pub use composer::compose;
pub use evaluator::FlightSafetyEvaluator;
