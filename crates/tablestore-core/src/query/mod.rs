/// Query evaluation module
///
/// Compiles restricted WHERE clauses and evaluates them against records.
/// WHERE condition compiler and evaluator
#[allow(missing_docs)]
pub mod condition;

// Re-export main types
pub use condition::{Comparison, ComparisonOp, Condition, Predicate};
