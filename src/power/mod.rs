//! Static power budget: bus loads, EOL degradation, margin, and surplus.

/// Regulated bus loads.
pub mod bus;
pub mod budget;
/// Closed-form charging relations.
pub mod charge;

pub use bus::BusLoad;
pub use budget::{BudgetInputs, PowerBudget};
