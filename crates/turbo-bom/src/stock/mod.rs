//! Raw-material stock: movements, production consumption and the ledger.
//!
//! The resolvers never write stock. They hand a [`ConsumptionPlan`] to a
//! [`StockLedger`], which applies it transactionally.

mod ledger;
mod movement;
mod plan;

pub use ledger::{InMemoryStockLedger, StockLedger};
pub use movement::{MovementType, StockMovement, StockSubject};
pub use plan::ConsumptionPlan;
