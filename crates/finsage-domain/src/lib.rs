//! FinSage domain layer — personas, prompt assembly, budget arithmetic.
//!
//! Pure, stateless building blocks with zero I/O: everything here is
//! recomputed per request and nothing is mutated after creation.

pub mod budget;
pub mod persona;
pub mod prompt;

pub use budget::{format_inr, BudgetSummary, DEFAULT_ESSENTIALS_SHARE, DEFAULT_SAVINGS_SHARE};
pub use persona::Persona;
pub use prompt::build_prompt;
