//! FinSage LLM - remote chat backend clients
//!
//! One interface over the two supported conversational services:
//!
//! - Granite: hosted language-model inference endpoint (single POST)
//! - Watson Assistant: dialogue-session service (create / message / teardown)
//!
//! ## Key Design Principles
//!
//! 1. Backends NEVER propagate failures: every error is absorbed at the
//!    client boundary and returned as a readable reply string.
//! 2. One attempt per call, bounded by a timeout — no retries, no backoff.
//! 3. Credentials live in explicit config structs filled from the process
//!    environment, not in ambient globals.

pub mod providers;
pub mod router;
pub mod types;

pub use providers::*;
pub use router::*;
pub use types::*;
