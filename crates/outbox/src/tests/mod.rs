//! Integration tests for the outbox protocol.
//!
//! - `harness.rs`  - scripted mock transport and wiring helper
//! - `delivery.rs` - delivery lifecycle: success, failure, empty ticks,
//!   liveness, context capture
//! - `ordering.rs` - FIFO guarantees across retries

pub(crate) mod harness;
