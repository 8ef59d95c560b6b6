//! Event RSVP backend for Cloudflare Workers.
//!
//! The store-facing core (normalization, the uniqueness ledger, submission, verification,
//! and the expiry sweep) is target-independent and tested natively against SQLite. The
//! Worker entrypoint in `worker_wasm` only exists on `wasm32`.

pub mod config;
pub mod error;
pub mod ledger;
pub mod libsql;
pub mod normalize;
pub mod notify;
pub mod submission;
pub mod stats;
pub mod sweep;
pub mod token;
pub mod util;
pub mod validation;
pub mod verification;

pub use config::EventConfig;
pub use error::RsvpError;
pub use submission::{submit_rsvp, NewRsvp};
pub use sweep::{sweep_expired, SweepReport};
pub use verification::redeem_token;

#[cfg(target_arch = "wasm32")]
mod worker_wasm;

#[cfg(target_arch = "wasm32")]
pub use worker_wasm::*;
