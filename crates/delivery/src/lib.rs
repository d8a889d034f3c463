//! Modifier delivery tracking.
//!
//! This crate records, for every modifier the node deals with, whether it has
//! been requested from a peer, received, rejected, or is already held by a
//! durable store, and enforces which of those moves are allowed.
//!
//! # Protocol Overview
//!
//! 1. **Request**: the node asks a peer for a batch of ids. Each id gets a
//!    request record and a delivery timer.
//!
//! 2. **Delivery check**: when a timer fires and the modifier has not
//!    arrived, the check count goes up and the request is re-armed, until
//!    `max_delivery_checks` is reached. Then the modifier reverts to
//!    `Unknown` and the caller is told to look elsewhere.
//!
//! 3. **Resolution**: the modifier is received, applied, rejected as
//!    invalid, or dropped. Each path cancels the timer it owned.
//!
//! # Architecture
//!
//! ```text
//!                   request()
//!        Unknown ─────────────────► Requested ──┐
//!           ▲                          │   ▲    │ DeliveryCheck
//!           │ stop_processing()        │   └────┘ (re-armed while
//!           │ / retries exhausted      │           checks < max)
//!           ├──────────────────────────┘
//!           │                          │ receive()
//!           │ stop_processing()        ▼
//!           └──────────────────────  Received
//!
//!   apply()   : any ──► (cleared; Held if a store has it)
//!   invalid() : any ──► Invalid (permanent)
//! ```
//!
//! # Components
//!
//! - [`DeliveryTracker`] - Owns the ledger and terminal sets
//! - [`RequestLedger`] - Outstanding requests, each owning its timer handle
//! - [`is_legal_transition`] - The status transition table
//! - [`DeliveryConfig`] - Timeout and retry limits

mod config;
mod error;
mod ledger;
mod tracker;
mod transition;

pub use config::DeliveryConfig;
pub use error::{ConfigError, DeliveryError};
pub use ledger::{RequestInfo, RequestLedger};
pub use tracker::{BatchOutcome, CheckOutcome, DeliveryInfo, DeliveryTracker};
pub use transition::{check_transition, is_legal_transition};
