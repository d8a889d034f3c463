//! Core types for modifier delivery tracking.
//!
//! This crate provides the vocabulary shared by the tracker and its runners:
//!
//! - [`Event`]: all inputs to the delivery runner, including fired timers
//! - [`Notification`]: outcomes the rest of the node has to act on
//! - [`ModifierStatus`]: the five delivery states of a modifier
//! - [`Scheduler`] / [`ModifierStore`]: the collaborators the tracker consumes
//!
//! # Architecture
//!
//! ```text
//! Network / application ──► Event ──► DeliveryRunner ──► DeliveryTracker
//!                                          ▲                   │
//!                                          │            Scheduler::schedule_once
//!                                          └── DeliveryCheck ◄─┘
//! ```
//!
//! The tracker is:
//! - **Synchronous**: No async, no .await
//! - **Single-threaded**: driven from one serialized event stream
//! - **I/O free**: timers go through the [`Scheduler`], store lookups through
//!   [`ModifierStore`]

mod event;
mod message;
mod request;
mod status;
mod traits;

pub use event::{DeliveryCheck, Event};
pub use message::Notification;
pub use request::{RequestId, RequestNonce};
pub use status::ModifierStatus;
pub use traits::{ModifierStore, Scheduler, SchedulerError};
