//! Dispatch scheduling engine.
//!
//! This crate provides:
//! - `Dispatch`: an immutable schedule entry combining a base schedule
//!   with an optional recurrence rule
//! - Point-in-time state queries: running state, current-run end,
//!   next occurrence — all pure functions of (dispatch, instant)
//! - `DispatchUpdate`: typed partial change set producing a new value
//! - `DispatchStore`: in-memory registry with list filtering and
//!   change-event broadcast
//!
//! Every query takes its reference instant explicitly; nothing in this
//! crate reads the wall clock.

pub mod dispatch;
pub mod error;
pub mod event;
pub mod filter;
pub mod store;
pub mod update;

pub use dispatch::{Dispatch, RunningState};
pub use error::{EngineError, Result};
pub use event::{DispatchEvent, EventKind};
pub use filter::{DispatchFilter, TimeInterval};
pub use store::{DispatchStore, NewDispatch};
pub use update::DispatchUpdate;
