//! Staff dashboard backend for a holiday camp: roster, shifts, tasks,
//! incidents, messages and the unified calendar built from all of them.

pub mod api_router;
pub mod calendar;
pub mod core;
pub mod facility;
pub mod incidents;
pub mod messages;
pub mod people;
pub mod schedule;
pub mod settings;
pub mod storage;
pub mod tasks;

pub use crate::core::error::{ColonyError, ColonyResult};
pub use crate::core::shared::state::AppState;
