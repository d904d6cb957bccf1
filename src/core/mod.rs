pub mod config;
pub mod error;
pub mod events;
pub mod shared;
pub mod urls;
