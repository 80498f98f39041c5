//! Spirit Dice Engine library.
//!
//! This crate contains all server-side code for the Spirit Dice tracker.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration over the domain
//! - `infrastructure/` - Ports plus in-memory, filesystem and system adapters
//! - `api/` - HTTP and WebSocket entry points, roll broadcast relay
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
