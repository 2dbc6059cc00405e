//! Core library surface for the flight roster manager.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: the SQLite persistence layer, the row models it hydrates, and the
//! console menu loop.
pub mod db;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer, used by `main.rs` to
/// bring up the embedded SQLite store.
pub use db::{ensure_schema, init_schema, DbError};

/// Row types shared between the db and console layers.
pub use models::{Destination, FlightRecord, Pilot, ScheduleEntry};

/// The interactive menu loop.
pub use ui::run_app;
