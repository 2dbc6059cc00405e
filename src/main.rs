//! Binary entry point that glues the SQLite-backed roster to the console
//! menu. We bring up the database (the only fatal failure point), then drive
//! the menu loop until the operator exits. The connection is owned here, so
//! it is dropped and closed on every way out of `run_app`, error paths
//! included.
use flight_roster_manager::{ensure_schema, run_app};

fn main() -> anyhow::Result<()> {
    let mut conn = ensure_schema()?;
    run_app(&mut conn)
}
