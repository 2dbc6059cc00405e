use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".flight-roster-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "Flight_Management_Database.db";

/// Ensure the database file exists, apply the schema, and return a live
/// connection. Safe to call on every startup: the DDL is pure
/// `CREATE TABLE IF NOT EXISTS`, so a populated database passes through
/// untouched. Failure here is the only fatal error in the program.
pub fn ensure_schema() -> Result<Connection> {
    let db_path = db_path()?;

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(&db_path).context("failed to open SQLite database")?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Apply pragmas and DDL to an already open connection. Split out from
/// [`ensure_schema`] so tests can run the exact production schema against
/// in-memory or temp-file databases.
///
/// `PRAGMA foreign_keys = ON` makes SQLite enforce the declared references
/// from flights to pilots and destinations; referential integrity is
/// delegated entirely to the engine, with no application-side existence
/// checks before assignment.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS pilots (
            pilot_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            license_num TEXT UNIQUE,
            rating TEXT,
            hours_logged INTEGER
        )",
        [],
    )
    .context("failed to create pilots table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS destinations (
            dest_id INTEGER PRIMARY KEY,
            airport_code TEXT UNIQUE,
            city TEXT,
            country TEXT,
            gates INTEGER,
            status TEXT
        )",
        [],
    )
    .context("failed to create destinations table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS flights (
            flight_id INTEGER PRIMARY KEY,
            flight_code TEXT NOT NULL UNIQUE,
            departure TEXT,
            arrival TEXT,
            aircraft_type TEXT,
            pilot_id INTEGER,
            dest_id INTEGER,
            status TEXT,
            FOREIGN KEY (pilot_id) REFERENCES pilots(pilot_id),
            FOREIGN KEY (dest_id) REFERENCES destinations(dest_id)
        )",
        [],
    )
    .context("failed to create flights table")?;

    Ok(())
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
