use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::models::Pilot;

/// Retrieve the pilot roster (id and name), ordered by id. Shown before the
/// assignment prompt so the operator can pick a valid id; the menu never
/// creates pilots, that happens through external seeding.
pub fn fetch_pilots(conn: &Connection) -> Result<Vec<Pilot>> {
    let mut stmt = conn
        .prepare("SELECT pilot_id, name FROM pilots ORDER BY pilot_id")
        .context("failed to prepare pilot query")?;

    let pilots = stmt
        .query_map([], |row| {
            Ok(Pilot {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .context("failed to load pilots")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect pilots")?;

    Ok(pilots)
}
