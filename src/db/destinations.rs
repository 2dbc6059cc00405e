use anyhow::{Context, Result};
use rusqlite::{params, Connection, Error as SqlError, ErrorCode, OptionalExtension};

use crate::db::error::DbError;
use crate::models::Destination;

/// Resolve a destination id by exact city string, inserting a city-only row
/// first when no match exists. The lookup runs before the insert because city
/// carries no unique constraint: a conflict-ignoring insert would silently
/// stack a duplicate row per flight. When several rows already share the same
/// city text, the lowest id wins so repeated adds resolve to the same row.
pub fn find_or_create_destination(conn: &Connection, city: &str) -> Result<i64> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT dest_id FROM destinations WHERE city = ?1 ORDER BY dest_id LIMIT 1",
            [city],
            |row| row.get(0),
        )
        .optional()
        .context("failed to look up destination by city")?;

    if let Some(id) = existing {
        return Ok(id);
    }

    conn.execute("INSERT INTO destinations (city) VALUES (?1)", [city])
        .context("failed to insert destination city")?;
    Ok(conn.last_insert_rowid())
}

/// Retrieve every destination ordered by id. The query doubles as the single
/// source of truth for the column order in the destination listing.
pub fn fetch_destinations(conn: &Connection) -> Result<Vec<Destination>> {
    let mut stmt = conn
        .prepare(
            "SELECT dest_id, airport_code, city, country, gates, status
             FROM destinations ORDER BY dest_id",
        )
        .context("failed to prepare destination query")?;

    let destinations = stmt
        .query_map([], |row| {
            Ok(Destination {
                id: row.get(0)?,
                airport_code: row.get(1)?,
                city: row.get(2)?,
                country: row.get(3)?,
                gates: row.get(4)?,
                status: row.get(5)?,
            })
        })
        .context("failed to load destinations")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect destinations")?;

    Ok(destinations)
}

/// Insert a fully specified destination, returning the hydrated struct so the
/// caller can echo it without re-querying. New destinations always start out
/// `Active`; status changes go through [`update_destination_status`].
pub fn create_destination(
    conn: &Connection,
    airport_code: &str,
    city: &str,
    country: &str,
    gates: i64,
) -> Result<Destination> {
    conn.execute(
        "INSERT INTO destinations (airport_code, city, country, gates, status)
         VALUES (?1, ?2, ?3, ?4, 'Active')",
        params![airport_code, city, country, gates],
    )
    .map_err(|err| map_airport_code_conflict(err, airport_code))
    .context("failed to insert destination")?;

    Ok(Destination {
        id: conn.last_insert_rowid(),
        airport_code: Some(airport_code.to_string()),
        city: Some(city.to_string()),
        country: Some(country.to_string()),
        gates: Some(gates),
        status: Some("Active".to_string()),
    })
}

/// Change the status of the destination with the given airport code. We
/// surface an explicit error when nothing was updated so the console can show
/// a not-found message instead of silently continuing.
pub fn update_destination_status(conn: &Connection, airport_code: &str, status: &str) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE destinations SET status = ?1 WHERE airport_code = ?2",
            params![status, airport_code],
        )
        .context("failed to update destination")?;

    if updated == 0 {
        Err(DbError::DestinationNotFound(airport_code.to_string()).into())
    } else {
        Ok(())
    }
}

/// Coerce SQLite constraint errors on the destinations table into the typed
/// duplicate-airport-code error. The only unique column reachable from the
/// insert above is `airport_code`.
fn map_airport_code_conflict(err: SqlError, airport_code: &str) -> anyhow::Error {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        DbError::DuplicateAirportCode(airport_code.to_string()).into()
    } else {
        err.into()
    }
}
