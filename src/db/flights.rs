use anyhow::{Context, Result};
use rusqlite::{params, Connection, Error as SqlError, ErrorCode};

use crate::db::destinations::find_or_create_destination;
use crate::db::error::DbError;
use crate::models::{FlightRecord, ScheduleEntry};

/// The closed set of flight columns the update menu may touch. Keeping this
/// an enum (rather than accepting a column name from input) is what keeps the
/// column position in the UPDATE statement out of reach of user text; the
/// new value itself is always bound as a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightField {
    Departure,
    Arrival,
    AircraftType,
    Status,
}

impl FlightField {
    fn column(self) -> &'static str {
        match self {
            FlightField::Departure => "departure",
            FlightField::Arrival => "arrival",
            FlightField::AircraftType => "aircraft_type",
            FlightField::Status => "status",
        }
    }
}

/// Create a flight, resolving its destination by city first. Both steps run
/// inside one transaction so a rejected flight insert (duplicate code, for
/// instance) rolls the implicit destination row back with it and leaves no
/// partial state behind. New flights start `Scheduled` with no pilot.
pub fn create_flight(
    conn: &mut Connection,
    code: &str,
    departure: &str,
    arrival: &str,
    city: &str,
    aircraft_type: &str,
) -> Result<i64> {
    let tx = conn.transaction().context("failed to begin transaction")?;

    let dest_id = find_or_create_destination(&tx, city)?;

    tx.execute(
        "INSERT INTO flights (flight_code, departure, arrival, aircraft_type, dest_id, status)
         VALUES (?1, ?2, ?3, ?4, ?5, 'Scheduled')",
        params![code, departure, arrival, aircraft_type, dest_id],
    )
    .map_err(|err| map_flight_code_conflict(err, code))
    .context("failed to insert flight")?;

    let id = tx.last_insert_rowid();
    tx.commit().context("failed to commit flight")?;
    Ok(id)
}

/// Retrieve every flight joined with its destination city, ordered by id so
/// listings are stable across runs.
pub fn fetch_flights(conn: &Connection) -> Result<Vec<FlightRecord>> {
    fetch_flight_records(conn, None)
}

/// Retrieve flights whose departure starts with the given date string. This
/// is a plain prefix match on the stored `YYYYMMDD HHMM` text, so an 8-digit
/// date selects every departure on that day.
pub fn fetch_flights_by_date(conn: &Connection, date: &str) -> Result<Vec<FlightRecord>> {
    fetch_flight_records(conn, Some(date))
}

fn fetch_flight_records(conn: &Connection, date: Option<&str>) -> Result<Vec<FlightRecord>> {
    let mut sql = String::from(
        "SELECT f.flight_id, f.flight_code, f.departure, f.arrival,
                f.aircraft_type, f.pilot_id, d.city, f.status
         FROM flights f
         LEFT JOIN destinations d ON f.dest_id = d.dest_id",
    );
    if date.is_some() {
        sql.push_str(" WHERE f.departure LIKE ?1");
    }
    sql.push_str(" ORDER BY f.flight_id");

    let mut stmt = conn
        .prepare(&sql)
        .context("failed to prepare flight query")?;

    let map_row = |row: &rusqlite::Row<'_>| {
        Ok(FlightRecord {
            id: row.get(0)?,
            code: row.get(1)?,
            departure: row.get(2)?,
            arrival: row.get(3)?,
            aircraft_type: row.get(4)?,
            pilot_id: row.get(5)?,
            destination: row.get(6)?,
            status: row.get(7)?,
        })
    };

    let rows = match date {
        Some(date) => stmt
            .query_map([format!("{date}%")], map_row)
            .context("failed to load flights")?
            .collect::<Result<Vec<_>, _>>(),
        None => stmt
            .query_map([], map_row)
            .context("failed to load flights")?
            .collect::<Result<Vec<_>, _>>(),
    }
    .context("failed to collect flights")?;

    Ok(rows)
}

/// Update exactly one field of the flight with the given code. The column
/// name comes from the [`FlightField`] whitelist; the value is stored as
/// given, with no format checking.
pub fn update_flight_field(
    conn: &Connection,
    code: &str,
    field: FlightField,
    value: &str,
) -> Result<()> {
    let sql = format!(
        "UPDATE flights SET {} = ?1 WHERE flight_code = ?2",
        field.column()
    );
    let updated = conn
        .execute(&sql, params![value, code])
        .context("failed to update flight")?;

    if updated == 0 {
        Err(DbError::FlightNotFound(code.to_string()).into())
    } else {
        Ok(())
    }
}

/// Point the named flight at a pilot. Whether the pilot actually exists is
/// left to the engine's foreign-key check; an unknown id fails here with a
/// constraint error rather than being screened up front.
pub fn assign_pilot(conn: &Connection, code: &str, pilot_id: i64) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE flights SET pilot_id = ?1 WHERE flight_code = ?2",
            params![pilot_id, code],
        )
        .context("failed to assign pilot")?;

    if updated == 0 {
        Err(DbError::FlightNotFound(code.to_string()).into())
    } else {
        Ok(())
    }
}

/// Get a pilot's flights joined with destination city, ordered by the
/// departure string ascending. The lexicographic order of `YYYYMMDD HHMM`
/// text matches chronological order.
pub fn fetch_pilot_schedule(conn: &Connection, pilot_id: i64) -> Result<Vec<ScheduleEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT f.flight_code, f.departure, f.arrival, d.city, f.status
             FROM flights f
             LEFT JOIN destinations d ON f.dest_id = d.dest_id
             WHERE f.pilot_id = ?1
             ORDER BY f.departure",
        )
        .context("failed to prepare schedule query")?;

    let schedule = stmt
        .query_map([pilot_id], |row| {
            Ok(ScheduleEntry {
                code: row.get(0)?,
                departure: row.get(1)?,
                arrival: row.get(2)?,
                destination: row.get(3)?,
                status: row.get(4)?,
            })
        })
        .context("failed to load schedule")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect schedule")?;

    Ok(schedule)
}

/// Coerce SQLite constraint errors on the flight insert into the typed
/// duplicate-flight-code error. `flight_code` is the only unique column the
/// insert can trip over.
fn map_flight_code_conflict(err: SqlError, code: &str) -> anyhow::Error {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        DbError::DuplicateFlightCode(code.to_string()).into()
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_destination, init_schema};

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory database");
        init_schema(&conn).expect("schema");
        conn
    }

    fn seed_pilot(conn: &Connection, id: i64, name: &str) {
        conn.execute(
            "INSERT INTO pilots (pilot_id, name) VALUES (?1, ?2)",
            params![id, name],
        )
        .expect("seed pilot");
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })
        .expect("count rows")
    }

    #[test]
    fn adding_flights_shares_one_destination_row_per_city() {
        let mut conn = test_conn();

        create_flight(
            &mut conn,
            "BA200",
            "20240101 0800",
            "20240101 1100",
            "Paris",
            "A320",
        )
        .expect("first flight");
        assert_eq!(count(&conn, "destinations"), 1);
        assert_eq!(count(&conn, "flights"), 1);

        create_flight(
            &mut conn,
            "BA201",
            "20240102 0800",
            "20240102 1100",
            "Paris",
            "A321",
        )
        .expect("second flight");
        assert_eq!(count(&conn, "destinations"), 1);
        assert_eq!(count(&conn, "flights"), 2);
    }

    #[test]
    fn duplicate_flight_code_leaves_a_single_row() {
        let mut conn = test_conn();
        create_flight(
            &mut conn,
            "AA101",
            "20240101 0800",
            "20240101 1100",
            "New York",
            "A320",
        )
        .expect("first flight");

        let err = create_flight(
            &mut conn,
            "AA101",
            "20240105 0900",
            "20240105 1200",
            "Boston",
            "B737",
        )
        .expect_err("duplicate code must fail");
        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::DuplicateFlightCode(code)) if code == "AA101"
        ));

        let matching: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM flights WHERE flight_code = 'AA101'",
                [],
                |row| row.get(0),
            )
            .expect("count AA101");
        assert_eq!(matching, 1);
        // The rolled-back transaction must not leave the implicitly created
        // Boston row behind either.
        assert_eq!(count(&conn, "destinations"), 1);
    }

    #[test]
    fn date_filter_is_a_prefix_match_on_departure() {
        let mut conn = test_conn();
        create_flight(
            &mut conn,
            "AA101",
            "20240101 0800",
            "20240101 1100",
            "Oslo",
            "A320",
        )
        .expect("flight one");
        create_flight(
            &mut conn,
            "AA102",
            "20240102 0930",
            "20240102 1230",
            "Oslo",
            "A320",
        )
        .expect("flight two");

        let all = fetch_flights(&conn).expect("fetch all");
        assert_eq!(all.len(), 2);
        assert!(all[0].id < all[1].id);

        let filtered = fetch_flights_by_date(&conn, "20240102").expect("fetch by date");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].code, "AA102");
        assert_eq!(filtered[0].destination.as_deref(), Some("Oslo"));
        assert_eq!(filtered[0].pilot_id, None);
    }

    #[test]
    fn updating_an_unknown_flight_changes_nothing() {
        let mut conn = test_conn();
        create_flight(
            &mut conn,
            "AA101",
            "20240101 0800",
            "20240101 1100",
            "Oslo",
            "A320",
        )
        .expect("flight");

        let err = update_flight_field(&conn, "ZZ999", FlightField::Status, "Delayed")
            .expect_err("unknown code must fail");
        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::FlightNotFound(code)) if code == "ZZ999"
        ));

        assert_eq!(count(&conn, "flights"), 1);
        let status: String = conn
            .query_row(
                "SELECT status FROM flights WHERE flight_code = 'AA101'",
                [],
                |row| row.get(0),
            )
            .expect("status");
        assert_eq!(status, "Scheduled");
    }

    #[test]
    fn each_field_choice_updates_its_own_column() {
        let mut conn = test_conn();
        create_flight(
            &mut conn,
            "AA101",
            "20240101 0800",
            "20240101 1100",
            "Oslo",
            "A320",
        )
        .expect("flight");

        update_flight_field(&conn, "AA101", FlightField::Departure, "20240103 0700")
            .expect("departure");
        update_flight_field(&conn, "AA101", FlightField::Status, "Delayed").expect("status");

        let (departure, arrival, status): (String, String, String) = conn
            .query_row(
                "SELECT departure, arrival, status FROM flights WHERE flight_code = 'AA101'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .expect("row");
        assert_eq!(departure, "20240103 0700");
        assert_eq!(arrival, "20240101 1100");
        assert_eq!(status, "Delayed");
    }

    #[test]
    fn assigning_a_pilot_touches_exactly_one_flight() {
        let mut conn = test_conn();
        seed_pilot(&conn, 1, "A. Earhart");
        create_flight(
            &mut conn,
            "AA101",
            "20240101 0800",
            "20240101 1100",
            "Oslo",
            "A320",
        )
        .expect("flight one");
        create_flight(
            &mut conn,
            "AA102",
            "20240102 0800",
            "20240102 1100",
            "Oslo",
            "A320",
        )
        .expect("flight two");

        assign_pilot(&conn, "AA101", 1).expect("assign");

        let assigned: Option<i64> = conn
            .query_row(
                "SELECT pilot_id FROM flights WHERE flight_code = 'AA101'",
                [],
                |row| row.get(0),
            )
            .expect("assigned row");
        assert_eq!(assigned, Some(1));
        let untouched: Option<i64> = conn
            .query_row(
                "SELECT pilot_id FROM flights WHERE flight_code = 'AA102'",
                [],
                |row| row.get(0),
            )
            .expect("other row");
        assert_eq!(untouched, None);

        let err = assign_pilot(&conn, "ZZ999", 1).expect_err("unknown flight must fail");
        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::FlightNotFound(_))
        ));
    }

    #[test]
    fn schedule_is_ordered_by_departure() {
        let mut conn = test_conn();
        seed_pilot(&conn, 7, "B. Coleman");
        for (code, dep) in [
            ("AA103", "20240105 0900"),
            ("AA101", "20240101 0800"),
            ("AA102", "20240103 1200"),
        ] {
            create_flight(&mut conn, code, dep, "20240105 2300", "Oslo", "A320").expect("flight");
            assign_pilot(&conn, code, 7).expect("assign");
        }

        let schedule = fetch_pilot_schedule(&conn, 7).expect("schedule");
        let departures: Vec<&str> = schedule.iter().map(|e| e.departure.as_str()).collect();
        assert_eq!(
            departures,
            vec!["20240101 0800", "20240103 1200", "20240105 0900"]
        );

        assert!(fetch_pilot_schedule(&conn, 99).expect("empty").is_empty());
    }

    #[test]
    fn explicit_destination_is_reused_by_a_later_flight() {
        let mut conn = test_conn();
        let dest = create_destination(&conn, "JFK", "New York", "USA", 10).expect("destination");

        create_flight(
            &mut conn,
            "AA101",
            "20240101 0800",
            "20240101 1100",
            "New York",
            "A320",
        )
        .expect("flight");

        assert_eq!(count(&conn, "destinations"), 1);
        let (dest_id, status, pilot_id): (i64, String, Option<i64>) = conn
            .query_row(
                "SELECT dest_id, status, pilot_id FROM flights WHERE flight_code = 'AA101'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .expect("flight row");
        assert_eq!(dest_id, dest.id);
        assert_eq!(status, "Scheduled");
        assert_eq!(pilot_id, None);
    }
}
