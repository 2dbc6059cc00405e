//! Domain models that mirror the SQLite schema and get passed between the
//! persistence layer and the console views. The intent is that these types
//! stay light-weight data holders so other layers can focus on prompting and
//! rendering logic.

/// One row of the pilot roster as shown during pilot assignment. Only the
/// columns the assignment prompt needs are surfaced; license, rating, and
/// hours stay in the database until an operation asks for them.
#[derive(Debug, Clone)]
pub struct Pilot {
    /// Primary key from the database, the value the operator types back in
    /// when assigning the pilot to a flight.
    pub id: i64,
    pub name: String,
}

/// In-memory representation of a destination row. Everything except the id is
/// nullable in the schema: flights created against an unknown city leave a
/// city-only row behind, so display code must tolerate blanks.
#[derive(Debug, Clone)]
pub struct Destination {
    pub id: i64,
    pub airport_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub gates: Option<i64>,
    pub status: Option<String>,
}

/// A flight joined with its destination city, shaped for the listing views.
/// `pilot_id` and `destination` stay optional because a freshly added flight
/// has no pilot and an implicitly created destination may lack a city match.
#[derive(Debug, Clone)]
pub struct FlightRecord {
    pub id: i64,
    pub code: String,
    pub departure: String,
    pub arrival: String,
    pub aircraft_type: String,
    pub pilot_id: Option<i64>,
    pub destination: Option<String>,
    pub status: String,
}

/// One line of a pilot's schedule. Fetched already ordered by departure so
/// the view can print rows as they come.
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub code: String,
    pub departure: String,
    pub arrival: String,
    pub destination: Option<String>,
    pub status: String,
}
