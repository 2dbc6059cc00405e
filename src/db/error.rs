use thiserror::Error;

/// Domain-level database failures that the console layer reports with a
/// targeted message. Anything not covered here travels as a plain
/// `anyhow::Error` and gets surfaced with its underlying text.
#[derive(Debug, Error)]
pub enum DbError {
    /// Flight codes carry a UNIQUE constraint; a second insert with the same
    /// code is rejected wholesale.
    #[error("Flight code {0} already exists")]
    DuplicateFlightCode(String),
    /// Airport codes are unique across destinations when present.
    #[error("Airport code {0} already exists")]
    DuplicateAirportCode(String),
    /// An update or assignment matched zero flight rows. Detected from the
    /// affected-row count rather than a constraint error.
    #[error("Flight {0} not found")]
    FlightNotFound(String),
    /// A status update matched no destination with the given airport code.
    #[error("Destination {0} not found")]
    DestinationNotFound(String),
}
