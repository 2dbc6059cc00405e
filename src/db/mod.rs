//! Persistence module split across logical submodules. Every function here
//! tries to encapsulate one query so the console layer can stay focused on
//! prompting and rendering.

mod connection;
mod destinations;
mod error;
mod flights;
mod pilots;

pub use connection::{ensure_schema, init_schema};
pub use destinations::{
    create_destination, fetch_destinations, find_or_create_destination, update_destination_status,
};
pub use error::DbError;
pub use flights::{
    assign_pilot, create_flight, fetch_flights, fetch_flights_by_date, fetch_pilot_schedule,
    update_flight_field, FlightField,
};
pub use pilots::fetch_pilots;
