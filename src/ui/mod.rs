//! Console front end: a numbered menu loop with one handler per action.
//! Every handler is a hard error boundary. Whatever goes wrong inside it gets
//! printed with a per-action prefix and the loop carries on; the only fatal
//! failure in the program is the database bootstrap in `main`.

mod helpers;

use anyhow::Result;
use rusqlite::Connection;

use crate::db::{
    create_destination, create_flight, fetch_destinations, fetch_flights, fetch_flights_by_date,
    fetch_pilot_schedule, fetch_pilots, update_destination_status, update_flight_field,
    FlightField,
};
use helpers::{cell, prompt, prompt_i64, render_grid, render_simple, surface_error};

/// Drive the top-level menu until the operator picks Exit. The connection is
/// borrowed, not owned, so it closes when `main` drops it, on error paths
/// included.
pub fn run_app(conn: &mut Connection) -> Result<()> {
    loop {
        println!();
        println!("=== Flight Management System ===");
        println!("1. Add New Flight");
        println!("2. View Flights by Criteria");
        println!("3. Update Flight Information");
        println!("4. Assign Pilot to Flight");
        println!("5. View Pilot Schedule");
        println!("6. Manage Destinations");
        println!("7. Exit");
        println!();

        let choice = prompt("Select option (1-7)")?;
        match choice.as_str() {
            "1" => report("adding flight", add_flight(conn)),
            "2" => report("viewing flights", view_flights(conn)),
            "3" => report("updating flight", update_flight(conn)),
            "4" => report("assigning pilot", assign_pilot_to_flight(conn)),
            "5" => report("viewing schedule", view_pilot_schedule(conn)),
            "6" => report("managing destinations", manage_destinations(conn)),
            "7" => {
                println!("\nExiting system...");
                return Ok(());
            }
            _ => println!("\nInvalid option. Please try again."),
        }
    }
}

/// Print a handler failure without letting it escape the loop.
fn report(action: &str, result: Result<()>) {
    if let Err(err) = result {
        println!("\nError {action}: {}", surface_error(&err));
    }
}

fn add_flight(conn: &mut Connection) -> Result<()> {
    println!("\n=== Add New Flight ===");
    let code = prompt("Flight code (X####)")?;
    let departure = prompt("Departure (YYYYMMDD HHMM)")?;
    let arrival = prompt("Arrival (YYYYMMDD HHMM)")?;
    let city = prompt("Destination")?;
    let aircraft = prompt("Aircraft type")?;

    create_flight(conn, &code, &departure, &arrival, &city, &aircraft)?;
    println!("\nFlight added successfully");
    Ok(())
}

fn view_flights(conn: &Connection) -> Result<()> {
    println!("\n=== View Flights ===");
    println!("1. View all flights");
    println!("2. View by date");
    println!();

    let flights = match prompt("Select option (1-2)")?.as_str() {
        "1" => fetch_flights(conn)?,
        "2" => {
            let date = prompt("Enter date (YYYYMMDD)")?;
            fetch_flights_by_date(conn, &date)?
        }
        _ => {
            println!("Invalid option");
            return Ok(());
        }
    };

    if flights.is_empty() {
        println!("No flights found");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = flights
        .iter()
        .map(|flight| {
            vec![
                flight.id.to_string(),
                flight.code.clone(),
                flight.departure.clone(),
                flight.arrival.clone(),
                flight.aircraft_type.clone(),
                cell(&flight.pilot_id),
                cell(&flight.destination),
                flight.status.clone(),
            ]
        })
        .collect();
    print!(
        "{}",
        render_grid(
            &[
                "ID",
                "Code",
                "Departure",
                "Arrival",
                "Aircraft",
                "Pilot ID",
                "Destination",
                "Status",
            ],
            &rows,
        )
    );
    Ok(())
}

fn update_flight(conn: &Connection) -> Result<()> {
    println!("\n=== Update Flight ===");
    let code = prompt("Enter flight code to update (X####)")?;

    println!("\nWhat would you like to update?");
    println!("1. Departure time");
    println!("2. Arrival time");
    println!("3. Aircraft type");
    println!("4. Status");
    println!();

    // The field is chosen from this closed set; free text never reaches the
    // column position of the UPDATE statement.
    let (field, label) = match prompt("Select option (1-4)")?.as_str() {
        "1" => (FlightField::Departure, "New departure time (YYYYMMDD HHMM)"),
        "2" => (FlightField::Arrival, "New arrival time (YYYYMMDD HHMM)"),
        "3" => (FlightField::AircraftType, "New aircraft type"),
        "4" => (FlightField::Status, "New status"),
        _ => {
            println!("Invalid option");
            return Ok(());
        }
    };

    let value = prompt(label)?;
    update_flight_field(conn, &code, field, &value)?;
    println!("\nFlight updated successfully");
    Ok(())
}

fn assign_pilot_to_flight(conn: &Connection) -> Result<()> {
    println!("\n=== Assign Pilot to Flight ===");

    let pilots = fetch_pilots(conn)?;
    let rows: Vec<Vec<String>> = pilots
        .iter()
        .map(|pilot| vec![pilot.id.to_string(), pilot.name.clone()])
        .collect();
    println!("\nAvailable pilots:");
    print!("{}", render_simple(&["ID", "Name"], &rows));
    println!();

    let code = prompt("Enter flight code")?;
    let pilot_id = prompt_i64("Enter pilot ID")?;

    crate::db::assign_pilot(conn, &code, pilot_id)?;
    println!("\nPilot assigned successfully");
    Ok(())
}

fn view_pilot_schedule(conn: &Connection) -> Result<()> {
    println!("\n=== View Pilot Schedule ===");
    let pilot_id = prompt_i64("Enter pilot ID")?;

    let schedule = fetch_pilot_schedule(conn, pilot_id)?;
    if schedule.is_empty() {
        println!("No flights scheduled for this pilot");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = schedule
        .iter()
        .map(|entry| {
            vec![
                entry.code.clone(),
                entry.departure.clone(),
                entry.arrival.clone(),
                cell(&entry.destination),
                entry.status.clone(),
            ]
        })
        .collect();
    print!(
        "{}",
        render_grid(
            &["Flight", "Departure", "Arrival", "Destination", "Status"],
            &rows,
        )
    );
    Ok(())
}

fn manage_destinations(conn: &Connection) -> Result<()> {
    println!("\n=== Manage Destinations ===");
    println!("1. View all destinations");
    println!("2. Add new destination");
    println!("3. Update destination");
    println!();

    match prompt("Select option (1-3)")?.as_str() {
        "1" => {
            let destinations = fetch_destinations(conn)?;
            if destinations.is_empty() {
                println!("No destinations found");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = destinations
                .iter()
                .map(|dest| {
                    vec![
                        dest.id.to_string(),
                        cell(&dest.airport_code),
                        cell(&dest.city),
                        cell(&dest.country),
                        cell(&dest.gates),
                        cell(&dest.status),
                    ]
                })
                .collect();
            print!(
                "{}",
                render_grid(
                    &["ID", "Airport Code", "City", "Country", "Gates", "Status"],
                    &rows,
                )
            );
        }
        "2" => {
            let airport_code = prompt("Airport code")?;
            let city = prompt("City")?;
            let country = prompt("Country")?;
            let gates = prompt_i64("Number of gates")?;

            create_destination(conn, &airport_code, &city, &country, gates)?;
            println!("\nDestination added successfully");
        }
        "3" => {
            let airport_code = prompt("Enter airport code to update")?;
            let status = prompt("New status")?;

            update_destination_status(conn, &airport_code, &status)?;
            println!("\nDestination updated successfully");
        }
        _ => println!("Invalid option"),
    }
    Ok(())
}
