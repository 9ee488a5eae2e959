//! Deterministic demo flights
//!
//! Served when no flight key is configured: one one-stop option via Bangkok
//! Don Mueang and one direct option, with the requested airports and date
//! substituted in.

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::domain::{
    AirportTime, CarbonEmissions, DataOrigin, FlightOption, FlightQuery, FlightQueryResult, FlightSegment, Layover,
};

const LAYOVER_ID: &str = "DMK";
const LAYOVER_NAME: &str = "Don Mueang International Airport";
const LOGO_BASE: &str = "https://www.gstatic.com/flights/airline_logos/70px";

fn airport_name(location: &str) -> String {
    format!("{} International Airport", location)
}

fn airport(id: &str, name: impl Into<String>, date: NaiveDate, time: &str) -> AirportTime {
    AirportTime {
        id: id.to_string(),
        name: name.into(),
        time: format!("{} {}", date.format("%Y-%m-%d"), time),
    }
}

fn logo(code: &str) -> Option<String> {
    Some(format!("{}/{}.png", LOGO_BASE, code))
}

fn one_stop(query: &FlightQuery) -> FlightOption {
    let date = query.outbound_date;
    let next_day = date.checked_add_days(Days::new(1)).unwrap_or(date);

    FlightOption {
        segments: vec![
            FlightSegment {
                departure_airport: airport(&query.departure_id, airport_name(&query.departure_id), date, "17:05"),
                arrival_airport: airport(LAYOVER_ID, LAYOVER_NAME, date, "22:45"),
                duration_minutes: 250,
                airplane: Some("Airbus A330".to_string()),
                airline: "Thai AirAsia X".to_string(),
                airline_logo: logo("XJ"),
                travel_class: "Economy".to_string(),
                flight_number: "XJ 231".to_string(),
                legroom: Some("31 in".to_string()),
                extensions: vec![
                    "Average legroom (31 in)".to_string(),
                    "In-seat power & USB outlets".to_string(),
                    "Carbon emissions estimate: 189 kg".to_string(),
                ],
                overnight: false,
            },
            FlightSegment {
                departure_airport: airport(LAYOVER_ID, LAYOVER_NAME, next_day, "07:00"),
                arrival_airport: airport(&query.arrival_id, airport_name(&query.arrival_id), next_day, "08:45"),
                duration_minutes: 105,
                airplane: Some("Airbus A320".to_string()),
                airline: "Thai AirAsia".to_string(),
                airline_logo: logo("FD"),
                travel_class: "Economy".to_string(),
                flight_number: "FD 642".to_string(),
                legroom: Some("28 in".to_string()),
                extensions: vec![
                    "Below average legroom (28 in)".to_string(),
                    "Carbon emissions estimate: 98 kg".to_string(),
                ],
                overnight: false,
            },
        ],
        layovers: vec![Layover {
            duration_minutes: 495,
            airport_name: LAYOVER_NAME.to_string(),
            id: Some(LAYOVER_ID.to_string()),
            overnight: true,
        }],
        total_duration_minutes: 850,
        carbon_emissions: Some(CarbonEmissions {
            this_flight: 287_000,
            typical_for_this_route: Some(224_000),
            difference_percent: Some(28),
        }),
        price: Some(264),
        trip_type: Some("One way".to_string()),
        airline_logo: logo("multi"),
        booking_token: None,
    }
}

fn direct(query: &FlightQuery) -> FlightOption {
    let date = query.outbound_date;

    FlightOption {
        segments: vec![FlightSegment {
            departure_airport: airport(&query.departure_id, airport_name(&query.departure_id), date, "00:05"),
            arrival_airport: airport(&query.arrival_id, airport_name(&query.arrival_id), date, "05:35"),
            duration_minutes: 240,
            airplane: Some("Airbus A330".to_string()),
            airline: "Vietjet".to_string(),
            airline_logo: logo("VJ"),
            travel_class: "Economy".to_string(),
            flight_number: "VJ 972".to_string(),
            legroom: Some("31 in".to_string()),
            extensions: vec![
                "Average legroom (31 in)".to_string(),
                "Carbon emissions estimate: 205 kg".to_string(),
            ],
            overnight: true,
        }],
        layovers: Vec::new(),
        total_duration_minutes: 240,
        carbon_emissions: Some(CarbonEmissions {
            this_flight: 205_000,
            typical_for_this_route: Some(224_000),
            difference_percent: Some(-8),
        }),
        price: Some(299),
        trip_type: Some("One way".to_string()),
        airline_logo: logo("VJ"),
        booking_token: None,
    }
}

/// Build the demo dataset for `query`
pub fn synthetic_flights(query: &FlightQuery) -> FlightQueryResult {
    debug!(departure = %query.departure_id, arrival = %query.arrival_id, date = %query.outbound_date, "synthetic_flights: called");
    FlightQueryResult {
        options: vec![one_stop(query), direct(query)],
        origin: DataOrigin::Synthetic,
    }
}
