//! Terminal output for plans, flights and planner events

use colored::Colorize;

use crate::domain::{DataOrigin, FlightOption, FlightQueryResult};
use crate::planner::PlannerEvent;

/// Format minutes as `4h 10m`
pub fn format_duration(minutes: u32) -> String {
    let (hours, mins) = (minutes / 60, minutes % 60);
    match (hours, mins) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

fn stops_label(option: &FlightOption) -> String {
    match option.stops() {
        0 => "Direct".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{} stops", n),
    }
}

fn price_label(price: Option<u32>) -> String {
    price.map(|p| format!("${}", p)).unwrap_or_else(|| "-".to_string())
}

/// One table row per option, without color
pub fn flight_row(option: &FlightOption) -> String {
    let departure = option.departure_airport();
    let arrival = option.arrival_airport();

    format!(
        "{:<16} {:<8} {:<9} {:>16} -> {:<16} {:>8} {:<7} {:>6}",
        option.airline().unwrap_or("-"),
        option.flight_number().unwrap_or("-"),
        option.travel_class().unwrap_or("-"),
        departure.map(|a| format!("{} {}", a.id, clock(&a.time))).unwrap_or_default(),
        arrival.map(|a| format!("{} {}", a.id, clock(&a.time))).unwrap_or_default(),
        format_duration(option.total_duration_minutes),
        stops_label(option),
        price_label(option.price),
    )
}

// Upstream times look like `2025-03-07 17:05`
fn clock(time: &str) -> &str {
    time.rsplit(' ').next().unwrap_or(time)
}

/// Layover lines shown under a multi-segment option
pub fn layover_lines(option: &FlightOption) -> Vec<String> {
    option
        .layovers
        .iter()
        .map(|layover| {
            format!(
                "    layover {} at {}{}",
                format_duration(layover.duration_minutes),
                layover.airport_name,
                if layover.overnight { " (overnight)" } else { "" }
            )
        })
        .collect()
}

pub fn print_flights(result: &FlightQueryResult) {
    println!();
    println!("{}", "Flights".bright_cyan().bold());
    if result.origin == DataOrigin::Synthetic {
        println!(
            "{}",
            "Demo data: no flight key configured (set one with `wf key set flights <KEY>`)".yellow()
        );
    }
    if result.is_empty() {
        println!("No flights found.");
        return;
    }

    println!(
        "{}",
        format!(
            "{:<16} {:<8} {:<9} {:>16}    {:<16} {:>8} {:<7} {:>6}",
            "Airline", "Flight", "Class", "Departure", "Arrival", "Duration", "Stops", "Price"
        )
        .dimmed()
    );
    for option in &result.options {
        println!("{}", flight_row(option));
        for line in layover_lines(option) {
            println!("{}", line.dimmed());
        }
    }
}

pub fn print_plan(plan: &str) {
    println!();
    println!("{}", plan);
}

/// Short status line for an event, or None for events that need no notice
pub fn toast(event: &PlannerEvent) -> Option<String> {
    match event {
        PlannerEvent::Submitted { .. } => Some("Generating your travel plan...".to_string()),
        PlannerEvent::PlanReady { .. } => Some("Travel plan generated successfully!".to_string()),
        PlannerEvent::PlanFailed { error, .. } => Some(error.to_string()),
        PlannerEvent::FlightsLoading { .. } => Some("Looking up flights...".to_string()),
        PlannerEvent::FlightsReady { count, origin, .. } => Some(match origin {
            DataOrigin::Live => format!("Found {} flight options", count),
            DataOrigin::Synthetic => format!("Showing {} demo flight options", count),
        }),
        PlannerEvent::FlightsFailed { error, .. } => Some(error.to_string()),
        PlannerEvent::ChatFailed { error } => Some(error.to_string()),
        PlannerEvent::Superseded { .. } | PlannerEvent::Settled { .. } | PlannerEvent::ChatAnswered { .. } => None,
    }
}

pub fn print_toast(event: &PlannerEvent) {
    let Some(text) = toast(event) else {
        return;
    };
    match event {
        PlannerEvent::PlanFailed { .. } | PlannerEvent::FlightsFailed { .. } | PlannerEvent::ChatFailed { .. } => {
            eprintln!("{} {}", "✗".red(), text.red())
        }
        PlannerEvent::PlanReady { .. } | PlannerEvent::FlightsReady { .. } => println!("{} {}", "✓".green(), text),
        _ => println!("{} {}", "…".dimmed(), text.dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FlightQuery;
    use crate::error::TripError;
    use crate::flights::synthetic_flights;
    use chrono::NaiveDate;

    fn options() -> Vec<FlightOption> {
        let query = FlightQuery::new("DEL", "HAN", NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
        synthetic_flights(&query).options
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(240), "4h");
        assert_eq!(format_duration(850), "14h 10m");
    }

    #[test]
    fn test_flight_row() {
        let options = options();
        let one_stop = flight_row(&options[0]);
        assert!(one_stop.contains("Thai AirAsia X"));
        assert!(one_stop.contains("DEL 17:05"));
        assert!(one_stop.contains("HAN 08:45"));
        assert!(one_stop.contains("1 stop"));
        assert!(one_stop.contains("$264"));

        let direct = flight_row(&options[1]);
        assert!(direct.contains("Direct"));
        assert!(direct.contains("4h"));
    }

    #[test]
    fn test_layover_lines() {
        let options = options();
        let lines = layover_lines(&options[0]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("8h 15m"));
        assert!(lines[0].contains("(overnight)"));
        assert!(layover_lines(&options[1]).is_empty());
    }

    #[test]
    fn test_toasts() {
        assert_eq!(
            toast(&PlannerEvent::PlanFailed {
                generation: 1,
                error: TripError::generation()
            })
            .as_deref(),
            Some("Failed to generate travel plan. Please try again.")
        );
        assert!(
            toast(&PlannerEvent::FlightsReady {
                generation: 1,
                count: 2,
                origin: DataOrigin::Synthetic
            })
            .unwrap()
            .contains("demo")
        );
        assert!(toast(&PlannerEvent::Settled { generation: 1 }).is_none());
    }
}
