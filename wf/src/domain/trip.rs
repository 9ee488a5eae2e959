//! Trip request and validated trip

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised before any network call is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields ({0} is missing)")]
    MissingField(&'static str),

    #[error("Please enter a valid number for {0}")]
    InvalidNumber(&'static str),

    #[error("End date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("Question is empty")]
    EmptyQuestion,
}

/// Trip parameters as entered by the user
///
/// Every field may still be blank here; [`TripRequest::validate`] turns it
/// into a [`Trip`] or rejects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub source: String,
    pub destination: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Budget in USD, kept as entered
    pub budget: String,
    /// Number of travelers, kept as entered
    pub travelers: String,
    pub interests: String,
    pub include_flights: bool,
}

/// A trip request that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub source: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: String,
    pub travelers: String,
    pub interests: String,
    pub include_flights: bool,
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        debug!(%field, "required: field is empty");
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Budget is a non-negative decimal amount
fn check_budget(budget: &str) -> Result<(), ValidationError> {
    match budget.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(()),
        _ => {
            debug!(%budget, "check_budget: not a valid amount");
            Err(ValidationError::InvalidNumber("budget"))
        }
    }
}

/// Travelers is a whole number of at least one
fn check_travelers(travelers: &str) -> Result<(), ValidationError> {
    match travelers.parse::<u32>() {
        Ok(count) if count >= 1 => Ok(()),
        _ => {
            debug!(%travelers, "check_travelers: not a valid count");
            Err(ValidationError::InvalidNumber("travelers"))
        }
    }
}

impl TripRequest {
    /// Check that all seven fields are present, the numbers parse and the dates are ordered
    pub fn validate(&self) -> Result<Trip, ValidationError> {
        debug!(source = %self.source, destination = %self.destination, "TripRequest::validate: called");
        let source = required(&self.source, "source")?;
        let destination = required(&self.destination, "destination")?;
        let start_date = self.start_date.ok_or(ValidationError::MissingField("start date"))?;
        let end_date = self.end_date.ok_or(ValidationError::MissingField("end date"))?;
        let budget = required(&self.budget, "budget")?;
        let travelers = required(&self.travelers, "travelers")?;
        let interests = required(&self.interests, "interests")?;
        check_budget(&budget)?;
        check_travelers(&travelers)?;

        if end_date < start_date {
            debug!(%start_date, %end_date, "TripRequest::validate: dates out of order");
            return Err(ValidationError::EndBeforeStart {
                start: start_date,
                end: end_date,
            });
        }

        Ok(Trip {
            source,
            destination,
            start_date,
            end_date,
            budget,
            travelers,
            interests,
            include_flights: self.include_flights,
        })
    }
}

impl Trip {
    /// Trip length in whole days between the start and end dates
    pub fn trip_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn complete_request() -> TripRequest {
        TripRequest {
            source: "DEL".to_string(),
            destination: "HAN".to_string(),
            start_date: Some(date("2025-03-07")),
            end_date: Some(date("2025-03-10")),
            budget: "1500".to_string(),
            travelers: "2".to_string(),
            interests: "street food, history".to_string(),
            include_flights: true,
        }
    }

    #[test]
    fn test_validate_complete_request() {
        let trip = complete_request().validate().unwrap();
        assert_eq!(trip.source, "DEL");
        assert!(trip.include_flights);
    }

    #[test]
    fn test_trip_days() {
        let trip = complete_request().validate().unwrap();
        assert_eq!(trip.trip_days(), 3);
    }

    #[test]
    fn test_same_day_trip_is_zero_days() {
        let mut request = complete_request();
        request.end_date = request.start_date;
        assert_eq!(request.validate().unwrap().trip_days(), 0);
    }

    #[test]
    fn test_validate_trims_fields() {
        let mut request = complete_request();
        request.destination = "  Hanoi ".to_string();
        assert_eq!(request.validate().unwrap().destination, "Hanoi");
    }

    #[test]
    fn test_missing_dates() {
        let mut request = complete_request();
        request.start_date = None;
        assert_eq!(request.validate(), Err(ValidationError::MissingField("start date")));

        let mut request = complete_request();
        request.end_date = None;
        assert_eq!(request.validate(), Err(ValidationError::MissingField("end date")));
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut request = complete_request();
        request.end_date = Some(date("2025-03-01"));
        assert!(matches!(
            request.validate(),
            Err(ValidationError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn test_non_numeric_budget_and_travelers_rejected() {
        let mut request = complete_request();
        request.budget = "lots".to_string();
        assert_eq!(request.validate(), Err(ValidationError::InvalidNumber("budget")));

        let mut request = complete_request();
        request.travelers = "a couple".to_string();
        assert_eq!(request.validate(), Err(ValidationError::InvalidNumber("travelers")));
    }

    #[test]
    fn test_number_bounds() {
        let mut request = complete_request();
        request.budget = "-5".to_string();
        assert_eq!(request.validate(), Err(ValidationError::InvalidNumber("budget")));

        let mut request = complete_request();
        request.travelers = "0".to_string();
        assert_eq!(request.validate(), Err(ValidationError::InvalidNumber("travelers")));

        let mut request = complete_request();
        request.budget = "0".to_string();
        request.travelers = "1".to_string();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_decimal_budget_accepted() {
        let mut request = complete_request();
        request.budget = " 1250.50 ".to_string();
        assert_eq!(request.validate().unwrap().budget, "1250.50");
    }

    proptest! {
        #[test]
        fn prop_blank_field_fails_validation(field in 0usize..7, blank in "[ \t]{0,3}") {
            let mut request = complete_request();
            match field {
                0 => request.source = blank,
                1 => request.destination = blank,
                2 => request.start_date = None,
                3 => request.end_date = None,
                4 => request.budget = blank,
                5 => request.travelers = blank,
                _ => request.interests = blank,
            }
            prop_assert!(matches!(request.validate(), Err(ValidationError::MissingField(_))));
        }

        #[test]
        fn prop_numeric_fields_validated(
            budget in "[a-z ]{1,8}|-[1-9][0-9]{0,4}|[0-9]{1,6}(\\.[0-9]{1,2})?",
            travelers in "[a-z ]{1,8}|0|[1-9][0-9]{0,2}",
        ) {
            let mut request = complete_request();
            request.budget = budget.clone();
            request.travelers = travelers.clone();

            let budget_ok = budget.trim().parse::<f64>().is_ok_and(|b| b.is_finite() && b >= 0.0);
            let travelers_ok = travelers.trim().parse::<u32>().is_ok_and(|t| t >= 1);
            let result = request.validate();
            if budget.trim().is_empty() || travelers.trim().is_empty() {
                prop_assert!(matches!(result, Err(ValidationError::MissingField(_))));
            } else if !budget_ok {
                prop_assert_eq!(result, Err(ValidationError::InvalidNumber("budget")));
            } else if !travelers_ok {
                prop_assert_eq!(result, Err(ValidationError::InvalidNumber("travelers")));
            } else {
                prop_assert!(result.is_ok());
            }
        }

        #[test]
        fn prop_trip_days_matches_date_difference(offset in 0i64..400, length in 0i64..60) {
            let start = date("2025-01-01") + chrono::Duration::days(offset);
            let mut request = complete_request();
            request.start_date = Some(start);
            request.end_date = Some(start + chrono::Duration::days(length));
            prop_assert_eq!(request.validate().unwrap().trip_days(), length);
        }
    }
}
