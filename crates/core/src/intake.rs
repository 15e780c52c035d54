//! Public intake form payload and its validation.
//!
//! Validation never stops at the first problem: every rule is checked and
//! all violations are returned together so the form can highlight each one.
//! A successful validation yields a [`NormalizedIntake`] with trimmed text,
//! parsed dates, expanded "Other" entries and numbered travelers, ready to
//! be persisted.

use std::num::ParseIntError;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::client::{self, AgeGroup, ArrivalCity, GroupType, Relationship};
use crate::types::Date;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Upper bound on the declared party size.
pub const MAX_TRAVELERS: i64 = 50;

/// Maximum length of a person's name in characters.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a free-text field in characters.
pub const MAX_FREE_TEXT_LENGTH: usize = 5_000;

/// Oldest accepted traveler age.
pub const MAX_AGE: i64 = 120;

/// The first additional traveler is number 2; the primary client is number 1.
pub const FIRST_TRAVELER_NUMBER: i64 = 2;

/// Multi-select entry that unlocks a companion free-text field.
pub const OTHER_OPTION: &str = "Other";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Wire payload
// ---------------------------------------------------------------------------

/// An integer field the browser may send either as a JSON number or as the
/// raw text of an `<input>`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlexibleInt {
    Number(i64),
    Text(String),
}

impl FlexibleInt {
    /// Interpret the value. Blank text is `Ok(None)`; non-numeric text is an error.
    pub fn parse(&self) -> Result<Option<i64>, ParseIntError> {
        match self {
            Self::Number(n) => Ok(Some(*n)),
            Self::Text(s) if s.trim().is_empty() => Ok(None),
            Self::Text(s) => s.trim().parse::<i64>().map(Some),
        }
    }
}

/// Body of `POST /submit-form` as sent by the intake form.
///
/// Every field tolerates absence and `null`; required-ness is enforced by
/// [`validate_submission`], not by deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IntakeForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<FlexibleInt>,
    pub number_of_travelers: Option<FlexibleInt>,
    pub group_type: Option<String>,
    pub occasion_description: Option<String>,
    pub arrival_date: Option<String>,
    pub departure_date: Option<String>,
    pub flight_number: Option<String>,
    pub arrival_time: Option<String>,
    pub city_of_arrival: Option<String>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub dietary_restrictions_other: Option<String>,
    pub accessibility_needs: Option<Vec<String>>,
    pub accessibility_needs_other: Option<String>,
    pub preferred_language: Option<String>,
    pub custom_activities: Option<String>,
    pub food_preferences: Option<String>,
    pub additional_inquiries: Option<String>,
    pub gdpr_consent: Option<bool>,
    pub additional_travelers: Option<Vec<TravelerForm>>,
}

/// One additional traveler inside [`IntakeForm`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TravelerForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<FlexibleInt>,
    pub age_group: Option<String>,
    pub relationship: Option<String>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub dietary_restrictions_other: Option<String>,
    pub special_notes: Option<String>,
    pub has_different_travel: Option<bool>,
    pub arrival_date: Option<String>,
    pub departure_date: Option<String>,
    pub flight_number: Option<String>,
    pub arrival_time: Option<String>,
    pub city_of_arrival: Option<String>,
}

// ---------------------------------------------------------------------------
// Normalized output
// ---------------------------------------------------------------------------

/// Client fields after validation, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub age: Option<i64>,
    pub number_of_travelers: i64,
    pub group_type: Option<String>,
    pub occasion_description: Option<String>,
    pub arrival_date: Option<Date>,
    pub departure_date: Option<Date>,
    pub flight_number: Option<String>,
    pub arrival_time: Option<String>,
    pub city_of_arrival: Option<String>,
    pub dietary_restrictions: Vec<String>,
    pub accessibility_needs: Vec<String>,
    pub preferred_language: Option<String>,
    pub custom_activities: Option<String>,
    pub food_preferences: Option<String>,
    pub additional_inquiries: Option<String>,
    pub gdpr_consent: bool,
}

/// Additional traveler after validation, with its position in the party.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelerDraft {
    pub traveler_number: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub age_group: Option<String>,
    pub relationship: Option<String>,
    pub dietary_restrictions: Vec<String>,
    pub special_notes: Option<String>,
    pub has_different_travel: bool,
    pub arrival_date: Option<Date>,
    pub departure_date: Option<Date>,
    pub flight_number: Option<String>,
    pub arrival_time: Option<String>,
    pub city_of_arrival: Option<String>,
}

/// A fully validated submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedIntake {
    pub client: ClientDraft,
    pub travelers: Vec<TravelerDraft>,
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Trim a text field; blank becomes `None`.
pub fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Check the `local@domain.tld` shape of an email address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Parse a calendar date in `YYYY-MM-DD` form.
///
/// An ISO-8601 timestamp (`2025-12-21T10:00:00Z`) is accepted and truncated
/// to its date part.
pub fn parse_date(value: &str) -> Option<Date> {
    let value = value.trim();
    if let Ok(date) = Date::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    match value.split_once('T') {
        Some((date, _)) => Date::parse_from_str(date, "%Y-%m-%d").ok(),
        None => None,
    }
}

/// Both dates present means arrival must be strictly before departure.
pub fn check_date_order(arrival: Option<Date>, departure: Option<Date>) -> Result<(), String> {
    match (arrival, departure) {
        (Some(a), Some(d)) if a >= d => {
            Err("Departure date must be after arrival date".to_string())
        }
        _ => Ok(()),
    }
}

/// Replace the literal `"Other"` entry with `"Other: <text>"`.
///
/// Blank entries are dropped. Without companion text the literal `"Other"`
/// is kept. Entries that are already expanded are left alone, so applying
/// this twice is a no-op.
pub fn expand_other(items: &[String], other_text: Option<&str>) -> Vec<String> {
    let other_text = clean(other_text);
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| match (&other_text, item == OTHER_OPTION) {
            (Some(text), true) => format!("{OTHER_OPTION}: {text}"),
            _ => item.to_string(),
        })
        .collect()
}

fn parse_optional_date(
    label: &str,
    value: Option<&str>,
    errors: &mut Vec<String>,
) -> Option<Date> {
    let raw = clean(value)?;
    let parsed = parse_date(&raw);
    if parsed.is_none() {
        errors.push(format!("{label} must be a valid date (YYYY-MM-DD)"));
    }
    parsed
}

fn check_label(
    field: &str,
    value: Option<String>,
    allowed: &[&str],
    errors: &mut Vec<String>,
) -> Option<String> {
    let value = value?;
    if let Err(msg) = client::validate_label(field, &value, allowed) {
        errors.push(msg);
    }
    Some(value)
}

/// `check_label` for a traveler field; the message names the traveler.
fn check_traveler_label(
    prefix: &str,
    field: &str,
    value: Option<String>,
    allowed: &[&str],
    errors: &mut Vec<String>,
) -> Option<String> {
    let value = value?;
    if let Err(msg) = client::validate_label(field, &value, allowed) {
        errors.push(format!("{prefix}: {msg}"));
    }
    Some(value)
}

fn check_length(label: &str, value: &Option<String>, max: usize, errors: &mut Vec<String>) {
    if let Some(v) = value {
        if v.chars().count() > max {
            errors.push(format!("{label} exceeds maximum length of {max} characters"));
        }
    }
}

fn parse_age(label: &str, value: Option<&FlexibleInt>, errors: &mut Vec<String>) -> Option<i64> {
    match value.map(FlexibleInt::parse) {
        None | Some(Ok(None)) => None,
        Some(Ok(Some(age))) if (0..=MAX_AGE).contains(&age) => Some(age),
        Some(Ok(Some(_))) => {
            errors.push(format!("{label} must be between 0 and {MAX_AGE}"));
            None
        }
        Some(Err(_)) => {
            errors.push(format!("{label} must be a whole number"));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a whole submission, collecting every violation.
pub fn validate_submission(form: &IntakeForm) -> Result<NormalizedIntake, Vec<String>> {
    let mut errors = Vec::new();

    let full_name = clean(form.full_name.as_deref());
    if full_name.is_none() {
        errors.push("Full name is required".to_string());
    }
    check_length("Full name", &full_name, MAX_NAME_LENGTH, &mut errors);

    let email = clean(form.email.as_deref());
    match &email {
        None => errors.push("Email is required".to_string()),
        Some(e) if !is_valid_email(e) => errors.push("Email address is invalid".to_string()),
        Some(_) => {}
    }

    let phone = clean(form.phone.as_deref());
    if phone.is_none() {
        errors.push("Phone number is required".to_string());
    }

    let gdpr_consent = form.gdpr_consent.unwrap_or(false);
    if !gdpr_consent {
        errors.push("GDPR consent is required".to_string());
    }

    let age = parse_age("Age", form.age.as_ref(), &mut errors);

    let number_of_travelers = match form.number_of_travelers.as_ref().map(FlexibleInt::parse) {
        None | Some(Ok(None)) => Some(1),
        Some(Ok(Some(n))) if (1..=MAX_TRAVELERS).contains(&n) => Some(n),
        Some(Ok(Some(_))) => {
            errors.push(format!(
                "Number of travelers must be between 1 and {MAX_TRAVELERS}"
            ));
            None
        }
        Some(Err(_)) => {
            errors.push("Number of travelers must be a whole number".to_string());
            None
        }
    };

    let group_type = check_label(
        "group type",
        clean(form.group_type.as_deref()),
        GroupType::ALL,
        &mut errors,
    );
    let occasion_description = clean(form.occasion_description.as_deref());
    check_length(
        "Occasion description",
        &occasion_description,
        MAX_FREE_TEXT_LENGTH,
        &mut errors,
    );

    let arrival_date = parse_optional_date("Arrival date", form.arrival_date.as_deref(), &mut errors);
    let departure_date =
        parse_optional_date("Departure date", form.departure_date.as_deref(), &mut errors);
    if let Err(msg) = check_date_order(arrival_date, departure_date) {
        errors.push(msg);
    }

    let city_of_arrival = check_label(
        "city of arrival",
        clean(form.city_of_arrival.as_deref()),
        ArrivalCity::ALL,
        &mut errors,
    );
    let preferred_language = check_label(
        "preferred language",
        clean(form.preferred_language.as_deref()),
        client::LANGUAGES,
        &mut errors,
    );

    let custom_activities = clean(form.custom_activities.as_deref());
    let food_preferences = clean(form.food_preferences.as_deref());
    let additional_inquiries = clean(form.additional_inquiries.as_deref());
    check_length("Custom activities", &custom_activities, MAX_FREE_TEXT_LENGTH, &mut errors);
    check_length("Food preferences", &food_preferences, MAX_FREE_TEXT_LENGTH, &mut errors);
    check_length(
        "Additional inquiries",
        &additional_inquiries,
        MAX_FREE_TEXT_LENGTH,
        &mut errors,
    );

    // -- Additional travelers ------------------------------------------------

    let submitted = form.additional_travelers.as_deref().unwrap_or_default();
    let mut travelers = Vec::with_capacity(submitted.len());

    if let Some(n) = number_of_travelers {
        let expected = (n - 1).max(0) as usize;
        if submitted.len() > expected {
            errors.push(format!(
                "Expected {expected} additional travelers but received {}",
                submitted.len()
            ));
        }
        for k in 0..expected {
            let number = FIRST_TRAVELER_NUMBER + k as i64;
            match submitted.get(k) {
                Some(t) => {
                    if let Some(draft) = validate_traveler_into(number, t, &mut errors) {
                        travelers.push(draft);
                    }
                }
                None => errors.push(format!("Traveler {number}: name is required")),
            }
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // Every `None` above pushed an error, so these are all present here.
    let (Some(full_name), Some(email), Some(phone), Some(number_of_travelers)) =
        (full_name, email, phone, number_of_travelers)
    else {
        return Err(vec!["Submission is incomplete".to_string()]);
    };

    let client = ClientDraft {
        full_name,
        email,
        phone,
        age,
        number_of_travelers,
        group_type,
        occasion_description,
        arrival_date,
        departure_date,
        flight_number: clean(form.flight_number.as_deref()),
        arrival_time: clean(form.arrival_time.as_deref()),
        city_of_arrival,
        dietary_restrictions: expand_other(
            form.dietary_restrictions.as_deref().unwrap_or_default(),
            form.dietary_restrictions_other.as_deref(),
        ),
        accessibility_needs: expand_other(
            form.accessibility_needs.as_deref().unwrap_or_default(),
            form.accessibility_needs_other.as_deref(),
        ),
        preferred_language,
        custom_activities,
        food_preferences,
        additional_inquiries,
        gdpr_consent,
    };

    Ok(NormalizedIntake { client, travelers })
}

/// Validate a single traveler that will be stored as `traveler_number`.
pub fn validate_traveler(
    traveler_number: i64,
    form: &TravelerForm,
) -> Result<TravelerDraft, Vec<String>> {
    let mut errors = Vec::new();
    match validate_traveler_into(traveler_number, form, &mut errors) {
        Some(draft) if errors.is_empty() => Ok(draft),
        _ => Err(errors),
    }
}

fn validate_traveler_into(
    number: i64,
    form: &TravelerForm,
    errors: &mut Vec<String>,
) -> Option<TravelerDraft> {
    let before = errors.len();
    let prefix = format!("Traveler {number}");

    let name = clean(form.name.as_deref());
    if name.is_none() {
        errors.push(format!("{prefix}: name is required"));
    }
    check_length(&format!("{prefix}: name"), &name, MAX_NAME_LENGTH, errors);

    let email = clean(form.email.as_deref());
    if let Some(e) = &email {
        if !is_valid_email(e) {
            errors.push(format!("{prefix}: email address is invalid"));
        }
    }

    let age = parse_age(&format!("{prefix}: age"), form.age.as_ref(), errors);
    let age_group = check_traveler_label(
        &prefix,
        "age group",
        clean(form.age_group.as_deref()),
        AgeGroup::ALL,
        errors,
    );
    let relationship = check_traveler_label(
        &prefix,
        "relationship",
        clean(form.relationship.as_deref()),
        Relationship::ALL,
        errors,
    );
    let special_notes = clean(form.special_notes.as_deref());
    check_length(
        &format!("{prefix}: special notes"),
        &special_notes,
        MAX_FREE_TEXT_LENGTH,
        errors,
    );

    // Itinerary fields only count when the traveler travels separately.
    let has_different_travel = form.has_different_travel.unwrap_or(false);
    let (arrival_date, departure_date, flight_number, arrival_time, city_of_arrival) =
        if has_different_travel {
            let arrival = parse_optional_date(
                &format!("{prefix}: arrival date"),
                form.arrival_date.as_deref(),
                errors,
            );
            let departure = parse_optional_date(
                &format!("{prefix}: departure date"),
                form.departure_date.as_deref(),
                errors,
            );
            if check_date_order(arrival, departure).is_err() {
                errors.push(format!(
                    "{prefix}: departure date must be after arrival date"
                ));
            }
            let city = check_traveler_label(
                &prefix,
                "city of arrival",
                clean(form.city_of_arrival.as_deref()),
                ArrivalCity::ALL,
                errors,
            );
            (
                arrival,
                departure,
                clean(form.flight_number.as_deref()),
                clean(form.arrival_time.as_deref()),
                city,
            )
        } else {
            (None, None, None, None, None)
        };

    if errors.len() > before {
        return None;
    }

    Some(TravelerDraft {
        traveler_number: number,
        name: name?,
        email,
        phone: clean(form.phone.as_deref()),
        age,
        age_group,
        relationship,
        dietary_restrictions: expand_other(
            form.dietary_restrictions.as_deref().unwrap_or_default(),
            form.dietary_restrictions_other.as_deref(),
        ),
        special_notes,
        has_different_travel,
        arrival_date,
        departure_date,
        flight_number,
        arrival_time,
        city_of_arrival,
    })
}
