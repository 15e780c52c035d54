//! Modification-log vocabulary.
//!
//! Log rows store these labels verbatim; the admin history view renders them
//! as-is.

/// Known action labels for modification log entries.
pub mod actions {
    pub const CREATED: &str = "Created";
    pub const STATUS_CHANGE: &str = "Status Change";
    pub const UPDATED: &str = "Updated";
    pub const PASSPORT_UPLOADED: &str = "Passport Uploaded";
    pub const TRAVELER_ADDED: &str = "Traveler Added";
}

/// Actor recorded for entries written by the service itself (form intake).
pub const SYSTEM_ACTOR: &str = "system";

/// Client columns whose edits are recorded individually as `Updated` rows.
///
/// `status` is tracked separately under [`actions::STATUS_CHANGE`].
pub const TRACKED_FIELDS: &[&str] = &[
    "full_name",
    "email",
    "phone",
    "number_of_travelers",
    "group_type",
    "occasion_description",
    "arrival_date",
    "departure_date",
    "flight_number",
    "arrival_time",
    "city_of_arrival",
    "preferred_language",
];

/// Render an optional value for the `old_value` / `new_value` columns.
pub fn display_value<T: ToString>(value: Option<&T>) -> Option<String> {
    value.map(ToString::to_string)
}

/// A single field-level difference between two versions of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Compare old and new renderings of a field; returns a change only when
/// they differ.
pub fn diff_field(
    field: &'static str,
    old_value: Option<String>,
    new_value: Option<String>,
) -> Option<FieldChange> {
    (old_value != new_value).then_some(FieldChange {
        field,
        old_value,
        new_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_field_yields_no_change() {
        assert_eq!(
            diff_field("phone", Some("1".into()), Some("1".into())),
            None
        );
    }

    #[test]
    fn cleared_field_is_a_change() {
        let change = diff_field("flight_number", Some("AT205".into()), None).unwrap();
        assert_eq!(change.field, "flight_number");
        assert_eq!(change.old_value.as_deref(), Some("AT205"));
        assert_eq!(change.new_value, None);
    }

    #[test]
    fn status_is_not_a_tracked_field() {
        assert!(!TRACKED_FIELDS.contains(&"status"));
    }

    #[test]
    fn display_value_renders_numbers() {
        assert_eq!(display_value(Some(&3_i64)), Some("3".to_string()));
        assert_eq!(display_value::<i64>(None), None);
    }
}
