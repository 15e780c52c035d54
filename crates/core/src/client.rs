//! Client-record vocabularies: workflow status, party composition,
//! traveler relationship, age bracket and arrival airport.
//!
//! Every vocabulary is stored as its display label in a `TEXT` column, so
//! `as_str` / `from_str` must round-trip exactly (case-sensitive).

macro_rules! define_label_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All valid labels, in declaration order.
            pub const ALL: &'static [&'static str] = &[$( $label ),+];

            /// Return the label as stored in the database.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// Parse a label. Returns `None` for unknown values.
            pub fn from_str(s: &str) -> Option<Self> {
                match s {
                    $( $label => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_label_enum! {
    /// Workflow state of a client inquiry. Every transition is allowed.
    ClientStatus {
        Pending => "Pending",
        Confirmed => "Confirmed",
        Cancelled => "Cancelled",
    }
}

impl Default for ClientStatus {
    fn default() -> Self {
        Self::Pending
    }
}

define_label_enum! {
    /// Composition of the travel party.
    GroupType {
        Individual => "Individual",
        Family => "Family",
        Couple => "Couple",
        Group => "Group",
        SpecialOccasion => "Special Occasion",
        Honeymooner => "Honeymooner",
        Other => "Other",
    }
}

impl GroupType {
    /// Whether the free-text occasion description applies to this group type.
    pub fn takes_occasion_description(&self) -> bool {
        matches!(self, Self::SpecialOccasion | Self::Other)
    }
}

define_label_enum! {
    /// How an additional traveler relates to the primary client.
    Relationship {
        Spouse => "Spouse",
        Child => "Child",
        Parent => "Parent",
        Sibling => "Sibling",
        Friend => "Friend",
        Colleague => "Colleague",
        Other => "Other",
    }
}

define_label_enum! {
    /// Coarse age bracket for additional travelers.
    AgeGroup {
        Child => "Child",
        Teen => "Teen",
        Adult => "Adult",
        Senior => "Senior",
    }
}

define_label_enum! {
    /// Moroccan arrival airports, by IATA code.
    ArrivalCity {
        Casablanca => "CMN",
        Marrakech => "RAK",
        Fes => "FEZ",
        Tangier => "TNG",
        Agadir => "AGA",
        Rabat => "RBA",
        Oujda => "OUD",
        Essaouira => "ESU",
        Nador => "NDR",
        Tetouan => "TTU",
    }
}

impl ArrivalCity {
    /// Human-readable city name for exports and dashboards.
    pub fn city_name(&self) -> &'static str {
        match self {
            Self::Casablanca => "Casablanca",
            Self::Marrakech => "Marrakech",
            Self::Fes => "Fes",
            Self::Tangier => "Tangier",
            Self::Agadir => "Agadir",
            Self::Rabat => "Rabat",
            Self::Oujda => "Oujda",
            Self::Essaouira => "Essaouira",
            Self::Nador => "Nador",
            Self::Tetouan => "Tetouan",
        }
    }
}

// ---------------------------------------------------------------------------
// Multi-select vocabularies
// ---------------------------------------------------------------------------

/// Dietary options offered by the intake form.
pub const DIETARY_OPTIONS: &[&str] = &[
    "Vegetarian",
    "Vegan",
    "Gluten-free",
    "Halal",
    "Kosher",
    "Dairy-free",
    "Nut-free",
    "Other",
];

/// Accessibility options offered by the intake form.
pub const ACCESSIBILITY_OPTIONS: &[&str] = &[
    "Wheelchair access",
    "Hearing assistance",
    "Visual assistance",
    "Mobility assistance",
    "None",
    "Other",
];

/// Languages the agency can guide in.
pub const LANGUAGES: &[&str] = &["English", "French", "Arabic", "Spanish"];

/// Validate an optional enumeration value, naming the field in the error.
pub fn validate_label(field: &str, value: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "Invalid {field} '{value}'. Must be one of: {}",
            allowed.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip() {
        for label in ClientStatus::ALL {
            let status = ClientStatus::from_str(label).expect("known label");
            assert_eq!(status.as_str(), *label);
        }
    }

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(ClientStatus::default(), ClientStatus::Pending);
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert_eq!(ClientStatus::from_str("pending"), None);
        assert_eq!(GroupType::from_str("special occasion"), None);
    }

    #[test]
    fn group_type_with_space_parses() {
        assert_eq!(
            GroupType::from_str("Special Occasion"),
            Some(GroupType::SpecialOccasion)
        );
        assert!(GroupType::SpecialOccasion.takes_occasion_description());
        assert!(!GroupType::Family.takes_occasion_description());
    }

    #[test]
    fn arrival_city_uses_iata_codes() {
        assert_eq!(ArrivalCity::from_str("RAK"), Some(ArrivalCity::Marrakech));
        assert_eq!(ArrivalCity::Marrakech.city_name(), "Marrakech");
        assert_eq!(ArrivalCity::from_str("JFK"), None);
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(Relationship::Colleague.to_string(), "Colleague");
        assert_eq!(AgeGroup::Senior.to_string(), "Senior");
    }

    #[test]
    fn validate_label_names_the_field() {
        assert!(validate_label("language", "French", LANGUAGES).is_ok());
        let err = validate_label("language", "Klingon", LANGUAGES).unwrap_err();
        assert!(err.contains("Invalid language 'Klingon'"));
    }
}
