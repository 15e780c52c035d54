//! CSV rendering for client exports.

/// Column headers of the client CSV export, in output order.
pub const CLIENT_EXPORT_HEADERS: &[&str] = &[
    "id",
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
    "dietary_restrictions",
    "accessibility_needs",
    "preferred_language",
    "status",
    "traveler_count",
    "created_at",
    "updated_at",
];

/// Separator for list-valued cells (dietary restrictions, accessibility needs).
pub const LIST_SEPARATOR: &str = "; ";

/// Escape a value for CSV output (RFC 4180).
pub fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Join a list-valued field into a single cell.
pub fn join_list(items: &[String]) -> String {
    items.join(LIST_SEPARATOR)
}

/// Render headers plus rows as CSV text. Every line ends with `\n`.
pub fn build_csv(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = headers
        .iter()
        .map(|h| csv_escape(h))
        .collect::<Vec<_>>()
        .join(",");
    out.push('\n');

    for row in rows {
        let line: Vec<String> = row.iter().map(|v| csv_escape(v)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}
