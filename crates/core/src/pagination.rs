//! Page-based listing helpers for the admin client list.
//!
//! Pages are 1-indexed. Out-of-range inputs are clamped rather than
//! rejected so a stale bookmark still lands somewhere sensible.

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default number of clients per page.
pub const DEFAULT_PER_PAGE: i64 = 50;

/// Maximum number of clients per page.
pub const MAX_PER_PAGE: i64 = 200;

/// Highest page number accepted. Any page past it is empty anyway, and the
/// bound keeps `offset` inside `i64` for every allowed page size.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PER_PAGE;

/// Escape character used in generated `LIKE` patterns.
pub const LIKE_ESCAPE: char = '\\';

/// Separator between fields in a stored search key.
const SEARCH_FIELD_SEPARATOR: char = '\n';

// ---------------------------------------------------------------------------
// Clamping
// ---------------------------------------------------------------------------

/// Clamp a user-provided page number to `1..=MAX_PAGE`.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).clamp(1, MAX_PAGE)
}

/// Clamp a user-provided page size to `1..=MAX_PER_PAGE`.
pub fn clamp_per_page(per_page: Option<i64>) -> i64 {
    per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
}

/// Row offset of the first item on `page`.
pub fn offset(page: i64, per_page: i64) -> i64 {
    page.saturating_sub(1).max(0).saturating_mul(per_page)
}

/// Number of pages needed for `total` items. Zero items is zero pages.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 0;
    }
    (total + per_page - 1) / per_page
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Lowercased key the client search runs against.
///
/// Folding happens here rather than in SQL because SQLite's `lower()` only
/// folds ASCII; `search_pattern` folds the same way.
pub fn search_key(full_name: &str, email: &str, phone: &str) -> String {
    [full_name, email, phone]
        .iter()
        .map(|field| field.to_lowercase())
        .collect::<Vec<_>>()
        .join(&SEARCH_FIELD_SEPARATOR.to_string())
}

/// Build a case-insensitive substring `LIKE` pattern from free text.
///
/// `%`, `_` and the escape character itself are escaped so they match
/// literally; the query must use `ESCAPE '\'`. Returns `None` for blank input.
pub fn search_pattern(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if c == SEARCH_FIELD_SEPARATOR {
            continue;
        }
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_and_floors_at_one() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(-3)), 1);
        assert_eq!(clamp_page(Some(4)), 4);
    }

    #[test]
    fn huge_page_is_capped_and_offset_stays_in_range() {
        let page = clamp_page(Some(i64::MAX));
        assert_eq!(page, MAX_PAGE);
        assert!(offset(page, MAX_PER_PAGE) > 0);
        assert_eq!(offset(i64::MAX, 50), i64::MAX);
        assert_eq!(offset(i64::MIN, 50), 0);
    }

    #[test]
    fn per_page_uses_default_and_respects_bounds() {
        assert_eq!(clamp_per_page(None), 50);
        assert_eq!(clamp_per_page(Some(0)), 1);
        assert_eq!(clamp_per_page(Some(1000)), MAX_PER_PAGE);
    }

    #[test]
    fn offset_of_third_page() {
        assert_eq!(offset(3, 50), 100);
        assert_eq!(offset(1, 50), 0);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(120, 50), 3);
        assert_eq!(total_pages(100, 50), 2);
        assert_eq!(total_pages(1, 50), 1);
        assert_eq!(total_pages(0, 50), 0);
    }

    #[test]
    fn search_pattern_lowercases_and_wraps() {
        assert_eq!(search_pattern(" Amina "), Some("%amina%".to_string()));
        assert_eq!(search_pattern("   "), None);
    }

    #[test]
    fn accented_terms_fold_like_the_stored_key() {
        let key = search_key("Élodie Martin", "Elodie@Example.com", "+33 6 12");
        assert_eq!(key, "élodie martin\nelodie@example.com\n+33 6 12");
        for term in ["Élodie", "élodie", "ÉLODIE"] {
            assert_eq!(search_pattern(term), Some("%élodie%".to_string()));
        }
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        assert_eq!(search_pattern("50%_off"), Some("%50\\%\\_off%".to_string()));
        assert_eq!(search_pattern("a\\b"), Some("%a\\\\b%".to_string()));
    }
}
