//! Admin note validation.

/// Maximum length of note content in characters.
pub const MAX_NOTE_CONTENT_LENGTH: usize = 10_000;

/// Validate note content: must be non-blank and within the length limit.
pub fn validate_note_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Note content cannot be empty".to_string());
    }
    if content.chars().count() > MAX_NOTE_CONTENT_LENGTH {
        return Err(format!(
            "Note content exceeds maximum length of {MAX_NOTE_CONTENT_LENGTH} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_note_rejected() {
        assert!(validate_note_content("").is_err());
        assert!(validate_note_content(" \n ").is_err());
    }

    #[test]
    fn note_at_limit_accepted() {
        let note = "a".repeat(MAX_NOTE_CONTENT_LENGTH);
        assert!(validate_note_content(&note).is_ok());
    }

    #[test]
    fn note_over_limit_rejected() {
        let note = "a".repeat(MAX_NOTE_CONTENT_LENGTH + 1);
        let err = validate_note_content(&note).unwrap_err();
        assert!(err.contains("maximum length"));
    }
}
