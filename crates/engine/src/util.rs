//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic shared by the entity modules.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

pub(crate) const MAX_NAME_LEN: usize = 100;

/// Parse a UUID and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| EngineError::validation(label, format!("'{value}' is not a valid id")))
}

/// Trim `value` and reject it when empty or longer than `max_len` characters.
pub(crate) fn normalize_required_text(
    value: &str,
    field: &str,
    max_len: usize,
) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::validation(field, "must not be empty"));
    }
    if trimmed.chars().count() > max_len {
        return Err(EngineError::validation(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Blank optional text is stored as `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Accept `#RGB` or `#RRGGBB`.
pub(crate) fn normalize_color(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix('#')
        .ok_or_else(|| EngineError::validation("color", "must start with '#'"))?;
    if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EngineError::validation(
            "color",
            format!("'{trimmed}' is not a hex color"),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_accepts_short_and_long_hex() {
        assert_eq!(normalize_color("#fff").unwrap(), "#fff");
        assert_eq!(normalize_color(" #FF5733 ").unwrap(), "#FF5733");
    }

    #[test]
    fn color_rejects_garbage() {
        assert_eq!(normalize_color("FF5733").unwrap_err().field(), Some("color"));
        assert!(normalize_color("#GG0000").is_err());
        assert!(normalize_color("#12345").is_err());
    }

    #[test]
    fn required_text_is_trimmed_and_bounded() {
        assert_eq!(
            normalize_required_text("  Lunch ", "title", MAX_NAME_LEN).unwrap(),
            "Lunch"
        );
        assert!(normalize_required_text("   ", "title", MAX_NAME_LEN).is_err());
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(normalize_required_text(&long, "title", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn optional_text_drops_blank() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(Some(" a ")), Some("a".to_string()));
        assert_eq!(normalize_optional_text(None), None);
    }
}
