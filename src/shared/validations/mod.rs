use crate::shared::errors::DomainError;
use crate::shared::pagination::PageWindow;

/// Validate a catalog page request against the configured bounds.
///
/// A missing limit falls back to `default_limit`; an explicit limit of zero
/// or above `max_limit` is rejected rather than silently clamped.
pub fn validate_page(
    limit: Option<u64>,
    offset: Option<u64>,
    default_limit: u64,
    max_limit: u64,
) -> Result<PageWindow, DomainError> {
    let limit = limit.unwrap_or(default_limit);
    if limit == 0 || limit > max_limit {
        return Err(DomainError::Validation(format!(
            "limit must be between 1 and {}, got {}",
            max_limit, limit
        )));
    }
    Ok(PageWindow::new(limit, offset.unwrap_or(0)))
}

/// Machine keys: lowercase ASCII, digits and underscores, starting with a letter.
pub fn is_machine_key(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// `validator` adapter for [`is_machine_key`].
pub fn validate_machine_key(value: &str) -> Result<(), validator::ValidationError> {
    if is_machine_key(value) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("machine_key");
        err.message = Some("must match ^[a-z][a-z0-9_]*$".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_apply() {
        let page = validate_page(None, None, 20, 100).unwrap();
        assert_eq!(page, PageWindow::new(20, 0));
    }

    #[test]
    fn page_rejects_zero_and_oversized_limits() {
        assert!(matches!(
            validate_page(Some(0), None, 20, 100),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            validate_page(Some(101), None, 20, 100),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn machine_keys() {
        assert!(is_machine_key("seat_count"));
        assert!(is_machine_key("a1"));
        assert!(!is_machine_key("Seat"));
        assert!(!is_machine_key("1seat"));
        assert!(!is_machine_key("seat-count"));
        assert!(!is_machine_key(""));
    }
}
