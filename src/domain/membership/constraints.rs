//! Field constraints shared by membership entities and input DTOs.

use crate::domain::foundation::ValidationError;

/// Maximum length of every free-text column.
pub const MAX_TEXT_LENGTH: usize = 255;

/// Rejects blank values and values longer than [`MAX_TEXT_LENGTH`] characters.
pub fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }

    let length = value.chars().count();
    if length > MAX_TEXT_LENGTH {
        return Err(ValidationError::too_long(field, MAX_TEXT_LENGTH, length));
    }

    Ok(())
}

/// Text constraints plus a structural e-mail check: one `@` with a
/// non-empty local part and a dotted domain, no whitespace.
pub fn require_email(field: &str, value: &str) -> Result<(), ValidationError> {
    require_text(field, value)?;

    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::invalid_format(field, "email must not contain whitespace"));
    }

    let mut parts = value.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => {
            return Err(ValidationError::invalid_format(
                field,
                "email must contain exactly one @",
            ))
        }
    };

    if local.is_empty() {
        return Err(ValidationError::invalid_format(field, "email local part is empty"));
    }

    let domain_ok = domain
        .split('.')
        .filter(|label| !label.is_empty())
        .count()
        >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.');
    if !domain_ok {
        return Err(ValidationError::invalid_format(field, "email domain is invalid"));
    }

    Ok(())
}
