//! Input validation helpers for the merge mutation

use shared::EmployeeUpsert;

/// Employee names
pub const MAX_NAME_LEN: usize = 200;

/// Login names
pub const MAX_USER_NAME_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Phone numbers
pub const MAX_PHONE_LEN: usize = 100;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if value.len() > max_len {
        return Err(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), String> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ));
    }
    Ok(())
}

/// Validate a merge payload, collecting every violation
pub fn validate_upsert(fields: &EmployeeUpsert) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = [
        validate_required_text(&fields.name, "name", MAX_NAME_LEN),
        validate_required_text(&fields.user_name, "user_name", MAX_USER_NAME_LEN),
        validate_optional_text(&fields.email, "email", MAX_EMAIL_LEN),
        validate_optional_text(&fields.phone, "phone", MAX_PHONE_LEN),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    if let Some(email) = &fields.email
        && !email.is_empty()
        && !looks_like_email(email)
    {
        errors.push(format!("email is not a valid address: {email}"));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}
