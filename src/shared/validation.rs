use validator::{ValidationErrors, ValidationErrorsKind};

/// Pick a single human readable message out of `validator` errors.
///
/// Fields are visited in name order so the same input always yields the same
/// message. Falls back to the `Display` form when no custom message was set.
pub fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in fields {
        if let ValidationErrorsKind::Field(field_errors) = kind {
            if let Some(error) = field_errors.first() {
                return match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value for {}", field),
                };
            }
        }
    }

    errors.to_string()
}
