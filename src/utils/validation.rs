use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

/// Trims surrounding whitespace; blank input becomes `None`.
pub fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Accumulates field errors for payloads that can't use the derive,
/// such as tri-state update bodies.
pub struct FieldChecks {
    errors: ValidationErrors,
}

impl FieldChecks {
    pub fn new() -> Self {
        Self {
            errors: ValidationErrors::new(),
        }
    }

    pub fn max_len(&mut self, field: &'static str, value: Option<&str>, max: usize) {
        if let Some(v) = value {
            if v.chars().count() > max {
                self.errors.add(
                    field,
                    field_error("length", format!("{} must be at most {} characters", field, max)),
                );
            }
        }
    }

    pub fn add(&mut self, field: &'static str, error: ValidationError) {
        self.errors.add(field, error);
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_trims_and_drops_blank() {
        assert_eq!(normalize_text(Some("  Acme ".into())), Some("Acme".into()));
        assert_eq!(normalize_text(Some("   ".into())), None);
        assert_eq!(normalize_text(None), None);
    }

    #[test]
    fn field_checks_collect_errors() {
        let mut checks = FieldChecks::new();
        checks.max_len("company", Some("abcdef"), 3);
        checks.max_len("role", Some("ok"), 3);
        let err = checks.finish().unwrap_err();
        assert!(err.field_errors().contains_key("company"));
        assert!(!err.field_errors().contains_key("role"));
    }
}
