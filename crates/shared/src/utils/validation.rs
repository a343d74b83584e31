use validator::{ValidationErrors, ValidationErrorsKind};

/// Flattens `validator` output into `field: message` strings, sorted so the
/// same input always yields the same list.
pub fn format_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();

    for (field, kind) in errors.errors() {
        if let ValidationErrorsKind::Field(field_errors) = kind {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| match error.code.as_ref() {
                        "required" => format!("Missing required field: {field}"),
                        "length" => format!("{field} must not be empty"),
                        "range" => format!("{field} is out of range"),
                        _ => format!("Invalid {field}"),
                    });
                messages.push(message);
            }
        }
    }

    messages.sort();
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(required)]
        name: Option<String>,
        #[validate(range(min = 0, message = "qty must be a non-negative number"))]
        qty: i32,
    }

    #[test]
    fn uses_custom_message_and_falls_back_per_code() {
        let sample = Sample {
            name: None,
            qty: -1,
        };
        let errors = sample.validate().expect_err("sample is invalid");

        assert_eq!(
            format_validation_errors(&errors),
            vec![
                "Missing required field: name".to_string(),
                "qty must be a non-negative number".to_string(),
            ]
        );
    }
}
