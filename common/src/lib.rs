pub mod config;
pub mod logger;

use validator::{ValidationErrors, ValidationErrorsKind};

/// Flattens (possibly nested) validation errors into one `"; "`-separated line,
/// each entry prefixed with the dotted path of the offending field.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, "", &mut messages);
    messages.sort();
    messages.join("; ")
}

fn collect_messages(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    match &e.message {
                        Some(m) => out.push(format!("{path}: {m}")),
                        None => out.push(format!("{path}: {}", e.code)),
                    }
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (i, inner) in items {
                    collect_messages(inner, &format!("{path}[{i}]"), out);
                }
            }
        }
    }
}
