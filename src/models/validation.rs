use serde::Serialize;

/// One failing field, as reported to clients.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Collects schema failures for one document and renders them in the
/// `"<Model> validation failed: path: message, ..."` form.
#[derive(Debug)]
pub struct SchemaCheck {
    model: &'static str,
    errors: Vec<FieldError>,
}

impl SchemaCheck {
    pub fn new(model: &'static str) -> Self {
        Self {
            model,
            errors: Vec::new(),
        }
    }

    /// Missing, null and empty strings all fail a required path.
    pub fn required(&mut self, path: &str, value: Option<&str>) -> &mut Self {
        if value.map_or(true, str::is_empty) {
            self.errors
                .push(FieldError::new(path, format!("Path `{}` is required.", path)));
        }
        self
    }

    /// Only checked when a value is present; use `required` for presence.
    pub fn min_length(&mut self, path: &str, value: Option<&str>, min: usize) -> &mut Self {
        if let Some(v) = value {
            if !v.is_empty() && v.chars().count() < min {
                self.errors.push(FieldError::new(
                    path,
                    format!(
                        "Path `{}` (`{}`) is shorter than the minimum allowed length ({}).",
                        path, v, min
                    ),
                ));
            }
        }
        self
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn finish(&self) -> Result<(), String> {
        if self.errors.is_empty() {
            return Ok(());
        }

        let details = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join(", ");

        Err(format!("{} validation failed: {}", self.model, details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_when_everything_is_present() {
        let mut check = SchemaCheck::new("Blog");
        check.required("title", Some("Title")).required("url", Some("http://x"));
        assert!(check.finish().is_ok());
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let mut check = SchemaCheck::new("Blog");
        check.required("title", Some("")).required("url", None);
        assert_eq!(
            check.finish().unwrap_err(),
            "Blog validation failed: title: Path `title` is required., url: Path `url` is required."
        );
    }

    #[test]
    fn min_length_reports_value_and_limit() {
        let mut check = SchemaCheck::new("User");
        check.min_length("username", Some("ab"), 3);
        assert_eq!(
            check.finish().unwrap_err(),
            "User validation failed: username: Path `username` (`ab`) is shorter than the minimum allowed length (3)."
        );
    }

    #[test]
    fn min_length_ignores_missing_values() {
        let mut check = SchemaCheck::new("User");
        check.min_length("username", None, 3);
        assert!(check.errors().is_empty());
    }
}
