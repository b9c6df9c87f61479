//! Field-level input validation shared by the domain's value types.
//!
//! Value constructors report every rule a field breaks, and request-level
//! parsers gather them with [`Violations`] so one response lists all
//! problems at once.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::json;

use super::Error;

/// One broken validation rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldViolation {
    /// The field was absent or blank.
    #[error("{field} is required")]
    Missing {
        /// JSON field name.
        field: &'static str,
    },
    /// The trimmed value is shorter than allowed.
    #[error("{field} must be at least {min} characters")]
    TooShort {
        /// JSON field name.
        field: &'static str,
        /// Minimum length in characters.
        min: usize,
    },
    /// The trimmed value is longer than allowed.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// JSON field name.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },
    /// The value does not match the expected shape.
    #[error("{field} {rule}")]
    Format {
        /// JSON field name.
        field: &'static str,
        /// Description of the expected shape.
        rule: &'static str,
    },
}

impl FieldViolation {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::Format { field, .. } => field,
        }
    }
}

/// Result of validating one field.
pub type FieldResult<T> = Result<T, Vec<FieldViolation>>;

/// Accumulates violations across the fields of one request.
///
/// # Examples
/// ```
/// use safeplate::domain::{EmailAddress, FullName, Violations};
///
/// let mut violations = Violations::default();
/// let email = violations.check(EmailAddress::parse(Some("not-an-email")));
/// let name = violations.check(FullName::parse(Some("J")));
/// let err = violations
///     .finish(email.zip(name))
///     .expect_err("both fields are invalid");
/// assert_eq!(err.messages().count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    /// Record the violations of a field result, keeping the value on success.
    pub fn check<T>(&mut self, outcome: FieldResult<T>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(found) => {
                self.0.extend(found);
                None
            }
        }
    }

    /// Record a single violation.
    pub fn push(&mut self, violation: FieldViolation) {
        self.0.push(violation);
    }

    /// Whether any rule was broken.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return `value` when nothing was recorded, else a validation [`Error`].
    pub fn finish<T>(self, value: Option<T>) -> Result<T, Error> {
        if !self.0.is_empty() {
            return Err(self.into_error());
        }
        value.ok_or_else(|| Error::internal("validation produced no value"))
    }

    fn into_error(self) -> Error {
        let fields: Vec<_> = self
            .0
            .iter()
            .map(|violation| json!({ "field": violation.field(), "message": violation.to_string() }))
            .collect();
        let messages = self.0.iter().map(ToString::to_string).collect();
        Error::validation(messages).with_details(json!({ "violations": fields }))
    }
}

/// Length bounds for a trimmed text field.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextRule {
    pub(crate) field: &'static str,
    pub(crate) min: usize,
    pub(crate) max: usize,
}

impl TextRule {
    /// Trim `raw` and check presence, length, and the optional character set.
    pub(crate) fn apply(
        self,
        raw: Option<&str>,
        charset: Option<(&Regex, &'static str)>,
    ) -> FieldResult<String> {
        let value = raw.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(vec![FieldViolation::Missing { field: self.field }]);
        }

        let mut found = Vec::new();
        let length = value.chars().count();
        if length < self.min {
            found.push(FieldViolation::TooShort {
                field: self.field,
                min: self.min,
            });
        }
        if length > self.max {
            found.push(FieldViolation::TooLong {
                field: self.field,
                max: self.max,
            });
        }
        if let Some((pattern, rule)) = charset {
            if !pattern.is_match(value) {
                found.push(FieldViolation::Format {
                    field: self.field,
                    rule,
                });
            }
        }

        if found.is_empty() {
            Ok(value.to_owned())
        } else {
            Err(found)
        }
    }
}

fn compiled(cell: &'static OnceLock<Regex>, source: &'static str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(source).unwrap_or_else(|error| panic!("pattern {source} failed to compile: {error}"))
    })
}

/// English or Hebrew letters and spaces.
pub(crate) fn person_name_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    compiled(&CELL, r"^[A-Za-z\x{0590}-\x{05FF} ]+$")
}

/// Hebrew letters and spaces.
pub(crate) fn hebrew_name_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    compiled(&CELL, r"^[\x{0590}-\x{05FF} ]+$")
}

pub(crate) fn email_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    compiled(&CELL, r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
}

/// Leading digit followed by nine or ten further characters.
pub(crate) fn phone_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    compiled(&CELL, r"^[0-9].{9,10}$")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const NAME: TextRule = TextRule {
        field: "name",
        min: 2,
        max: 5,
    };

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn blank_values_are_missing(#[case] raw: Option<&str>) {
        assert_eq!(
            NAME.apply(raw, None),
            Err(vec![FieldViolation::Missing { field: "name" }])
        );
    }

    #[rstest]
    fn values_are_trimmed() {
        assert_eq!(NAME.apply(Some("  abc "), None), Ok("abc".to_owned()));
    }

    #[rstest]
    fn length_and_charset_are_both_reported() {
        let outcome = NAME.apply(Some("a1"), Some((person_name_pattern(), "is bad")));
        assert_eq!(
            outcome,
            Err(vec![FieldViolation::Format {
                field: "name",
                rule: "is bad"
            }])
        );
        let outcome = NAME.apply(Some("1"), Some((person_name_pattern(), "is bad")));
        assert_eq!(outcome.map_err(|found| found.len()), Err(2));
    }

    #[rstest]
    #[case("0501234567", true)]
    #[case("05012345678", true)]
    #[case("050123456", false)]
    #[case("x501234567", false)]
    fn phone_pattern_matches_local_numbers(#[case] phone: &str, #[case] expected: bool) {
        assert_eq!(phone_pattern().is_match(phone), expected);
    }

    #[rstest]
    fn violations_collect_messages_and_details() {
        let mut violations = Violations::default();
        violations.push(FieldViolation::Missing { field: "email" });
        violations.push(FieldViolation::TooShort {
            field: "password",
            min: 8,
        });
        let error = violations.finish::<()>(None).expect_err("violations recorded");
        let messages: Vec<_> = error.messages().collect();
        assert_eq!(
            messages,
            ["email is required", "password must be at least 8 characters"]
        );
        assert_eq!(
            error.details().and_then(|d| d["violations"][1]["field"].as_str()),
            Some("password")
        );
    }
}
