//! Shared validation helpers for inbound HTTP adapters.

use crate::domain::{EmailAddress, Error, FieldResult, TagKind, TagName, Violations};

/// Turn a single-field validation outcome into a handler result.
///
/// The error lists every violation, matching multi-field validators.
pub(crate) fn field<T>(outcome: FieldResult<T>) -> Result<T, Error> {
    let mut violations = Violations::default();
    let value = violations.check(outcome);
    violations.finish(value)
}

/// Validate an `{email}` request body.
pub(crate) fn email(raw: Option<&str>) -> Result<EmailAddress, Error> {
    field(EmailAddress::parse(raw))
}

/// Validate an `{name}` request body for an allergy or ingredient.
pub(crate) fn tag_name(kind: TagKind, raw: Option<&str>) -> Result<TagName, Error> {
    field(TagName::parse(kind, raw))
}
