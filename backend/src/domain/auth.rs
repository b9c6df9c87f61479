//! Authentication inputs: registration, login, password resets, and
//! one-time verification codes.
//!
//! Constructors take the raw optional fields of a request body and report
//! every violated rule through [`Violations`], so handlers only map DTOs.

use std::fmt;

use rand::Rng;
use zeroize::Zeroizing;

use super::validation::{FieldResult, FieldViolation, TextRule, Violations};
use super::{AllergyId, EmailAddress, Error, FullName};

/// Plain-text password that satisfies the account password policy.
///
/// ## Invariants
/// - 8 to 50 characters once trimmed.
/// - Contains a lowercase letter, an uppercase letter, a digit, and a
///   character that is neither an ASCII letter nor a digit.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    const RULE: TextRule = TextRule {
        field: "password",
        min: 8,
        max: 50,
    };

    /// Validate a raw `password` field against the policy.
    pub fn parse(raw: Option<&str>) -> FieldResult<Self> {
        let trimmed = Zeroizing::new(Self::RULE.apply(raw, None)?);
        let has = |predicate: fn(char) -> bool| trimmed.chars().any(predicate);
        let complex = has(|c| c.is_ascii_lowercase())
            && has(|c| c.is_ascii_uppercase())
            && has(|c| c.is_ascii_digit())
            && has(|c| !c.is_ascii_alphanumeric());
        if !complex {
            return Err(vec![FieldViolation::Format {
                field: "password",
                rule: "must include an uppercase letter, a lowercase letter, a digit, and a special character",
            }]);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the secret.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

/// Stored password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a PHC string produced by a hasher or read from storage.
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Borrow the PHC string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(**redacted**)")
    }
}

/// Validated `POST /auth/register` input.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Login address; must not already be registered.
    pub email: EmailAddress,
    /// Display name.
    pub full_name: FullName,
    /// Initial password.
    pub password: Password,
    /// Allergies to attach to the new account.
    pub allergy_ids: Vec<AllergyId>,
}

impl Registration {
    /// Validate the raw registration fields.
    ///
    /// # Examples
    /// ```
    /// use safeplate::domain::Registration;
    ///
    /// let ok = Registration::parse(Some("a@b.com"), Some("Jane Doe"), Some("Aa1!aaaa"), vec![]);
    /// assert!(ok.is_ok());
    /// let err = Registration::parse(Some("nope"), Some("J"), Some("short"), vec![]).unwrap_err();
    /// assert_eq!(err.messages().count(), 3);
    /// ```
    pub fn parse(
        email: Option<&str>,
        full_name: Option<&str>,
        password: Option<&str>,
        allergy_ids: Vec<AllergyId>,
    ) -> Result<Self, Error> {
        let mut violations = Violations::default();
        let email = violations.check(EmailAddress::parse(email));
        let full_name = violations.check(FullName::parse(full_name));
        let password = violations.check(Password::parse(password));
        let mut allergy_ids = allergy_ids;
        allergy_ids.sort_unstable();
        allergy_ids.dedup();
        let registration = match (email, full_name, password) {
            (Some(email), Some(full_name), Some(password)) => Some(Self {
                email,
                full_name,
                password,
                allergy_ids,
            }),
            _ => None,
        };
        violations.finish(registration)
    }
}

/// Validated `POST /auth/login` input.
///
/// The password is only checked for presence so that every wrong password
/// yields the same authentication failure.
#[derive(Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw login fields.
    pub fn parse(email: Option<&str>, password: Option<&str>) -> Result<Self, Error> {
        let mut violations = Violations::default();
        let email = violations.check(EmailAddress::parse(email));
        let password = match password.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => Some(Zeroizing::new(value.to_owned())),
            None => {
                violations.push(FieldViolation::Missing { field: "password" });
                None
            }
        };
        violations.finish(email.zip(password).map(|(email, password)| Self { email, password }))
    }

    /// Address to look the account up by.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Validated `POST /auth/resetPassword` input.
#[derive(Debug, Clone)]
pub struct PasswordReset {
    /// Account to update.
    pub email: EmailAddress,
    /// Replacement password.
    pub password: Password,
}

impl PasswordReset {
    /// Validate raw reset fields.
    pub fn parse(email: Option<&str>, password: Option<&str>) -> Result<Self, Error> {
        let mut violations = Violations::default();
        let email = violations.check(EmailAddress::parse(email));
        let password = violations.check(Password::parse(password));
        violations.finish(email.zip(password).map(|(email, password)| Self { email, password }))
    }
}

/// Six-digit one-time code mailed to confirm ownership of an address.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Draw a uniformly random, zero-padded code.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Draw a code from the supplied generator.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let value: u32 = rng.gen_range(0..1_000_000);
        Self(format!("{value:06}"))
    }

    /// Borrow the digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(******)")
    }
}
