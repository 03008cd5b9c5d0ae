//! Form validation

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

/// Form fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Contact or recipient name
    Name,

    /// Email address
    Email,

    /// Company name
    Company,

    /// Phone number
    Phone,

    /// Free-form message
    Message,

    /// Street address
    Address,

    /// City
    City,

    /// Country
    Country,
}

impl Field {
    /// Stable identifier used for form element ids.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Company => "company",
            Field::Phone => "phone",
            Field::Message => "message",
            Field::Address => "address",
            Field::City => "city",
            Field::Country => "country",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Company => "Company",
            Field::Phone => "Phone",
            Field::Message => "Message",
            Field::Address => "Address",
            Field::City => "City",
            Field::Country => "Country",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field was empty or whitespace.
    #[error("{0} is required")]
    Required(Field),

    /// The email address is not of the form `local@domain.tld`.
    #[error("Please enter a valid email address")]
    InvalidEmail,
}

impl FieldError {
    /// Field this error belongs to.
    pub fn field(&self) -> Field {
        match self {
            FieldError::Required(field) => *field,
            FieldError::InvalidEmail => Field::Email,
        }
    }
}

/// Every field error found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{} field(s) need attention", .errors.len())]
pub struct ValidationErrors {
    errors: SmallVec<[FieldError; 4]>,
}

impl ValidationErrors {
    /// Record an error.
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Record [`FieldError::Required`] when `value` is blank.
    pub fn require(&mut self, field: Field, value: &str) {
        if value.trim().is_empty() {
            self.push(FieldError::Required(field));
        }
    }

    /// Require an email and check its format.
    pub fn require_email(&mut self, value: &str) {
        let value = value.trim();

        if value.is_empty() {
            self.push(FieldError::Required(Field::Email));
        } else if !is_valid_email(value) {
            self.push(FieldError::InvalidEmail);
        }
    }

    /// First error recorded for `field`.
    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field() == field)
    }

    /// Errors in the order they were found.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether validation passed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field error was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Loose `local@domain.tld` check with no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("vault@aurum.ae"));
        assert!(is_valid_email("first.last+gold@mail.example.com"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in [
            "",
            "vault",
            "@aurum.ae",
            "vault@",
            "vault@aurum",
            "vault@.ae",
            "vault@aurum.",
            "va ult@aurum.ae",
            "a@b@aurum.ae",
        ] {
            assert!(!is_valid_email(email), "{email} should be rejected");
        }
    }

    #[test]
    fn collects_every_error() {
        let mut errors = ValidationErrors::default();

        errors.require(Field::Name, "  ");
        errors.require_email("not-an-email");
        errors.require(Field::Message, "Hello");

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.for_field(Field::Email),
            Some(&FieldError::InvalidEmail)
        );
        assert_eq!(
            errors.for_field(Field::Name),
            Some(&FieldError::Required(Field::Name))
        );
        assert!(errors.for_field(Field::Message).is_none());
    }

    #[test]
    fn blank_email_is_required_not_invalid() {
        let mut errors = ValidationErrors::default();

        errors.require_email(" ");

        assert_eq!(
            errors.iter().collect::<Vec<_>>(),
            [&FieldError::Required(Field::Email)]
        );
    }

    #[test]
    fn empty_errors_are_ok() {
        assert_eq!(ValidationErrors::default().into_result(), Ok(()));
    }

    #[test]
    fn messages_name_the_field() {
        assert_eq!(
            FieldError::Required(Field::Company).to_string(),
            "Company is required"
        );
    }
}
