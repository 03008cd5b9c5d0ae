//! Inquiries
//!
//! Lead capture for general contact, wholesale accounts and custom
//! commissions. Submissions go through an [`InquiryDesk`]; the storefront
//! ships with a simulated desk.

use std::{fmt, str::FromStr};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::{
    reference,
    validation::{Field, ValidationErrors},
};

/// Prefix for inquiry references.
pub const INQUIRY_REFERENCE_PREFIX: &str = "INQ";

/// Errors raised when submitting an inquiry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InquiryError {
    /// One or more fields failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The desk refused the inquiry.
    #[error("Inquiry rejected: {0}")]
    Rejected(String),
}

/// What the shopper is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum InquiryKind {
    /// General contact
    #[default]
    General,

    /// Wholesale or trade account
    Wholesale,

    /// Custom minting or engraving
    Custom,
}

impl InquiryKind {
    /// Every kind, in form order.
    pub const ALL: [InquiryKind; 3] = [
        InquiryKind::General,
        InquiryKind::Wholesale,
        InquiryKind::Custom,
    ];

    /// Form label.
    pub fn label(self) -> &'static str {
        match self {
            InquiryKind::General => "General enquiry",
            InquiryKind::Wholesale => "Wholesale",
            InquiryKind::Custom => "Custom commission",
        }
    }

    /// Stable form value.
    pub fn key(self) -> &'static str {
        match self {
            InquiryKind::General => "general",
            InquiryKind::Wholesale => "wholesale",
            InquiryKind::Custom => "custom",
        }
    }
}

impl fmt::Display for InquiryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InquiryKind {
    type Err = InquiryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InquiryKind::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InquiryError::Rejected(format!("unknown inquiry kind {s}")))
    }
}

/// A lead captured from one of the contact forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inquiry {
    /// Form the inquiry came from
    pub kind: InquiryKind,

    /// Contact name
    pub name: String,

    /// Contact email
    pub email: String,

    /// Company, required for wholesale
    pub company: String,

    /// Optional phone number
    pub phone: String,

    /// Message body
    pub message: String,
}

impl Inquiry {
    /// Check every field and report all problems at once.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each invalid field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.require(Field::Name, &self.name);
        errors.require_email(&self.email);

        if self.kind == InquiryKind::Wholesale {
            errors.require(Field::Company, &self.company);
        }

        errors.require(Field::Message, &self.message);

        errors.into_result()
    }
}

/// Acknowledgement for a submitted inquiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquiryReceipt {
    /// Reference quoted back to the shopper
    pub reference: String,

    /// Form the inquiry came from
    pub kind: InquiryKind,
}

/// Receives inquiries.
#[cfg_attr(test, automock)]
#[async_trait(?Send)]
pub trait InquiryDesk {
    /// Validate and submit an inquiry.
    async fn submit(&self, inquiry: Inquiry) -> Result<InquiryReceipt, InquiryError>;
}

/// Desk that accepts every valid inquiry without contacting a backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedInquiryDesk;

#[async_trait(?Send)]
impl InquiryDesk for SimulatedInquiryDesk {
    async fn submit(&self, inquiry: Inquiry) -> Result<InquiryReceipt, InquiryError> {
        inquiry.validate()?;

        let reference = reference::generate(INQUIRY_REFERENCE_PREFIX, &mut rand::thread_rng());

        info!(%reference, kind = inquiry.kind.key(), "inquiry received");

        Ok(InquiryReceipt {
            reference,
            kind: inquiry.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::validation::FieldError;

    use super::*;

    fn valid(kind: InquiryKind) -> Inquiry {
        Inquiry {
            kind,
            name: "Layla Haddad".to_string(),
            email: "layla@example.com".to_string(),
            company: String::new(),
            phone: String::new(),
            message: "Do you ship to Abu Dhabi?".to_string(),
        }
    }

    #[test]
    fn valid_general_inquiry_passes() {
        assert_eq!(valid(InquiryKind::General).validate(), Ok(()));
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let inquiry = Inquiry {
            kind: InquiryKind::Wholesale,
            ..Inquiry::default()
        };

        let errors = inquiry.validate().err().unwrap_or_default();
        let fields: Vec<Field> = errors.iter().map(FieldError::field).collect();

        assert_eq!(
            fields,
            [Field::Name, Field::Email, Field::Company, Field::Message]
        );
    }

    #[test]
    fn wholesale_requires_company() {
        let mut inquiry = valid(InquiryKind::Wholesale);

        let errors = inquiry.validate().err().unwrap_or_default();

        assert_eq!(
            errors.for_field(Field::Company),
            Some(&FieldError::Required(Field::Company))
        );

        inquiry.company = "Gulf Bullion Trading".to_string();

        assert_eq!(inquiry.validate(), Ok(()));
    }

    #[test]
    fn custom_does_not_require_company() {
        assert_eq!(valid(InquiryKind::Custom).validate(), Ok(()));
    }

    #[test]
    fn invalid_email_is_reported() {
        let mut inquiry = valid(InquiryKind::General);
        inquiry.email = "layla at example.com".to_string();

        let errors = inquiry.validate().err().unwrap_or_default();

        assert_eq!(errors.iter().collect::<Vec<_>>(), [&FieldError::InvalidEmail]);
    }

    #[test]
    fn parses_kind_keys() -> TestResult {
        assert_eq!("wholesale".parse::<InquiryKind>()?, InquiryKind::Wholesale);
        assert!("press".parse::<InquiryKind>().is_err());

        Ok(())
    }

    #[tokio::test]
    async fn simulated_desk_issues_reference() -> TestResult {
        let receipt = SimulatedInquiryDesk
            .submit(valid(InquiryKind::Custom))
            .await?;

        assert!(receipt.reference.starts_with("INQ-"));
        assert_eq!(receipt.kind, InquiryKind::Custom);

        Ok(())
    }

    #[tokio::test]
    async fn simulated_desk_rejects_invalid_inquiry() {
        let result = SimulatedInquiryDesk.submit(Inquiry::default()).await;

        assert!(matches!(result, Err(InquiryError::Invalid(errors)) if errors.len() == 3));
    }

    #[tokio::test]
    async fn mocked_desk_can_reject() {
        let mut desk = MockInquiryDesk::new();

        desk.expect_submit()
            .returning(|_| Err(InquiryError::Rejected("desk closed".to_string())));

        let result = desk.submit(valid(InquiryKind::General)).await;

        assert_eq!(
            result,
            Err(InquiryError::Rejected("desk closed".to_string()))
        );
    }
}
