// ABOUTME: Input validation for the inactive-user policy
// ABOUTME: Administrator e-mail list checks and per-field value errors

use thiserror::Error;
use validator::ValidateEmail;

use crate::periods::PeriodSet;

/// Maximum length of the raw administrator e-mail input
pub const ADMIN_EMAIL_MAX_LENGTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is not a valid e-mail address")]
    SingleInvalidEmail(String),

    #[error("The following e-mail addresses are invalid: {}", .0.join(", "))]
    MultipleInvalidEmails(Vec<String>),

    #[error("{key} cannot be longer than {max} characters")]
    TooLong { key: String, max: usize },

    #[error("{0} is required")]
    Required(String),

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid value for {key}: expected {expected}")]
    InvalidType { key: String, expected: String },

    #[error("Invalid value for {key}: {value} is not one of the {set} periods")]
    InvalidPeriod {
        key: String,
        value: String,
        set: PeriodSet,
    },
}

impl ValidationError {
    /// Persisted key of the offending field, for per-field error display
    pub fn field(&self) -> &str {
        match self {
            ValidationError::SingleInvalidEmail(_) | ValidationError::MultipleInvalidEmails(_) => {
                crate::types::PolicyKey::AdminEmail.as_str()
            }
            ValidationError::TooLong { key, .. }
            | ValidationError::InvalidType { key, .. }
            | ValidationError::InvalidPeriod { key, .. } => key.as_str(),
            ValidationError::Required(key) | ValidationError::MissingField(key) => key.as_str(),
        }
    }
}

/// Syntax check for a single e-mail address
#[cfg_attr(test, mockall::automock)]
pub trait EmailValidator: Send + Sync {
    fn is_valid(&self, email: &str) -> bool;
}

/// Grammar check backed by the `validator` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxEmailValidator;

impl EmailValidator for SyntaxEmailValidator {
    fn is_valid(&self, email: &str) -> bool {
        email.to_string().validate_email()
    }
}

/// Validate a comma-separated list of administrator e-mail addresses.
///
/// Entries are trimmed and empty entries skipped. Every invalid entry is
/// collected before failing, in input order. An input with no entries at all
/// is accepted and yields an empty list.
pub fn validate_admin_emails(
    raw: &str,
    validator: &dyn EmailValidator,
) -> Result<Vec<String>, ValidationError> {
    check_entries(raw.split(','), validator)
}

/// Validate the raw administrator e-mail field as submitted.
///
/// Adds the field-level rules on top of [`validate_admin_emails`]: the raw
/// input is limited to [`ADMIN_EMAIL_MAX_LENGTH`] characters and at least one
/// address is required.
pub fn validate_admin_email_field(
    raw: &str,
    validator: &dyn EmailValidator,
) -> Result<Vec<String>, ValidationError> {
    check_length(raw.chars().count())?;
    require_entries(validate_admin_emails(raw, validator)?)
}

/// Validate an administrator list submitted as separate items.
///
/// Each item is one address and is never split on commas. The length limit
/// applies to the list as the text field would show it, items joined by `", "`.
pub fn validate_admin_email_list(
    items: &[String],
    validator: &dyn EmailValidator,
) -> Result<Vec<String>, ValidationError> {
    let shown = items.iter().map(|item| item.chars().count()).sum::<usize>()
        + items.len().saturating_sub(1) * 2;
    check_length(shown)?;
    require_entries(check_entries(items.iter().map(String::as_str), validator)?)
}

fn check_entries<'a>(
    entries: impl Iterator<Item = &'a str>,
    validator: &dyn EmailValidator,
) -> Result<Vec<String>, ValidationError> {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();

    for entry in entries {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }

        if validator.is_valid(trimmed) {
            valid.push(trimmed.to_string());
        } else {
            invalid.push(trimmed.to_string());
        }
    }

    match invalid.len() {
        0 => Ok(valid),
        1 => Err(ValidationError::SingleInvalidEmail(invalid.remove(0))),
        _ => Err(ValidationError::MultipleInvalidEmails(invalid)),
    }
}

fn check_length(chars: usize) -> Result<(), ValidationError> {
    if chars > ADMIN_EMAIL_MAX_LENGTH {
        return Err(ValidationError::TooLong {
            key: crate::types::PolicyKey::AdminEmail.as_str().to_string(),
            max: ADMIN_EMAIL_MAX_LENGTH,
        });
    }
    Ok(())
}

fn require_entries(emails: Vec<String>) -> Result<Vec<String>, ValidationError> {
    if emails.is_empty() {
        return Err(ValidationError::Required(
            crate::types::PolicyKey::AdminEmail.as_str().to_string(),
        ));
    }
    Ok(emails)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(raw: &str) -> Result<Vec<String>, ValidationError> {
        validate_admin_emails(raw, &SyntaxEmailValidator)
    }

    #[test]
    fn test_valid_list_is_trimmed_and_ordered() {
        let emails = validate(" admin@example.com,ops@example.org ,  , root@example.net,").unwrap();
        assert_eq!(
            emails,
            vec!["admin@example.com", "ops@example.org", "root@example.net"]
        );
    }

    #[test]
    fn test_single_invalid_entry() {
        let err = validate("a@b.com, not-an-email").unwrap_err();
        assert_eq!(
            err,
            ValidationError::SingleInvalidEmail("not-an-email".to_string())
        );
        assert_eq!(err.to_string(), "not-an-email is not a valid e-mail address");
    }

    #[test]
    fn test_multiple_invalid_entries_keep_order() {
        let err = validate("bad1, a@b.com, bad2").unwrap_err();
        assert_eq!(
            err,
            ValidationError::MultipleInvalidEmails(vec!["bad1".to_string(), "bad2".to_string()])
        );
        assert_eq!(
            err.to_string(),
            "The following e-mail addresses are invalid: bad1, bad2"
        );
    }

    #[test]
    fn test_empty_input_yields_empty_list() {
        assert_eq!(validate("").unwrap(), Vec::<String>::new());
        assert_eq!(validate(",,,").unwrap(), Vec::<String>::new());
        assert_eq!(validate(" , ").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_validator_sees_trimmed_entries_only() {
        let mut validator = MockEmailValidator::new();
        validator
            .expect_is_valid()
            .withf(|email| email == "first@example.com")
            .times(1)
            .return_const(true);
        validator
            .expect_is_valid()
            .withf(|email| email == "second")
            .times(1)
            .return_const(false);

        let err = validate_admin_emails("  first@example.com ,, second  ", &validator).unwrap_err();
        assert_eq!(err, ValidationError::SingleInvalidEmail("second".to_string()));
    }

    #[test]
    fn test_validation_does_not_short_circuit() {
        let mut validator = MockEmailValidator::new();
        validator.expect_is_valid().times(4).return_const(false);

        let err = validate_admin_emails("a, b, c, d", &validator).unwrap_err();
        match err {
            ValidationError::MultipleInvalidEmails(values) => assert_eq!(values.len(), 4),
            other => panic!("Expected MultipleInvalidEmails, got {:?}", other),
        }
    }

    #[test]
    fn test_field_rules() {
        let validator = SyntaxEmailValidator;

        assert_eq!(
            validate_admin_email_field(" , ", &validator).unwrap_err(),
            ValidationError::Required("inactive_user_admin_email".to_string())
        );

        let long = format!("{}@example.com", "a".repeat(250));
        let err = validate_admin_email_field(&long, &validator).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 256, .. }));
        assert_eq!(err.field(), "inactive_user_admin_email");

        assert_eq!(
            validate_admin_email_field("admin@example.com", &validator).unwrap(),
            vec!["admin@example.com"]
        );
    }

    #[test]
    fn test_error_field_names_offending_key() {
        let err = ValidationError::InvalidPeriod {
            key: "inactive_user_auto_block".to_string(),
            value: "12345".to_string(),
            set: PeriodSet::Long,
        };
        assert_eq!(err.field(), "inactive_user_auto_block");
        assert_eq!(
            err.to_string(),
            "Invalid value for inactive_user_auto_block: 12345 is not one of the long periods"
        );

        let err = ValidationError::MultipleInvalidEmails(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(err.field(), "inactive_user_admin_email");
    }

    #[test]
    fn test_list_items_are_not_split_on_commas() {
        let mut validator = MockEmailValidator::new();
        validator
            .expect_is_valid()
            .withf(|email| email == "a@b.com,c@d.com")
            .times(1)
            .return_const(false);

        let items = vec!["a@b.com,c@d.com".to_string()];
        assert_eq!(
            validate_admin_email_list(&items, &validator).unwrap_err(),
            ValidationError::SingleInvalidEmail("a@b.com,c@d.com".to_string())
        );
    }

    #[test]
    fn test_list_rules() {
        let validator = SyntaxEmailValidator;

        let items = vec![" admin@example.com ".to_string(), "ops@example.org".to_string()];
        assert_eq!(
            validate_admin_email_list(&items, &validator).unwrap(),
            vec!["admin@example.com", "ops@example.org"]
        );

        assert_eq!(
            validate_admin_email_list(&[" ".to_string()], &validator).unwrap_err(),
            ValidationError::Required("inactive_user_admin_email".to_string())
        );

        // 2 x 127 chars + ", " is 256, one more tips it over
        let exact = vec!["a".repeat(127), "b".repeat(127)];
        assert!(!matches!(
            validate_admin_email_list(&exact, &validator),
            Err(ValidationError::TooLong { .. })
        ));
        let over = vec!["a".repeat(128), "b".repeat(127)];
        assert!(matches!(
            validate_admin_email_list(&over, &validator),
            Err(ValidationError::TooLong { max: 256, .. })
        ));
    }
}
