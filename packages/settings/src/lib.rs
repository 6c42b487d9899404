// ABOUTME: Inactive-user lifecycle policy
// ABOUTME: Typed policy model, period sets, e-mail validation, mail templates and persistence

pub mod mail_text;
pub mod periods;
pub mod store;
pub mod types;
pub mod validation;

pub use mail_text::{DefaultMailText, MailTextKind, MailTextProvider, MailVariables};
pub use periods::{format_interval, LongPeriod, PeriodError, PeriodSet, WarnPeriod};
pub use store::{PolicyConfigStore, PolicyError};
pub use types::{FieldKind, InactiveUserPolicy, PolicyKey, PolicySubmission};
pub use validation::{
    validate_admin_email_field, validate_admin_email_list, validate_admin_emails, EmailValidator,
    SyntaxEmailValidator, ValidationError,
};
