// ABOUTME: Storage operations for the inactive-user policy
// ABOUTME: Load with defaults, validate submissions, and persist key by key

use std::sync::Arc;

use inactive_user_config::constants::SETTINGS_NAMESPACE;
use inactive_user_storage::{ConfigBackend, StorageError};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::mail_text::{DefaultMailText, MailTextKind, MailTextProvider};
use crate::types::{FieldKind, InactiveUserPolicy, PolicyKey, PolicySubmission};
use crate::validation::{
    validate_admin_email_field, validate_admin_email_list, validate_admin_emails, EmailValidator,
    SyntaxEmailValidator, ValidationError,
};

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Keys written before `key` stay committed
    #[error("Failed to persist {key}: {source}")]
    Persist {
        key: String,
        #[source]
        source: StorageError,
    },
}

/// Loads, validates and persists the inactive-user policy.
///
/// Every collaborator is an explicit handle; nothing is looked up globally.
#[derive(Clone)]
pub struct PolicyConfigStore {
    backend: Arc<dyn ConfigBackend>,
    mail_text: Arc<dyn MailTextProvider>,
    email_validator: Arc<dyn EmailValidator>,
    site_mail: Option<String>,
}

impl PolicyConfigStore {
    pub fn new(backend: Arc<dyn ConfigBackend>) -> Self {
        Self {
            backend,
            mail_text: Arc::new(DefaultMailText),
            email_validator: Arc::new(SyntaxEmailValidator),
            site_mail: None,
        }
    }

    pub fn with_mail_text(mut self, mail_text: Arc<dyn MailTextProvider>) -> Self {
        self.mail_text = mail_text;
        self
    }

    pub fn with_email_validator(mut self, email_validator: Arc<dyn EmailValidator>) -> Self {
        self.email_validator = email_validator;
        self
    }

    /// Address used as the administrator list until one is saved
    pub fn with_site_mail(mut self, site_mail: Option<String>) -> Self {
        self.site_mail = site_mail;
        self
    }

    pub fn defaults(&self) -> InactiveUserPolicy {
        InactiveUserPolicy::defaults(self.mail_text.as_ref(), self.site_mail.as_deref())
    }

    pub fn default_template_text(&self, kind: MailTextKind) -> String {
        self.mail_text.default_text(kind)
    }

    /// Current value of `key`, its default when unset, or `Null` for an unknown key.
    ///
    /// Read failures are logged and answered with the default.
    pub async fn get(&self, key: &str) -> Value {
        let policy_key = PolicyKey::parse(key);

        match self.backend.get(SETTINGS_NAMESPACE, key).await {
            Ok(Some(value)) if !policy_key.is_some_and(|k| is_blank_template(k, &value)) => {
                return value;
            }
            Ok(_) => {}
            Err(e) => error!("Failed to read {}: {}", key, e),
        }

        match policy_key {
            Some(policy_key) => self.defaults().field_value(policy_key),
            None => Value::Null,
        }
    }

    /// The full policy with each field resolved to its stored value or default
    pub async fn load_policy(&self) -> InactiveUserPolicy {
        let mut policy = self.defaults();

        for key in PolicyKey::ALL {
            let stored = match self.backend.get(SETTINGS_NAMESPACE, key.as_str()).await {
                Ok(Some(value)) => value,
                Ok(None) => continue,
                Err(e) => {
                    error!("Failed to read {}, using default: {}", key.as_str(), e);
                    continue;
                }
            };

            if is_blank_template(key, &stored) {
                continue;
            }

            if let Err(e) = policy.set_field(key, &stored) {
                warn!("Ignoring stored value of {}: {}", key.as_str(), e);
            }
        }

        policy
    }

    /// Check a comma-separated administrator list; see [`validate_admin_emails`]
    pub fn validate_admin_emails(&self, raw: &str) -> Result<Vec<String>, ValidationError> {
        validate_admin_emails(raw, self.email_validator.as_ref())
    }

    /// Check the administrator e-mail field as submitted, including the
    /// length limit and the required rule
    pub fn validate_submission(&self, admin_email_raw: &str) -> Result<Vec<String>, ValidationError> {
        validate_admin_email_field(admin_email_raw, self.email_validator.as_ref())
    }

    /// The administrator field may arrive as the raw text or as a list of
    /// addresses; list items are checked one by one
    fn validate_admin_email_value(
        &self,
        key: PolicyKey,
        value: &Value,
    ) -> Result<Vec<String>, ValidationError> {
        let invalid_type = || ValidationError::InvalidType {
            key: key.as_str().to_string(),
            expected: "a list of e-mail addresses".to_string(),
        };

        match value {
            Value::String(raw) => self.validate_submission(raw),
            Value::Array(items) => {
                let items = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid_type))
                    .collect::<Result<Vec<_>, _>>()?;
                validate_admin_email_list(&items, self.email_validator.as_ref())
            }
            _ => Err(invalid_type()),
        }
    }

    /// Decode a full submission into a policy without writing anything
    pub fn parse_submission(
        &self,
        fields: &PolicySubmission,
    ) -> Result<InactiveUserPolicy, ValidationError> {
        for key in fields.keys() {
            if PolicyKey::parse(key).is_none() {
                debug!("Ignoring submitted key outside the policy: {}", key);
            }
        }

        let mut policy = InactiveUserPolicy::default();

        for key in PolicyKey::ALL {
            let value = fields
                .get(key.as_str())
                .ok_or_else(|| ValidationError::MissingField(key.as_str().to_string()))?;

            match key.kind() {
                FieldKind::Emails => policy.admin_email = self.validate_admin_email_value(key, value)?,
                _ => policy.set_field(key, value)?,
            }
        }

        Ok(policy)
    }

    /// Validate and persist a complete submission.
    ///
    /// Nothing is written when validation fails.
    pub async fn apply_submission(&self, fields: &PolicySubmission) -> Result<(), PolicyError> {
        let policy = self.parse_submission(fields)?;
        self.save(&policy).await?;

        info!(
            "Saved inactive user policy ({} administrator address(es))",
            policy.admin_email.len()
        );
        Ok(())
    }

    /// Write every field, one key at a time, each committed before the next.
    ///
    /// There is no rollback: when a write fails, earlier keys remain saved.
    pub async fn save(&self, policy: &InactiveUserPolicy) -> Result<(), PolicyError> {
        for (key, value) in policy.to_fields() {
            self.write(key.as_str(), value).await?;
        }
        Ok(())
    }

    /// Write defaults for keys that have never been stored.
    /// Returns the number of keys written.
    pub async fn install_defaults(&self) -> Result<usize, PolicyError> {
        let defaults = self.defaults();
        let mut written = 0;

        for (key, value) in defaults.to_fields() {
            let existing = self
                .backend
                .get(SETTINGS_NAMESPACE, key.as_str())
                .await
                .map_err(|source| PolicyError::Persist {
                    key: key.as_str().to_string(),
                    source,
                })?;

            if existing.is_none() {
                self.write(key.as_str(), value).await?;
                written += 1;
            }
        }

        info!("Installed {} default policy setting(s)", written);
        Ok(written)
    }

    async fn write(&self, key: &str, value: Value) -> Result<(), PolicyError> {
        debug!("Persisting {}", key);

        let persist_err = |source| PolicyError::Persist {
            key: key.to_string(),
            source,
        };

        self.backend
            .set(SETTINGS_NAMESPACE, key, value)
            .await
            .map_err(persist_err)?;
        self.backend.save().await.map_err(persist_err)?;

        Ok(())
    }
}

/// Templates saved as empty fall back to the default text
fn is_blank_template(key: PolicyKey, value: &Value) -> bool {
    matches!(key.kind(), FieldKind::Template(_))
        && value.as_str().is_some_and(|text| text.trim().is_empty())
}
