// ABOUTME: Type definitions for the inactive-user policy
// ABOUTME: Persisted key schema, the typed policy record and per-field decoding

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::mail_text::{MailTextKind, MailTextProvider};
use crate::periods::{LongPeriod, PeriodSet, WarnPeriod};
use crate::validation::ValidationError;

/// Raw key -> value mapping as submitted by the settings form
pub type PolicySubmission = Map<String, Value>;

/// How a persisted key is typed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Emails,
    Period(PeriodSet),
    Template(MailTextKind),
    Flag,
}

/// Persisted configuration keys, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKey {
    AdminEmail,
    NotifyAdmin,
    Notify,
    NotifyText,
    AutoBlockWarn,
    BlockWarnText,
    AutoBlock,
    NotifyBlock,
    BlockNotifyText,
    NotifyBlockAdmin,
    AutoDeleteWarn,
    DeleteWarnText,
    AutoDelete,
    PreserveContent,
    NotifyDelete,
    DeleteNotifyText,
    NotifyDeleteAdmin,
}

impl PolicyKey {
    pub const ALL: [PolicyKey; 17] = [
        PolicyKey::AdminEmail,
        PolicyKey::NotifyAdmin,
        PolicyKey::Notify,
        PolicyKey::NotifyText,
        PolicyKey::AutoBlockWarn,
        PolicyKey::BlockWarnText,
        PolicyKey::AutoBlock,
        PolicyKey::NotifyBlock,
        PolicyKey::BlockNotifyText,
        PolicyKey::NotifyBlockAdmin,
        PolicyKey::AutoDeleteWarn,
        PolicyKey::DeleteWarnText,
        PolicyKey::AutoDelete,
        PolicyKey::PreserveContent,
        PolicyKey::NotifyDelete,
        PolicyKey::DeleteNotifyText,
        PolicyKey::NotifyDeleteAdmin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKey::AdminEmail => "inactive_user_admin_email",
            PolicyKey::NotifyAdmin => "inactive_user_notify_admin",
            PolicyKey::Notify => "inactive_user_notify",
            PolicyKey::NotifyText => "inactive_user_notify_text",
            PolicyKey::AutoBlockWarn => "inactive_user_auto_block_warn",
            PolicyKey::BlockWarnText => "inactive_user_block_warn_text",
            PolicyKey::AutoBlock => "inactive_user_auto_block",
            PolicyKey::NotifyBlock => "inactive_user_notify_block",
            PolicyKey::BlockNotifyText => "inactive_user_block_notify_text",
            PolicyKey::NotifyBlockAdmin => "inactive_user_notify_block_admin",
            PolicyKey::AutoDeleteWarn => "inactive_user_auto_delete_warn",
            PolicyKey::DeleteWarnText => "inactive_user_delete_warn_text",
            PolicyKey::AutoDelete => "inactive_user_auto_delete",
            PolicyKey::PreserveContent => "inactive_user_preserve_content",
            PolicyKey::NotifyDelete => "inactive_user_notify_delete",
            PolicyKey::DeleteNotifyText => "inactive_user_delete_notify_text",
            PolicyKey::NotifyDeleteAdmin => "inactive_user_notify_delete_admin",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == key)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            PolicyKey::AdminEmail => FieldKind::Emails,
            PolicyKey::NotifyAdmin
            | PolicyKey::Notify
            | PolicyKey::AutoBlock
            | PolicyKey::AutoDelete => FieldKind::Period(PeriodSet::Long),
            PolicyKey::AutoBlockWarn | PolicyKey::AutoDeleteWarn => {
                FieldKind::Period(PeriodSet::Warn)
            }
            PolicyKey::NotifyText => FieldKind::Template(MailTextKind::NotifyText),
            PolicyKey::BlockWarnText => FieldKind::Template(MailTextKind::BlockWarnText),
            PolicyKey::BlockNotifyText => FieldKind::Template(MailTextKind::BlockNotifyText),
            PolicyKey::DeleteWarnText => FieldKind::Template(MailTextKind::DeleteWarnText),
            PolicyKey::DeleteNotifyText => FieldKind::Template(MailTextKind::DeleteNotifyText),
            PolicyKey::NotifyBlock
            | PolicyKey::NotifyBlockAdmin
            | PolicyKey::PreserveContent
            | PolicyKey::NotifyDelete
            | PolicyKey::NotifyDeleteAdmin => FieldKind::Flag,
        }
    }
}

/// The complete inactive-user policy, one per site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InactiveUserPolicy {
    pub admin_email: Vec<String>,

    // Notification
    pub notify_admin_after: LongPeriod,
    pub notify_user_after: LongPeriod,
    pub notify_user_text: String,

    // Blocking
    pub block_warn_after: WarnPeriod,
    pub block_warn_text: String,
    pub block_after: LongPeriod,
    pub notify_on_block: bool,
    pub block_notify_text: String,
    pub notify_admin_on_block: bool,

    // Deletion
    pub delete_warn_after: WarnPeriod,
    pub delete_warn_text: String,
    pub delete_after: LongPeriod,
    pub preserve_content_owners: bool,
    pub notify_on_delete: bool,
    pub delete_notify_text: String,
    pub notify_admin_on_delete: bool,
}

impl InactiveUserPolicy {
    /// Install-time defaults: everything disabled, content owners preserved
    pub fn defaults(mail_text: &dyn MailTextProvider, site_mail: Option<&str>) -> Self {
        Self {
            admin_email: site_mail.map(|mail| vec![mail.to_string()]).unwrap_or_default(),
            notify_user_text: mail_text.default_text(MailTextKind::NotifyText),
            block_warn_text: mail_text.default_text(MailTextKind::BlockWarnText),
            block_notify_text: mail_text.default_text(MailTextKind::BlockNotifyText),
            delete_warn_text: mail_text.default_text(MailTextKind::DeleteWarnText),
            delete_notify_text: mail_text.default_text(MailTextKind::DeleteNotifyText),
            preserve_content_owners: true,
            ..Self::default()
        }
    }

    /// Stored representation of one field
    pub fn field_value(&self, key: PolicyKey) -> Value {
        match key {
            PolicyKey::AdminEmail => json!(self.admin_email),
            PolicyKey::NotifyAdmin => json!(self.notify_admin_after.as_secs()),
            PolicyKey::Notify => json!(self.notify_user_after.as_secs()),
            PolicyKey::NotifyText => json!(self.notify_user_text),
            PolicyKey::AutoBlockWarn => json!(self.block_warn_after.as_secs()),
            PolicyKey::BlockWarnText => json!(self.block_warn_text),
            PolicyKey::AutoBlock => json!(self.block_after.as_secs()),
            PolicyKey::NotifyBlock => json!(self.notify_on_block),
            PolicyKey::BlockNotifyText => json!(self.block_notify_text),
            PolicyKey::NotifyBlockAdmin => json!(self.notify_admin_on_block),
            PolicyKey::AutoDeleteWarn => json!(self.delete_warn_after.as_secs()),
            PolicyKey::DeleteWarnText => json!(self.delete_warn_text),
            PolicyKey::AutoDelete => json!(self.delete_after.as_secs()),
            PolicyKey::PreserveContent => json!(self.preserve_content_owners),
            PolicyKey::NotifyDelete => json!(self.notify_on_delete),
            PolicyKey::DeleteNotifyText => json!(self.delete_notify_text),
            PolicyKey::NotifyDeleteAdmin => json!(self.notify_admin_on_delete),
        }
    }

    /// Every field as `(key, stored value)`, in form order
    pub fn to_fields(&self) -> Vec<(PolicyKey, Value)> {
        PolicyKey::ALL
            .into_iter()
            .map(|key| (key, self.field_value(key)))
            .collect()
    }

    /// The policy as a form submission that would reproduce it
    pub fn to_submission(&self) -> PolicySubmission {
        self.to_fields()
            .into_iter()
            .map(|(key, value)| match key {
                PolicyKey::AdminEmail => (key.as_str().to_string(), json!(self.admin_email.join(", "))),
                _ => (key.as_str().to_string(), value),
            })
            .collect()
    }

    /// Current template for a notification kind
    pub fn template(&self, kind: MailTextKind) -> &str {
        match kind {
            MailTextKind::NotifyText => &self.notify_user_text,
            MailTextKind::BlockWarnText => &self.block_warn_text,
            MailTextKind::BlockNotifyText => &self.block_notify_text,
            MailTextKind::DeleteWarnText => &self.delete_warn_text,
            MailTextKind::DeleteNotifyText => &self.delete_notify_text,
        }
    }

    /// Seconds substituted for `%period` in the mail of `kind`
    pub fn period_for(&self, kind: MailTextKind) -> u64 {
        match kind {
            MailTextKind::NotifyText => self.notify_user_after.as_secs(),
            MailTextKind::BlockWarnText => self.block_warn_after.as_secs(),
            MailTextKind::BlockNotifyText => self.block_after.as_secs(),
            MailTextKind::DeleteWarnText => self.delete_warn_after.as_secs(),
            MailTextKind::DeleteNotifyText => self.delete_after.as_secs(),
        }
    }

    /// Decode `value` and assign it to the field behind `key`.
    ///
    /// The administrator list is only split here; address syntax is checked
    /// by the submission path before this is reached.
    pub fn set_field(&mut self, key: PolicyKey, value: &Value) -> Result<(), ValidationError> {
        match key {
            PolicyKey::AdminEmail => self.admin_email = decode_emails(key, value)?,
            PolicyKey::NotifyAdmin => self.notify_admin_after = decode_long(key, value)?,
            PolicyKey::Notify => self.notify_user_after = decode_long(key, value)?,
            PolicyKey::NotifyText => self.notify_user_text = decode_text(key, value)?,
            PolicyKey::AutoBlockWarn => self.block_warn_after = decode_warn(key, value)?,
            PolicyKey::BlockWarnText => self.block_warn_text = decode_text(key, value)?,
            PolicyKey::AutoBlock => self.block_after = decode_long(key, value)?,
            PolicyKey::NotifyBlock => self.notify_on_block = decode_flag(key, value)?,
            PolicyKey::BlockNotifyText => self.block_notify_text = decode_text(key, value)?,
            PolicyKey::NotifyBlockAdmin => self.notify_admin_on_block = decode_flag(key, value)?,
            PolicyKey::AutoDeleteWarn => self.delete_warn_after = decode_warn(key, value)?,
            PolicyKey::DeleteWarnText => self.delete_warn_text = decode_text(key, value)?,
            PolicyKey::AutoDelete => self.delete_after = decode_long(key, value)?,
            PolicyKey::PreserveContent => self.preserve_content_owners = decode_flag(key, value)?,
            PolicyKey::NotifyDelete => self.notify_on_delete = decode_flag(key, value)?,
            PolicyKey::DeleteNotifyText => self.delete_notify_text = decode_text(key, value)?,
            PolicyKey::NotifyDeleteAdmin => self.notify_admin_on_delete = decode_flag(key, value)?,
        }
        Ok(())
    }
}

fn invalid_type(key: PolicyKey, expected: &str) -> ValidationError {
    ValidationError::InvalidType {
        key: key.as_str().to_string(),
        expected: expected.to_string(),
    }
}

/// Select widgets post numeric strings; stored values are plain numbers
fn decode_seconds(key: PolicyKey, value: &Value, set: PeriodSet) -> Result<u64, ValidationError> {
    let secs = match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };

    let secs = secs.ok_or_else(|| invalid_type(key, "a number of seconds"))?;
    if !set.contains(secs) {
        return Err(ValidationError::InvalidPeriod {
            key: key.as_str().to_string(),
            value: secs.to_string(),
            set,
        });
    }

    Ok(secs)
}

fn decode_long(key: PolicyKey, value: &Value) -> Result<LongPeriod, ValidationError> {
    let secs = decode_seconds(key, value, PeriodSet::Long)?;
    LongPeriod::new(secs).map_err(|err| ValidationError::InvalidPeriod {
        key: key.as_str().to_string(),
        value: err.value.to_string(),
        set: err.set,
    })
}

fn decode_warn(key: PolicyKey, value: &Value) -> Result<WarnPeriod, ValidationError> {
    let secs = decode_seconds(key, value, PeriodSet::Warn)?;
    WarnPeriod::new(secs).map_err(|err| ValidationError::InvalidPeriod {
        key: key.as_str().to_string(),
        value: err.value.to_string(),
        set: err.set,
    })
}

/// Checkboxes post 0/1; accept booleans and their string spellings too
fn decode_flag(key: PolicyKey, value: &Value) -> Result<bool, ValidationError> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(number) => match number.as_u64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(invalid_type(key, "a boolean")),
        },
        Value::String(text) => match text.trim() {
            "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            _ => Err(invalid_type(key, "a boolean")),
        },
        _ => Err(invalid_type(key, "a boolean")),
    }
}

fn decode_text(key: PolicyKey, value: &Value) -> Result<String, ValidationError> {
    let text = value
        .as_str()
        .ok_or_else(|| invalid_type(key, "a string"))?;

    if text.trim().is_empty() {
        return Err(ValidationError::Required(key.as_str().to_string()));
    }

    Ok(text.to_string())
}

/// Either a JSON array of addresses or the raw comma-separated input
fn decode_emails(key: PolicyKey, value: &Value) -> Result<Vec<String>, ValidationError> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(|mail| mail.trim().to_string())
                    .ok_or_else(|| invalid_type(key, "a list of e-mail addresses"))
            })
            .filter(|mail| !matches!(mail, Ok(mail) if mail.is_empty()))
            .collect(),
        Value::String(raw) => Ok(split_emails(raw)),
        _ => Err(invalid_type(key, "a list of e-mail addresses")),
    }
}

fn split_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|mail| !mail.is_empty())
        .map(str::to_string)
        .collect()
}
