// ABOUTME: Notification mail templates for the inactive-user policy
// ABOUTME: Canonical default texts and %variable substitution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::periods::format_interval;

/// Variables available in every template
pub const MAIL_VARIABLES: [&str; 6] = [
    "%username",
    "%useremail",
    "%lastaccess",
    "%period",
    "%sitename",
    "%siteurl",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailTextKind {
    NotifyText,
    BlockWarnText,
    BlockNotifyText,
    DeleteWarnText,
    DeleteNotifyText,
}

impl MailTextKind {
    pub const ALL: [MailTextKind; 5] = [
        MailTextKind::NotifyText,
        MailTextKind::BlockWarnText,
        MailTextKind::BlockNotifyText,
        MailTextKind::DeleteWarnText,
        MailTextKind::DeleteNotifyText,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            MailTextKind::NotifyText => "notify_text",
            MailTextKind::BlockWarnText => "block_warn_text",
            MailTextKind::BlockNotifyText => "block_notify_text",
            MailTextKind::DeleteWarnText => "delete_warn_text",
            MailTextKind::DeleteNotifyText => "delete_notify_text",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

/// Source of the canonical template for each notification kind
pub trait MailTextProvider: Send + Sync {
    fn default_text(&self, kind: MailTextKind) -> String;
}

/// Built-in English templates
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMailText;

impl MailTextProvider for DefaultMailText {
    fn default_text(&self, kind: MailTextKind) -> String {
        let body = match kind {
            MailTextKind::NotifyText => {
                "Hello %username,\n\n  We haven't seen you at %sitename since %lastaccess, and we miss you!  \
                 Please come back and visit us soon at %siteurl.\n\nSincerely,\n  %sitename team"
            }
            MailTextKind::BlockWarnText => {
                "Hello %username,\n\n  We haven't seen you at %sitename since %lastaccess, and we miss you!  \
                 This automatic message is to warn you that your account will be disabled in %period \
                 unless you come back and visit us before that time.\n\n  Please visit us at %siteurl.\n\n\
                 Sincerely,\n  %sitename team"
            }
            MailTextKind::BlockNotifyText => {
                "Hello %username,\n\n  This automatic message is to notify you that your account on %sitename \
                 has been automatically disabled due to no activity for more than %period.\n\n  \
                 Please visit us at %siteurl to have your account re-enabled.\n\nSincerely,\n  %sitename team"
            }
            MailTextKind::DeleteWarnText => {
                "Hello %username,\n\n  We haven't seen you at %sitename since %lastaccess, and we miss you!  \
                 This automatic message is to warn you that your account will be completely removed in %period \
                 unless you come back and visit us before that time.\n\n  Please visit us at %siteurl.\n\n\
                 Sincerely,\n  %sitename team"
            }
            MailTextKind::DeleteNotifyText => {
                "Hello %username,\n\n  This automatic message is to notify you that your account on %sitename \
                 has been automatically removed due to no activity for more than %period.\n\n  \
                 Please visit us at %siteurl if you would like to create a new account.\n\n\
                 Sincerely,\n  %sitename team"
            }
        };
        body.to_string()
    }
}

/// Values substituted into a template for one recipient
#[derive(Debug, Clone)]
pub struct MailVariables {
    pub username: String,
    pub useremail: String,
    pub lastaccess: Option<DateTime<Utc>>,
    pub period: u64,
    pub sitename: String,
    pub siteurl: String,
}

impl MailVariables {
    fn value(&self, token: &str) -> Option<String> {
        match token {
            "%username" => Some(self.username.clone()),
            "%useremail" => Some(self.useremail.clone()),
            "%lastaccess" => Some(match self.lastaccess {
                Some(at) => at.format("%Y-%m-%d %H:%M UTC").to_string(),
                None => "never".to_string(),
            }),
            "%period" => Some(format_interval(self.period)),
            "%sitename" => Some(self.sitename.clone()),
            "%siteurl" => Some(self.siteurl.clone()),
            _ => None,
        }
    }

    /// Substitute every known `%variable` in one pass.
    ///
    /// Substituted values are never rescanned, and unknown `%tokens` are kept
    /// as written.
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            let token = MAIL_VARIABLES
                .iter()
                .copied()
                .find(|token| tail.starts_with(token));

            match token.and_then(|token| self.value(token).map(|value| (token, value))) {
                Some((token, value)) => {
                    out.push_str(&value);
                    rest = &tail[token.len()..];
                }
                None => {
                    out.push('%');
                    rest = &tail[1..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn variables() -> MailVariables {
        MailVariables {
            username: "jdoe".to_string(),
            useremail: "jdoe@example.com".to_string(),
            lastaccess: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
            period: 1_209_600,
            sitename: "Example".to_string(),
            siteurl: "https://example.com".to_string(),
        }
    }

    #[test]
    fn test_every_kind_has_a_default() {
        for kind in MailTextKind::ALL {
            let text = DefaultMailText.default_text(kind);
            assert!(text.starts_with("Hello %username,"), "{}", kind.as_str());
            assert!(text.contains("%sitename"));
        }
    }

    #[test]
    fn test_warn_texts_mention_period() {
        assert!(DefaultMailText
            .default_text(MailTextKind::BlockWarnText)
            .contains("disabled in %period"));
        assert!(DefaultMailText
            .default_text(MailTextKind::DeleteWarnText)
            .contains("removed in %period"));
    }

    #[test]
    fn test_kind_ids_round_trip() {
        for kind in MailTextKind::ALL {
            assert_eq!(MailTextKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MailTextKind::parse("notify_admin_text"), None);
    }

    #[test]
    fn test_render_substitutes_all_variables() {
        let rendered = variables().render(
            "%username <%useremail> last seen %lastaccess, %period on %sitename (%siteurl)",
        );
        assert_eq!(
            rendered,
            "jdoe <jdoe@example.com> last seen 2024-03-01 09:30 UTC, 2 weeks on Example (https://example.com)"
        );
    }

    #[test]
    fn test_render_keeps_unknown_tokens_and_stray_percent() {
        let rendered = variables().render("100% sure, %unknown stays, %username");
        assert_eq!(rendered, "100% sure, %unknown stays, jdoe");
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let mut vars = variables();
        vars.username = "%sitename".to_string();
        assert_eq!(vars.render("Hi %username"), "Hi %sitename");
    }

    #[test]
    fn test_render_without_last_access() {
        let mut vars = variables();
        vars.lastaccess = None;
        assert_eq!(vars.render("since %lastaccess"), "since never");
    }
}
