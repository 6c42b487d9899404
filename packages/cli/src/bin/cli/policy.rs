// ABOUTME: CLI commands for inspecting and editing the inactive-user policy
// ABOUTME: Show, export, apply, install defaults, list periods and preview mail templates

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use inactive_user_cli::Config;
use inactive_user_settings::{
    validate_admin_email_field, DefaultMailText, InactiveUserPolicy, MailTextKind,
    MailTextProvider, MailVariables, PeriodSet, PolicyConfigStore, PolicyError, PolicySubmission,
    SyntaxEmailValidator, ValidationError,
};

pub async fn show(store: &PolicyConfigStore, as_json: bool) -> Result<()> {
    let policy = store.load_policy().await;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&policy)?);
        return Ok(());
    }

    println!("{}", "Inactive user policy".bold().cyan());
    println!();
    println!("{}", policy_table(&policy));
    Ok(())
}

fn policy_table(policy: &InactiveUserPolicy) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["Setting", "Value"]);

    let flag = |on: bool| (if on { "yes" } else { "no" }).to_string();

    table.add_row(vec!["Administrator e-mail".to_string(), policy.admin_email.join(", ")]);
    table.add_row(vec!["Notify administrator after".to_string(), policy.notify_admin_after.label()]);
    table.add_row(vec!["Notify users after".to_string(), policy.notify_user_after.label()]);
    table.add_row(vec!["Warn before block".to_string(), policy.block_warn_after.label()]);
    table.add_row(vec!["Block after".to_string(), policy.block_after.label()]);
    table.add_row(vec!["Notify user on block".to_string(), flag(policy.notify_on_block)]);
    table.add_row(vec!["Notify administrator on block".to_string(), flag(policy.notify_admin_on_block)]);
    table.add_row(vec!["Warn before delete".to_string(), policy.delete_warn_after.label()]);
    table.add_row(vec!["Delete after".to_string(), policy.delete_after.label()]);
    table.add_row(vec!["Preserve content owners".to_string(), flag(policy.preserve_content_owners)]);
    table.add_row(vec!["Notify user on delete".to_string(), flag(policy.notify_on_delete)]);
    table.add_row(vec!["Notify administrator on delete".to_string(), flag(policy.notify_admin_on_delete)]);

    table
}

pub async fn export(store: &PolicyConfigStore) -> Result<()> {
    let policy = store.load_policy().await;
    println!("{}", serde_json::to_string_pretty(&policy.to_submission())?);
    Ok(())
}

pub fn periods() {
    for (set, title) in [
        (PeriodSet::Long, "Notify / block / delete thresholds"),
        (PeriodSet::Warn, "Warning lead times"),
    ] {
        println!("{}", title.bold().cyan());

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Seconds", "Label"]);

        for (secs, label) in set.options() {
            table.add_row(vec![secs.to_string(), label]);
        }

        println!("{}", table);
        println!();
    }
}

pub fn validate_emails(raw: &str) -> Result<()> {
    let emails = validate_admin_email_field(raw, &SyntaxEmailValidator).map_err(field_error)?;

    println!(
        "{} {} valid address(es)",
        "✓".green().bold(),
        emails.len()
    );
    for email in emails {
        println!("  {}", email);
    }
    Ok(())
}

pub async fn apply(store: &PolicyConfigStore, file: &Path) -> Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let fields: PolicySubmission = serde_json::from_str(&raw)
        .with_context(|| format!("{} must contain a JSON object", file.display()))?;

    match store.apply_submission(&fields).await {
        Ok(()) => {
            println!("{} Policy saved", "✓".green().bold());
            Ok(())
        }
        Err(PolicyError::Validation(err)) => Err(field_error(err)),
        Err(err @ PolicyError::Persist { .. }) => Err(anyhow!(err)
            .context("Saving stopped part-way; settings before the failing key were kept")),
    }
}

pub async fn install(store: &PolicyConfigStore) -> Result<()> {
    let written = store.install_defaults().await?;

    if written == 0 {
        println!("{} Policy already installed", "•".yellow());
    } else {
        println!(
            "{} Installed {} default setting(s)",
            "✓".green().bold(),
            written
        );
    }
    Ok(())
}

pub fn template(kind: &str) -> Result<()> {
    let kind = parse_kind(kind)?;
    println!("{}", DefaultMailText.default_text(kind));
    Ok(())
}

pub struct PreviewArgs {
    pub kind: String,
    pub username: String,
    pub email: String,
    pub last_access: Option<String>,
}

pub async fn preview(store: &PolicyConfigStore, config: &Config, args: PreviewArgs) -> Result<()> {
    let kind = parse_kind(&args.kind)?;
    let lastaccess = args
        .last_access
        .as_deref()
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|at| at.with_timezone(&Utc))
                .with_context(|| format!("Invalid --last-access timestamp: {}", raw))
        })
        .transpose()?;

    let policy = store.load_policy().await;
    let variables = MailVariables {
        username: args.username,
        useremail: args.email,
        lastaccess,
        period: policy.period_for(kind),
        sitename: config.site_name.clone(),
        siteurl: config.site_url.clone(),
    };

    println!("{}", variables.render(policy.template(kind)));
    Ok(())
}

fn parse_kind(kind: &str) -> Result<MailTextKind> {
    MailTextKind::parse(kind).ok_or_else(|| {
        let known: Vec<&str> = MailTextKind::ALL.iter().map(|kind| kind.as_str()).collect();
        anyhow!("Unknown template kind: {}. Must be one of: {}", kind, known.join(", "))
    })
}

fn field_error(err: ValidationError) -> anyhow::Error {
    anyhow!("{}: {}", err.field(), err)
}
