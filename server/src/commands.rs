//! Subcommand handlers for the admin CLI.

use std::path::Path;

use anyhow::{bail, Context};
use serde_json::Value;
use settings::{
    owner_of, AboutSettings, DomainKind, HeaderSettings, HeroSettings, SettingsDomain,
    ThemeSettings,
};

use crate::manager::batch::FieldWrite;
use crate::manager::{BatchOutcome, BatchReport, SettingsManager, SettingsSnapshot};
use crate::persistence::SettingRepository;
use crate::Commands;

/// Calls `$handler::<D, _>(args..)` with `D` the record type of `$domain`.
macro_rules! for_domain {
    ($domain:expr, $handler:ident($($arg:expr),*)) => {
        match $domain {
            DomainKind::Hero => $handler::<HeroSettings, _>($($arg),*).await,
            DomainKind::About => $handler::<AboutSettings, _>($($arg),*).await,
            DomainKind::Header => $handler::<HeaderSettings, _>($($arg),*).await,
            DomainKind::Theme => $handler::<ThemeSettings, _>($($arg),*).await,
        }
    };
}

pub async fn run<R: SettingRepository + 'static>(
    manager: &SettingsManager<R>,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::List { domain } => list(manager, domain).await,
        Commands::Get { key } => get(manager, &key).await,
        Commands::Show { domain } => for_domain!(domain, show(manager)),
        Commands::Set {
            domain,
            field,
            value,
        } => for_domain!(domain, set(manager, &field, value)),
        Commands::Reset { domain } => for_domain!(domain, reset(manager)),
        Commands::Export { path } => export(manager, &path).await,
        Commands::Import { path } => import(manager, &path).await,
    }
}

async fn list<R: SettingRepository + 'static>(
    manager: &SettingsManager<R>,
    domain: Option<DomainKind>,
) -> anyhow::Result<()> {
    let records = manager.records().await?;
    let records: Vec<_> = records
        .into_iter()
        .filter(|r| domain.map_or(true, |d| r.key.starts_with(d.prefix())))
        .collect();

    for record in &records {
        let owner = owner_of(&record.key).map_or("-", DomainKind::name);
        println!(
            "{:<32} {:<6} {:<7} {}",
            record.key, record.declared_type, owner, record.raw_value
        );
    }
    println!("{} setting(s)", records.len());
    Ok(())
}

async fn get<R: SettingRepository + 'static>(
    manager: &SettingsManager<R>,
    key: &str,
) -> anyhow::Result<()> {
    let record = manager.record(key).await?;
    println!("key:        {}", record.key);
    println!("type:       {}", record.declared_type);
    println!("updated_at: {}", record.updated_at);
    println!("raw:        {}", record.raw_value);
    println!("decoded:    {}", serde_json::to_string_pretty(&record.decoded())?);
    Ok(())
}

async fn show<D: SettingsDomain, R: SettingRepository + 'static>(
    manager: &SettingsManager<R>,
) -> anyhow::Result<()> {
    let projection = manager.load::<D>().await?;
    println!("{}", serde_json::to_string_pretty(&projection.record)?);

    let report = projection.report;
    if !report.defaulted.is_empty() {
        println!("# defaults (not stored): {}", report.defaulted.join(", "));
    }
    if !report.corrupt.is_empty() {
        println!("# corrupt, using defaults: {}", report.corrupt.join(", "));
    }
    if !report.unknown.is_empty() {
        println!("# ignored keys: {}", report.unknown.join(", "));
    }
    Ok(())
}

async fn set<D: SettingsDomain, R: SettingRepository + 'static>(
    manager: &SettingsManager<R>,
    field: &str,
    raw: String,
) -> anyhow::Result<()> {
    let current = serde_json::to_value(manager.load::<D>().await?.record)?;
    let value = parse_field_value(current.get(field), raw);
    let report = manager.edit_field::<D>(field, value).await?;
    finish(report)
}

async fn reset<D: SettingsDomain, R: SettingRepository + 'static>(
    manager: &SettingsManager<R>,
) -> anyhow::Result<()> {
    let report = manager.reset::<D>().await?;
    finish(report)
}

async fn export<R: SettingRepository + 'static>(
    manager: &SettingsManager<R>,
    path: &Path,
) -> anyhow::Result<()> {
    let snapshot = manager.export().await?;
    snapshot
        .write_to(path)
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;
    println!("Exported {} setting(s) to {}", snapshot.settings.len(), path.display());
    Ok(())
}

async fn import<R: SettingRepository + 'static>(
    manager: &SettingsManager<R>,
    path: &Path,
) -> anyhow::Result<()> {
    let snapshot = SettingsSnapshot::read_from(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let report = manager.import(&snapshot).await?;
    finish(report)
}

/// Text fields take the argument verbatim; everything else is parsed as JSON,
/// falling back to a plain string.
fn parse_field_value(current: Option<&Value>, raw: String) -> Value {
    if let Some(Value::String(_)) = current {
        return Value::String(raw);
    }
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(_) => Value::String(raw),
    }
}

fn write_line(write: &FieldWrite) -> String {
    format!("{:<8} {} ({})", write.mode.as_str(), write.field, write.key)
}

fn finish(report: BatchReport) -> anyhow::Result<()> {
    for write in &report.written {
        println!("{}", write_line(write));
    }
    for failure in &report.failures {
        eprintln!("failed   {} ({}): {}", failure.field, failure.key, failure.error);
    }

    match report.outcome {
        BatchOutcome::Succeeded => {
            println!("Saved {} setting(s)", report.written.len());
            Ok(())
        }
        BatchOutcome::PartiallySucceeded { failed } => {
            bail!("settings partially saved, failed fields: {}", failed.join(", "))
        }
        BatchOutcome::Failed { failed } => {
            bail!("failed to save settings: {}", failed.join(", "))
        }
    }
}
