use chrono::{DateTime, FixedOffset, Utc};
use clap::ValueEnum;
use console::style;

use reposcout::VisitedRepositoryModel;
use reposcout::visited;

use super::parse_repo_arg;
use crate::HistoryAction;

/// Output format for result listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// One visited repository for display.
#[derive(Debug, Clone, serde::Serialize, tabled::Tabled)]
pub(crate) struct HistoryRow {
    #[tabled(rename = "Repository")]
    pub full_name: String,
    #[tabled(rename = "Stars")]
    pub stars: String,
    #[tabled(rename = "Language")]
    pub language: String,
    #[tabled(rename = "Visits")]
    pub visit_count: i32,
    #[tabled(rename = "Last Visited")]
    pub last_visited: String,
    #[tabled(skip)]
    pub html_url: String,
    #[tabled(skip)]
    pub visited_at: DateTime<FixedOffset>,
}

impl HistoryRow {
    pub(crate) fn from_model(model: VisitedRepositoryModel, now: DateTime<Utc>) -> Self {
        let age = now.signed_duration_since(model.visited_at);
        Self {
            last_visited: format_ago(age),
            stars: model
                .stars
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            language: model.language.unwrap_or_else(|| "-".to_string()),
            visit_count: model.visit_count,
            visited_at: model.visited_at,
            html_url: model.html_url,
            full_name: model.full_name,
        }
    }

    pub(crate) fn print_many(items: Vec<Self>, format: OutputFormat) -> serde_json::Result<()> {
        match format {
            OutputFormat::Table => {
                let mut table = tabled::Table::new(items);
                table.with(tabled::settings::Style::rounded());
                println!("{}", table);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&items)?);
            }
        }
        Ok(())
    }
}

/// Handle the history command.
pub(crate) async fn handle_history(
    action: Option<HistoryAction>,
    limit: u64,
    output: OutputFormat,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = reposcout::connect_and_migrate(database_url).await?;

    match action {
        Some(HistoryAction::Clear) => {
            let removed = visited::clear(&db).await?;
            println!(
                "{} Forgot {} visited repositor{}",
                style("✓").green().bold(),
                removed,
                if removed == 1 { "y" } else { "ies" }
            );
        }
        Some(HistoryAction::Forget { repo }) => {
            let (owner, name) = parse_repo_arg(&repo)?;
            let full_name = format!("{}/{}", owner, name);
            match visited::find_by_full_name(&db, &full_name).await? {
                Some(model) => {
                    visited::delete(&db, model.id).await?;
                    println!("{} Forgot {}", style("✓").green().bold(), model.full_name);
                }
                None => {
                    return Err(format!("{} is not in the visit history", full_name).into());
                }
            }
        }
        None => {
            let models = visited::find_recent(&db, limit).await?;
            if models.is_empty() && output == OutputFormat::Table {
                println!("No visited repositories yet.");
                return Ok(());
            }

            let now = Utc::now();
            let rows = models
                .into_iter()
                .map(|m| HistoryRow::from_model(m, now))
                .collect();
            HistoryRow::print_many(rows, output)?;
        }
    }

    Ok(())
}

/// Render an elapsed duration as a coarse "ago" label.
fn format_ago(duration: chrono::Duration) -> String {
    let total_secs = duration.num_seconds().max(0);
    if total_secs < 60 {
        "just now".to_string()
    } else if total_secs < 3600 {
        format!("{}m ago", total_secs / 60)
    } else if total_secs < 86_400 {
        format!("{}h ago", total_secs / 3600)
    } else {
        format!("{}d ago", total_secs / 86_400)
    }
}
