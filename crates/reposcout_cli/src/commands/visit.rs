use console::{Term, style};

use reposcout::github::to_search_item;
use reposcout::visited;

use super::{github_client, open_in_browser, parse_repo_arg};
use crate::config::Config;

/// Handle the visit command: look the repository up, record it, open it.
pub(crate) async fn handle_visit(
    repo: &str,
    open: bool,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let is_tty = Term::stdout().is_term();
    let (owner, name) = parse_repo_arg(repo)?;

    let client = github_client(config)?;
    let github_repo = client.get_repository(owner, name).await?;
    let mut item = to_search_item(&github_repo);
    item.mark_visited();

    let db = reposcout::connect_and_migrate(database_url).await?;
    let model = visited::save(&db, &item).await?;

    if is_tty {
        println!(
            "{} {} (visit #{})",
            style("✓").green().bold(),
            style(&model.full_name).cyan(),
            model.visit_count
        );
        if let Some(description) = &model.description {
            println!("  {}", style(description).dim());
        }
    } else {
        tracing::info!(
            repo = %model.full_name,
            visit_count = model.visit_count,
            "Recorded visit"
        );
    }

    if open {
        open_in_browser(&model.html_url, is_tty);
    }

    Ok(())
}
