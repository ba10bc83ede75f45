//! The search command.
//!
//! On a terminal the results are browsed a page at a time: Enter loads the
//! next page, a result number opens that repository and records the visit.
//! Otherwise (or with `--output`) the requested number of pages is fetched
//! and printed once.

use std::sync::Arc;

use console::{Term, style};
use tokio::runtime::Handle;

use reposcout::search::{SearchSort, SearchSession};
use reposcout::{AuthSession, GitHubClient, NetworkStatus, SearchError, SearchItem, visited};
use sea_orm::DatabaseConnection;

use super::history::OutputFormat;
use super::{github_client, open_in_browser};
use crate::config::Config;
use crate::progress::ProgressReporter;
use crate::shutdown::is_shutdown_requested;

const DESCRIPTION_WIDTH: usize = 96;

/// Options for a search, resolved from CLI flags.
#[derive(Debug)]
pub(crate) struct SearchOptions {
    pub query: String,
    pub pages: u32,
    pub per_page: Option<u32>,
    pub sort: Option<SearchSort>,
    pub output: Option<OutputFormat>,
}

/// One search result for table display.
#[derive(Debug, Clone, serde::Serialize, tabled::Tabled)]
pub(crate) struct ResultRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Repository")]
    pub full_name: String,
    #[tabled(rename = "Stars")]
    pub stars: String,
    #[tabled(rename = "Language")]
    pub language: String,
    #[tabled(rename = "Visited")]
    pub visited: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

impl ResultRow {
    fn new(index: usize, item: &SearchItem) -> Self {
        Self {
            index: index + 1,
            full_name: item.full_name.clone(),
            stars: item
                .stars
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            language: item.language.clone().unwrap_or_else(|| "-".to_string()),
            visited: if item.visited { "✓" } else { "" }.to_string(),
            description: item
                .description
                .as_deref()
                .map(|d| truncate(d, DESCRIPTION_WIDTH))
                .unwrap_or_default(),
        }
    }
}

/// What the reader asked for at the interactive prompt.
#[derive(Debug, PartialEq, Eq)]
enum Choice {
    More,
    /// Zero-based index of the result to open.
    Open(usize),
    Quit,
    Invalid,
}

fn parse_choice(input: &str, shown: usize) -> Choice {
    match input.trim().to_ascii_lowercase().as_str() {
        "" | "m" | "more" | "n" => Choice::More,
        "q" | "quit" | "exit" => Choice::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if (1..=shown).contains(&n) => Choice::Open(n - 1),
            _ => Choice::Invalid,
        },
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

fn format_item(index: usize, item: &SearchItem) -> String {
    let name = if item.visited {
        style(item.full_name.as_str()).dim().to_string()
    } else {
        style(item.full_name.as_str()).cyan().bold().to_string()
    };
    let marker = if item.visited {
        style("✓").green().to_string()
    } else {
        " ".to_string()
    };

    let mut line = format!("{:>4}. {} {}", index + 1, marker, name);
    if let Some(stars) = item.stars {
        line.push_str(&format!(" {}", style(format!("★ {}", stars)).yellow()));
    }
    if let Some(language) = &item.language {
        line.push_str(&format!(" {}", style(format!("[{}]", language)).magenta()));
    }
    if let Some(description) = &item.description {
        line.push_str(&format!(
            "\n        {}",
            style(truncate(description, DESCRIPTION_WIDTH)).dim()
        ));
    }
    line
}

/// Handle the search command.
pub(crate) async fn handle_search(
    options: SearchOptions,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let interactive = Term::stdout().is_term() && options.output.is_none();

    let client = github_client(config)?;
    let auth = AuthSession::new();
    auth.restore(&client).await?;
    if interactive {
        println!("{}", auth.welcome_message());
    }

    let db = reposcout::connect_and_migrate(database_url).await?;
    let session = SearchSession::new(Arc::new(client), auth, Handle::current())
        .with_list_config(config.list_config(options.per_page))
        .with_sort(options.sort.or(config.search.sort))
        .with_visited_ids(visited::visited_ids(&db).await?);

    if interactive {
        browse(session, &options.query, &db).await
    } else {
        print_pages(session, &options).await
    }
}

/// Wait for the page in flight and report how it went.
async fn load_next_page(
    session: &mut SearchSession<GitHubClient>,
    reporter: &ProgressReporter,
    query: &str,
) -> bool {
    reporter.status(query, &session.network_state());

    let Some(list) = session.list_mut() else {
        return false;
    };
    let before = list.len();
    let appended = list.next_response().await;
    if appended {
        reporter.page_loaded(list.pages_loaded(), list.len() - before, list.len());
    }

    reporter.status(query, &session.network_state());
    appended
}

async fn print_pages(
    mut session: SearchSession<GitHubClient>,
    options: &SearchOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let reporter = ProgressReporter::new();
    session.set_query(&options.query)?;
    load_next_page(&mut session, &reporter, &options.query).await;

    while !is_shutdown_requested() {
        let Some(list) = session.list_mut() else {
            break;
        };
        if list.pages_loaded() >= options.pages as usize || !list.load_more() {
            break;
        }
        load_next_page(&mut session, &reporter, &options.query).await;
    }
    reporter.finish();

    let state = session.network_state();
    if state.status == NetworkStatus::Error {
        return Err(state
            .message
            .unwrap_or_else(|| "Search failed".to_string())
            .into());
    }

    let items = session.list().map(|l| l.items()).unwrap_or_default();
    match options.output.unwrap_or_default() {
        OutputFormat::Table => {
            if items.is_empty() {
                return Ok(());
            }
            let rows: Vec<ResultRow> = items
                .iter()
                .enumerate()
                .map(|(i, item)| ResultRow::new(i, item))
                .collect();
            let mut table = tabled::Table::new(rows);
            table.with(tabled::settings::Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
    }

    Ok(())
}

async fn browse(
    mut session: SearchSession<GitHubClient>,
    query: &str,
    db: &DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let term = Term::stdout();
    let reporter = ProgressReporter::new();

    session.set_query(query)?;
    load_next_page(&mut session, &reporter, query).await;

    let mut shown = 0;
    while !is_shutdown_requested() {
        let Some(list) = session.list() else {
            break;
        };
        if list.is_empty() {
            break;
        }

        for (index, item) in list.items().iter().enumerate().skip(shown) {
            println!("{}", format_item(index, item));
        }
        shown = list.len();

        let has_more = list.next_key().is_some();
        let prompt = if has_more {
            format!("\n[Enter] more  [1-{}] open  [q] quit: ", shown)
        } else {
            format!("\nEnd of results. [1-{}] open  [q] quit: ", shown)
        };
        term.write_str(&style(prompt).bold().to_string())?;
        let input = term.read_line()?;

        match parse_choice(&input, shown) {
            Choice::More => {
                let requested = session.list_mut().is_some_and(|l| l.load_more());
                if requested {
                    load_next_page(&mut session, &reporter, query).await;
                } else {
                    println!("No more results.");
                }
            }
            Choice::Open(index) => match session.visit(index, db).await {
                Ok(item) => {
                    println!(
                        "{} Opening {}",
                        style("✓").green().bold(),
                        style(&item.full_name).cyan()
                    );
                    open_in_browser(&item.html_url, true);
                    // Redraw so the visited marker shows.
                    shown = 0;
                }
                Err(SearchError::NoSuchItem(_)) => println!("No result with that number."),
                Err(e) => return Err(e.into()),
            },
            Choice::Quit => break,
            Choice::Invalid => println!("Press Enter, type a result number, or q."),
        }
    }

    reporter.finish();
    Ok(())
}
