use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use onenote_import::auth::{AuthProvider, DeviceCodeAuth, DeviceCodePrompt, Token, TokenCache};
use onenote_import::config::{self, Config};
use onenote_import::executor::ExecutorConfig;
use onenote_import::graph::{GraphClient, GraphPageStore, Section};
use onenote_import::models::{ImportOperation, ImportResult, ImportSession};
use onenote_import::naming::NamingStrategy;
use onenote_import::outline::{parse_outline, tree_render, ParsedOutline};
use onenote_import::pages::{self, PageTemplate};
use onenote_import::planner::{parse_selection, plan_import, plan_pages};
use onenote_import::progress::ProgressReport;
use onenote_import::workflow::{ImportWorkflow, RetryDecider, RetryDecision};

#[derive(Parser)]
#[command(name = "onenote-import")]
#[command(about = "Create OneNote pages from course outline files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an outline file and print its tree
    Parse {
        file: PathBuf,
        /// Title naming strategy: numbered, plain or prefixed
        #[arg(short, long)]
        naming: Option<NamingStrategy>,
    },
    /// Show the pages an import would create, without creating them
    Plan {
        file: PathBuf,
        /// Section indices to include, e.g. "1,3". Default: all
        #[arg(short, long, default_value = "")]
        sections: String,
        #[arg(short, long)]
        naming: Option<NamingStrategy>,
    },
    /// Create OneNote pages for an outline
    Import {
        file: PathBuf,
        #[arg(short, long, default_value = "")]
        sections: String,
        #[arg(short, long)]
        naming: Option<NamingStrategy>,
        /// Destination notebook (default: DEFAULT_NOTEBOOK)
        #[arg(long)]
        notebook: Option<String>,
        /// Destination section (default: DEFAULT_SECTION)
        #[arg(long = "section")]
        section: Option<String>,
        /// Skip the confirmation before the first pass
        #[arg(short, long)]
        yes: bool,
    },
    /// Create a flat batch of pages from a title list
    Pages {
        /// Comma-separated page titles
        #[arg(short, long, conflicts_with = "template")]
        titles: Option<String>,
        /// Built-in title list, by name or number (see `templates`)
        #[arg(long)]
        template: Option<PageTemplate>,
        #[arg(long)]
        notebook: Option<String>,
        #[arg(long = "section")]
        section: Option<String>,
        #[arg(short, long)]
        yes: bool,
    },
    /// List the built-in page title templates
    Templates,
    /// List outline files in a directory
    Discover {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// List your notebooks
    Notebooks,
    /// List the sections of a notebook
    Sections { notebook: String },
    /// Sign in interactively and cache the token
    Login,
    /// Remove the cached token
    Logout,
    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

/// Initialize tracing on stderr so stdout only carries command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "onenote_import=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::load();

    match cli.command {
        Commands::Parse { file, naming } => {
            let parsed = read_outline(&file)?;
            print_warnings(&parsed);
            let naming = naming.unwrap_or(config.naming);
            print!("{}", tree_render::render_tree(&parsed.course, naming, None));
        }
        Commands::Plan {
            file,
            sections,
            naming,
        } => {
            let parsed = read_outline(&file)?;
            print_warnings(&parsed);
            let naming = naming.unwrap_or(config.naming);
            let selection = parse_selection(&sections);
            let plan = plan_import(&parsed.course, &selection, naming);
            for warning in &plan.warnings {
                println!("⚠ {}", warning);
            }
            print_selection(&parsed, naming, &selection);
            println!();
            for (i, op) in plan.operations.iter().enumerate() {
                println!("{:>3}. {:<7} {}", i + 1, op.kind.as_str(), op.title);
            }
        }
        Commands::Import {
            file,
            sections,
            naming,
            notebook,
            section,
            yes,
        } => {
            run_import(&config, &file, &sections, naming, notebook, section, yes).await?;
        }
        Commands::Pages {
            titles,
            template,
            notebook,
            section,
            yes,
        } => {
            let titles = match (titles, template) {
                (Some(list), _) => pages::parse_titles(&list),
                (None, Some(template)) => template.title_list(),
                (None, None) => {
                    // Prompts read the same stdin, so they see end of input and decline.
                    eprintln!("Reading page titles from stdin, one per line. Use --yes to skip the confirmation.");
                    pages::read_titles(io::stdin().lock())?
                }
            };
            let plan = plan_pages(&titles, "");
            if plan.is_empty() {
                bail!("No page titles given");
            }
            for title in plan.titles() {
                println!("  - {}", title);
            }
            run_operations(&config, plan.operations, notebook, section, yes).await?;
        }
        Commands::Templates => {
            for (i, template) in PageTemplate::ALL.iter().enumerate() {
                println!(
                    "{}. {} ({}, {} pages)",
                    i + 1,
                    template.name(),
                    template,
                    template.titles().len()
                );
            }
        }
        Commands::Discover { dir } => {
            for path in discover_outlines(&dir, &config.outline_suffix)? {
                println!("{}", path.display());
            }
        }
        Commands::Notebooks => {
            let token = auth_provider(&config)?.get_token(false).await?;
            let client = GraphClient::new(&config.graph_url);
            for notebook in client.list_notebooks(&token).await? {
                println!("{}", notebook.display_name);
            }
        }
        Commands::Sections { notebook } => {
            let token = auth_provider(&config)?.get_token(false).await?;
            let client = GraphClient::new(&config.graph_url);
            let found = client
                .find_notebook_by_name(&token, &notebook)
                .await?
                .with_context(|| format!("Notebook '{}' not found", notebook))?;
            for section in client.list_sections(&token, &found.id).await? {
                println!("{}", section.display_name);
            }
        }
        Commands::Login => {
            auth_provider(&config)?.get_token(true).await?;
            println!("Signed in.");
        }
        Commands::Logout => {
            let cache = TokenCache::open_default()?;
            if cache.clear()? {
                println!("Removed cached token at {}", cache.path().display());
            } else {
                println!("No cached token.");
            }
        }
        Commands::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if save {
                config.save()?;
                println!("Saved to {}", config::get_config_path()?.display());
            }
        }
    }

    Ok(())
}

async fn run_import(
    config: &Config,
    file: &Path,
    sections: &str,
    naming: Option<NamingStrategy>,
    notebook: Option<String>,
    section: Option<String>,
    yes: bool,
) -> anyhow::Result<()> {
    let parsed = read_outline(file)?;
    print_warnings(&parsed);

    let naming = naming.unwrap_or(config.naming);
    let selection = parse_selection(sections);
    let plan = plan_import(&parsed.course, &selection, naming);
    for warning in &plan.warnings {
        println!("⚠ {}", warning);
    }
    if plan.is_empty() {
        bail!("Nothing to import from {}", file.display());
    }

    print_selection(&parsed, naming, &selection);
    run_operations(config, plan.operations, notebook, section, yes).await
}

/// Resolve the destination, confirm, then run the planned operations to the end.
async fn run_operations(
    config: &Config,
    operations: Vec<ImportOperation>,
    notebook: Option<String>,
    section: Option<String>,
    yes: bool,
) -> anyhow::Result<()> {
    let auth = auth_provider(config)?;
    let token = auth.get_token(false).await?;
    let client = GraphClient::new(&config.graph_url);
    let destination = resolve_destination(&client, &token, config, notebook, section).await?;

    println!(
        "\nDestination section: {}\nPages to create: {}",
        destination.display_name,
        operations.len()
    );
    if !yes && !confirm("\nCreate these pages?", true)? {
        println!("Import cancelled.");
        return Ok(());
    }

    let store = GraphPageStore::new(client, destination.id);
    let workflow = ImportWorkflow::with_config(
        &store,
        &auth,
        ExecutorConfig {
            pace: Duration::from_millis(config.pace_ms),
        },
    );

    let mut session = ImportSession::new(operations.len());
    let result = workflow
        .run(&mut session, operations, &mut TerminalDecider)
        .await;

    print_final(&session);
    result?;
    Ok(())
}

async fn resolve_destination(
    client: &GraphClient,
    token: &Token,
    config: &Config,
    notebook: Option<String>,
    section: Option<String>,
) -> anyhow::Result<Section> {
    let notebook_name = notebook
        .or_else(|| config.default_notebook.clone())
        .context("No notebook given. Pass --notebook or set DEFAULT_NOTEBOOK.")?;
    let section_name = section
        .or_else(|| config.default_section.clone())
        .context("No section given. Pass --section or set DEFAULT_SECTION.")?;

    let notebook = client
        .find_notebook_by_name(token, &notebook_name)
        .await?
        .with_context(|| format!("Notebook '{}' not found", notebook_name))?;
    let section = client
        .find_section_by_name(token, &notebook.id, &section_name)
        .await?
        .with_context(|| {
            format!(
                "Section '{}' not found in '{}'",
                section_name, notebook.display_name
            )
        })?;
    Ok(section)
}

fn auth_provider(config: &Config) -> anyhow::Result<DeviceCodeAuth> {
    let client_id = config.require_client_id()?;
    let prompt = Arc::new(|p: &DeviceCodePrompt| match p.message {
        Some(ref message) => println!("\n{}", message),
        None => println!(
            "\nTo sign in, visit {} and enter the code {}",
            p.verification_uri, p.user_code
        ),
    });
    Ok(DeviceCodeAuth::new(
        config.authority(),
        client_id,
        config.scopes(),
        TokenCache::open_default()?,
        prompt,
    ))
}

fn read_outline(file: &Path) -> anyhow::Result<ParsedOutline> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read outline {}", file.display()))?;
    parse_outline(&text).with_context(|| format!("Failed to parse {}", file.display()))
}

/// Print the outline tree with the selected sections marked. An empty selection is everything.
fn print_selection(parsed: &ParsedOutline, naming: NamingStrategy, selection: &[String]) {
    let selected: HashSet<String> = selection.iter().cloned().collect();
    let selected = (!selected.is_empty()).then_some(&selected);
    print!("{}", tree_render::render_tree(&parsed.course, naming, selected));
}

fn print_warnings(parsed: &ParsedOutline) {
    for warning in &parsed.warnings {
        println!("⚠ {}", warning);
    }
}

fn discover_outlines(dir: &Path, suffix: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(suffix));
        if matches && path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

fn print_final(session: &ImportSession) {
    let report = onenote_import::progress::report(session);
    println!("\nImport {}: {}", session.state.as_str(), report);
    if !session.failed().is_empty() {
        println!("Pages not created:");
        for result in session.failed() {
            print_failure(result);
        }
    }
}

fn print_failure(result: &ImportResult) {
    match result.error() {
        Some(e) => println!("  ✗ {} [{}] {}", result.operation.title, e.as_str(), e.detail()),
        None => println!("  ✗ {}", result.operation.title),
    }
}

/// Ask a yes/no question on the terminal. Empty input picks `default`.
fn confirm(question: &str, default: bool) -> io::Result<bool> {
    let hint = if default { "(Y/n)" } else { "(y/N)" };
    print!("{} {}: ", question, hint);
    io::stdout().flush()?;
    read_answer(&mut io::stdin().lock(), default)
}

/// Read one yes/no answer. End of input is a "no", whatever the default.
fn read_answer(input: &mut impl BufRead, default: bool) -> io::Result<bool> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(match line.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}

/// Retry decisions read from the terminal.
struct TerminalDecider;

impl RetryDecider for TerminalDecider {
    fn decide(
        &mut self,
        report: &ProgressReport,
        session: &ImportSession,
        suggest_reauth: bool,
    ) -> RetryDecision {
        println!("\nPass {}: {}", session.passes, report);
        for result in session.failed() {
            print_failure(result);
        }

        let question = format!("Retry {} failed pages?", report.failed_this_pass);
        if !confirm(&question, true).unwrap_or(false) {
            return RetryDecision::Abandon;
        }

        if suggest_reauth {
            println!("Some pages failed because the sign-in expired.");
        }
        if confirm("Sign in again first?", suggest_reauth).unwrap_or(false) {
            RetryDecision::ReauthenticateAndRetry
        } else {
            RetryDecision::Retry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_answer_takes_the_default() {
        assert!(read_answer(&mut "\n".as_bytes(), true).unwrap());
        assert!(!read_answer(&mut "\n".as_bytes(), false).unwrap());
    }

    #[test]
    fn end_of_input_declines() {
        assert!(!read_answer(&mut "".as_bytes(), true).unwrap());
    }

    #[test]
    fn reads_yes_and_no() {
        assert!(read_answer(&mut "YES\n".as_bytes(), false).unwrap());
        assert!(!read_answer(&mut "n\n".as_bytes(), true).unwrap());
    }
}
