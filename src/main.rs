mod analysis;
mod catalog;
mod chat;
mod config;
mod fixtures;
mod interpreter;
mod knowledge;

use std::io::{self, Write};

use anyhow::Context;
use chat::transcript::render_message;
use chat::{ChatController, ChatMessage, RenderSettings};
use clap::{Parser, Subcommand};
use config::PortalConfig;
use fixtures::{build_fixture_source, SharedFixtureSource};
use knowledge::{KnowledgeMap, SourceKind};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "dedge",
    about = "Dedge, the data portal's chat assistant, answering questions over the portal's data fixtures"
)]
struct Cli {
    /// Messages to send in order; if omitted the CLI opens an interactive chat.
    #[arg(short, long)]
    prompt: Vec<String>,

    /// Fixture root: a directory or an http(s) base URL (overrides DEDGE_FIXTURE_BASE).
    #[arg(long)]
    fixtures: Option<String>,

    /// HTTP timeout for fixture requests, in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print bot replies as JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every accessible dataset with its key fields and suggested insights.
    Datasets,
    /// Show metadata from a restricted source (catalog, apis or reports).
    Sources {
        /// Which source to list.
        kind: String,

        /// Only show entries whose name or category contains this term; also narrows columns.
        #[arg(long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let config = PortalConfig::from_env()
        .context("Failed to read portal configuration")?
        .with_overrides(cli.fixtures.clone(), cli.timeout_ms);
    let source = build_fixture_source(&config).context("Failed to initialize fixture source")?;
    info!(base = %config.fixture_base, "Fixture source ready");

    if let Some(command) = cli.command {
        match command {
            Commands::Datasets => {
                print_datasets();
                return Ok(());
            }
            Commands::Sources { kind, search } => {
                let kind: SourceKind = kind.parse()?;
                run_sources(source, kind, search.as_deref()).await?;
                return Ok(());
            }
        }
    }

    let mut chat = ChatController::new(source, RenderSettings::from(&config))
        .with_on_close(|| println!("Chat closed. Type /open to start a new conversation."));
    chat.open();

    if !cli.prompt.is_empty() {
        for prompt in &cli.prompt {
            run_single(&mut chat, prompt, cli.json).await?;
        }
        return Ok(());
    }

    run_repl(&mut chat, cli.json).await
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}

async fn run_single(chat: &mut ChatController, prompt: &str, json: bool) -> anyhow::Result<()> {
    match chat.send(prompt).await {
        Some(reply) => print_reply(&reply, json),
        None => {
            error!(prompt, "Message was not accepted by the chat session");
            Ok(())
        }
    }
}

fn print_reply(reply: &ChatMessage, json: bool) -> anyhow::Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(reply).context("Failed to serialize chat reply")?;
        println!("{rendered}");
    } else {
        println!("\n{}\n", render_message(reply));
    }
    Ok(())
}

async fn run_repl(chat: &mut ChatController, json: bool) -> anyhow::Result<()> {
    println!("Dedge chat ready. Type '/close' to close the chat, 'exit' to quit.\n");
    if let Some(greeting) = chat.view().and_then(|messages| messages.first()) {
        print_reply(greeting, json)?;
    }
    let stdin = io::stdin();

    loop {
        print!("You > ");
        io::stdout().flush()?;

        let mut buffer = String::new();
        if stdin.read_line(&mut buffer)? == 0 {
            break;
        }
        let trimmed = buffer.trim();

        if trimmed.eq_ignore_ascii_case("exit") {
            info!("User exited CLI");
            break;
        }

        match trimmed {
            "" => continue,
            "/close" => {
                chat.set_open(false);
                continue;
            }
            "/open" => {
                chat.set_open(true);
                if let Some(greeting) = chat.view().and_then(|messages| messages.first()) {
                    print_reply(greeting, json)?;
                }
                continue;
            }
            _ => {}
        }

        if !chat.is_open() {
            println!("Chat is closed. Type /open to start a new conversation.");
            continue;
        }

        run_single(chat, trimmed, json).await?;
    }

    Ok(())
}

fn print_datasets() {
    for dataset in KnowledgeMap::datasets() {
        println!("{} ({})", dataset.label(), dataset.key);
        println!("  {}", dataset.description);
        println!("  Key fields: {}", dataset.key_fields.join(", "));
        for insight in dataset.insights {
            println!("  - {insight}");
        }
        println!();
    }
}

async fn run_sources(
    source: SharedFixtureSource,
    kind: SourceKind,
    search: Option<&str>,
) -> anyhow::Result<()> {
    let restricted = KnowledgeMap::restricted(kind);
    println!("{}\n", restricted.description);

    let term = search.unwrap_or_default();
    let items = catalog::filter_items(catalog::load_items(source.as_ref(), kind).await?, term);
    if items.is_empty() {
        match search {
            Some(term) => println!("No {kind} entries match '{term}'."),
            None => println!("No {kind} entries found."),
        }
        return Ok(());
    }

    for (category, items) in catalog::by_category(items) {
        println!("{category}");
        for item in items {
            let updated = item
                .last_updated
                .as_deref()
                .map(|date| format!(" (updated {date})"))
                .unwrap_or_default();
            let id = item.id_text().map(|id| format!(" [{id}]")).unwrap_or_default();
            let size = item
                .size
                .as_deref()
                .map(|size| format!(", {size}"))
                .unwrap_or_default();
            println!("  • {}{}{}{}", item.name, id, updated, size);
            if let Some(description) = item.description.as_deref() {
                println!("    {description}");
            }
            if !item.columns.is_empty() {
                let columns: Vec<String> = item
                    .matching_columns(term)
                    .into_iter()
                    .map(|column| match column.kind.as_deref() {
                        Some(kind) => format!("{} ({kind})", column.name),
                        None => column.name.clone(),
                    })
                    .collect();
                println!("    Columns: {}", columns.join(", "));
            }
        }
    }

    Ok(())
}
