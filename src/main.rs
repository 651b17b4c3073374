use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use reco_chat::category::Category;
use reco_chat::chat::render::{render_card, render_message};
use reco_chat::chat::{technical_difficulties, ChatSession};
use reco_chat::config::Config;
use reco_chat::credentials::Credentials;
use reco_chat::instrumentation::{RequestLog, RequestLogger};
use reco_chat::llm::{KeyCheck, LlmClient};
use reco_chat::recommend::{Recommender, ReplySource};
use reco_chat::storage::JsonFileStore;
use reco_chat::watchlist::{SaveOutcome, Watchlist};

#[derive(Parser)]
#[command(name = "reco-chat", about = "One anime, movie or web-series recommendation at a time")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print source and latency of each request
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask for a single recommendation
    Recommend {
        /// anime, movies or web-series
        category: String,
        /// What you are in the mood for
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,
        /// Save the recommended title to the watchlist
        #[arg(long)]
        save: bool,
    },
    /// Start an interactive recommendation chat
    Chat {
        /// anime, movies or web-series
        category: String,
    },
    /// Manage saved titles
    Watchlist {
        #[command(subcommand)]
        action: WatchlistCommand,
    },
    /// Validate an API key and store it for later runs
    SetupKey { key: String },
    /// Validate an API key (defaults to the configured one)
    CheckKey { key: Option<String> },
    /// Forget the stored API key
    ClearKey,
}

#[derive(Subcommand)]
enum WatchlistCommand {
    /// Show saved titles
    List {
        /// Only show titles containing this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a title by hand
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Remove the title at a 1-based position
    Remove { position: usize },
}

/// Client for commands that talk to the API. The stored key is read only
/// when the environment has none.
fn client_for(config: &Config, store: &JsonFileStore) -> LlmClient {
    let config = config
        .clone()
        .with_credentials(&Credentials::new(store.clone()));
    LlmClient::new(
        config.llm_api_key.as_deref(),
        &config.llm_base_url,
        &config.recommend_model,
    )
}

fn print_outcome(title: &str, outcome: &SaveOutcome) {
    match outcome {
        SaveOutcome::Added => println!("Added \"{}\" to your watchlist!", title),
        SaveOutcome::AlreadyPresent => println!("\"{}\" is already in your watchlist!", title),
    }
}

fn print_watchlist(watchlist: &Watchlist<JsonFileStore>, search: Option<&str>) -> Result<()> {
    let items = watchlist.items()?;
    if items.is_empty() {
        println!("Your watchlist is empty");
        println!("Add some shows, movies, or anime to get started!");
        return Ok(());
    }

    let matches = watchlist.search(search.unwrap_or(""))?;
    if matches.is_empty() {
        println!("No items found");
        println!("Try adjusting your search terms.");
        return Ok(());
    }

    for (index, title) in matches {
        println!("{:>3}. {}", index + 1, title);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let store = JsonFileStore::new(&config.store_path);

    match cli.command {
        Commands::Recommend {
            category,
            input,
            save,
        } => {
            let category = Category::resolve(&category);
            let input = input.join(" ");
            let logger = RequestLogger::new(&config.log_dir)?;
            let recommender = Recommender::new(client_for(&config, &store)).with_logger(logger);

            let reply = match recommender.recommend(category, &input).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::error!(error = %e, "error getting recommendation");
                    println!("{}", technical_difficulties(category));
                    return Ok(());
                }
            };

            if cli.verbose {
                eprintln!("{}", RequestLog::new(category, &input, &reply).summary());
            }

            match reply.recommendation() {
                Some(rec) => {
                    println!("{}", render_card(&rec));
                    if reply.source == ReplySource::Fallback {
                        println!("(curated recommendation)");
                    }
                    if save {
                        let outcome = Watchlist::new(store).save(&rec.title)?;
                        print_outcome(&rec.title, &outcome);
                    }
                }
                None => {
                    println!("{}", reply.text);
                    if save {
                        eprintln!("Reply has no structured title; nothing saved.");
                    }
                }
            }
        }
        Commands::Chat { category } => {
            let category = Category::resolve(&category);
            let logger = RequestLogger::new(&config.log_dir)?;
            let recommender = Recommender::new(client_for(&config, &store)).with_logger(logger);
            let mut session = ChatSession::new(category, recommender, Watchlist::new(store));

            println!("=== {} ===", session.category().title());
            println!("{}", render_message(&session.messages()[0]));
            println!("Try one of these:");
            for example in session.examples() {
                println!("  - {}", example);
            }
            println!("Commands: /save /watchlist /examples /quit\n");

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await.context("Failed to read input")? {
                let line = line.trim();
                match line {
                    "" => continue,
                    "/quit" | "/exit" => break,
                    "/examples" => {
                        for example in session.examples() {
                            println!("  - {}", example);
                        }
                    }
                    "/watchlist" => {
                        for (index, title) in session.watchlist().items()?.iter().enumerate() {
                            println!("{:>3}. {}", index + 1, title);
                        }
                    }
                    "/save" => match session.save_last()? {
                        Some((title, outcome)) => print_outcome(&title, &outcome),
                        None => println!("Nothing to save yet."),
                    },
                    input => {
                        eprintln!("thinking...");
                        let start = std::time::Instant::now();
                        if let Some(answer) = session.submit(input).await {
                            if cli.verbose {
                                eprintln!(
                                    "[{:?}] {}ms",
                                    answer.source,
                                    start.elapsed().as_millis()
                                );
                            }
                            println!("{}", render_message(answer));
                        }
                    }
                }
            }
        }
        Commands::Watchlist { action } => {
            let mut watchlist = Watchlist::new(store);
            match action {
                WatchlistCommand::List { search } => {
                    print_watchlist(&watchlist, search.as_deref())?;
                }
                WatchlistCommand::Add { title } => {
                    let title = title.join(" ");
                    match watchlist.add_manual(&title)? {
                        Some(outcome) => print_outcome(title.trim(), &outcome),
                        None => println!("Nothing to add."),
                    }
                }
                WatchlistCommand::Remove { position } => {
                    if position == 0 {
                        anyhow::bail!("Positions start at 1");
                    }
                    let removed = watchlist.remove(position - 1)?;
                    println!("Removed \"{}\" from your watchlist.", removed);
                }
            }
        }
        Commands::SetupKey { key } => {
            let llm = LlmClient::new(None, &config.llm_base_url, &config.recommend_model);
            match llm.validate_key(&key).await? {
                KeyCheck::Valid => {
                    Credentials::new(store).set(&key)?;
                    println!("API key is valid and has been saved.");
                }
                KeyCheck::Invalid => anyhow::bail!("Invalid API key"),
                KeyCheck::Missing => anyhow::bail!("API key is required"),
            }
        }
        Commands::CheckKey { key } => {
            let key = match key {
                Some(key) => key,
                None => config
                    .clone()
                    .with_credentials(&Credentials::new(store))
                    .llm_api_key
                    .unwrap_or_default(),
            };
            let llm = LlmClient::new(None, &config.llm_base_url, &config.recommend_model);
            match llm.validate_key(&key).await? {
                KeyCheck::Valid => println!("API key is valid."),
                KeyCheck::Invalid => anyhow::bail!("Invalid API key"),
                KeyCheck::Missing => anyhow::bail!("API key is required"),
            }
        }
        Commands::ClearKey => {
            if Credentials::new(store).clear()? {
                println!("Stored API key removed.");
            } else {
                println!("No stored API key.");
            }
        }
    }

    Ok(())
}
