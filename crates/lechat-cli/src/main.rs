//! lechat CLI — chat with Mistral's Le Chat from the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use lechat_api::ChatClient;
use lechat_config::{CliOverrides, Config};
use lechat_types::ModelId;
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(
    name = "lechat",
    version,
    about = "Chat with Mistral's Le Chat from the terminal"
)]
struct Cli {
    /// Send a single prompt and print the response (omit for a REPL)
    prompt: Option<String>,

    /// Send the prompt through the web-search mode
    #[arg(long)]
    search: bool,

    /// Model to use for plain chat
    #[arg(long)]
    model: Option<String>,

    /// Session cookie (overrides LECHAT_COOKIE and the config file)
    #[arg(long)]
    cookie: Option<String>,

    /// Chat id (overrides LECHAT_CHAT_ID and the config file)
    #[arg(long)]
    chat_id: Option<String>,

    /// Print only the final response instead of echoing fragments
    #[arg(long)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::load(CliOverrides {
        cookie: cli.cookie,
        chat_id: cli.chat_id,
        model: cli.model,
    })
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    let model = match &config.model {
        Some(name) => name.parse::<ModelId>()?,
        None => ModelId::default(),
    };
    tracing::debug!("Using model {model} on chat {}", config.chat_id);

    let mut client =
        ChatClient::new(&config.cookie, &config.chat_id).context("Failed to create client")?;
    if !cli.quiet {
        client = client.with_fragment_sink(|fragment| {
            let mut out = io::stdout().lock();
            let _ = write!(out, "{fragment}");
            let _ = out.flush();
        });
    }

    if let Some(prompt) = cli.prompt {
        // Print mode: single prompt, then exit
        let response = if cli.search {
            client.web_search(&prompt).await?
        } else {
            client.chat(&prompt, model).await?
        };
        if cli.quiet {
            println!("{response}");
        } else {
            println!();
        }
        return Ok(());
    }

    repl(&client, model, cli.quiet).await
}

async fn repl(client: &ChatClient, model: ModelId, quiet: bool) -> Result<()> {
    eprintln!(
        "lechat v{} (model: {})",
        env!("CARGO_PKG_VERSION"),
        model
    );
    eprintln!("Type your message. Press Ctrl+D to exit.\n");

    let stdin = io::stdin();
    loop {
        eprint!("> ");
        io::stderr().flush()?;

        let mut input = String::new();
        let bytes_read = stdin.lock().read_line(&mut input)?;
        if bytes_read == 0 {
            eprintln!();
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" => break,
            "/help" => {
                print_help();
                continue;
            }
            "/model" => {
                eprintln!("Current model: {model}");
                eprintln!(
                    "Available: {}",
                    ModelId::ALL.map(|m| m.as_str()).join(", ")
                );
                continue;
            }
            _ => {}
        }

        let result = match input.strip_prefix("/search ") {
            Some(query) => client.web_search(query.trim()).await,
            None => client.chat(input, model).await,
        };

        match result {
            Ok(response) => {
                if quiet {
                    println!("{response}");
                } else {
                    println!();
                }
            }
            Err(e) => eprintln!("\nError: {e}"),
        }
        println!();
    }

    Ok(())
}

fn print_help() {
    eprintln!("Available commands:");
    eprintln!("  /help        — Show this help");
    eprintln!("  /model       — Show current model");
    eprintln!("  /search <q>  — Send <q> through the web-search mode");
    eprintln!("  /quit        — Exit");
}
