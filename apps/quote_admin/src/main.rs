use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::QuotesClient;
use shared::{
    domain::{EditField, QuoteId},
    protocol::ExportFormat,
};

mod config;
mod controller;
mod render;
mod shell;

use config::{load_settings, normalize_server_url};
use controller::{Notice, QuoteListController};
use shell::TerminalShell;

#[derive(Parser, Debug)]
#[command(about = "Admin console for the quote generator service")]
struct Cli {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    export_dir: Option<PathBuf>,
    /// Answer yes to confirmation prompts.
    #[arg(long, short = 'y')]
    yes: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long)]
        shorts_only: bool,
        #[arg(long)]
        html: bool,
    },
    Delete {
        id: i64,
    },
    Edit {
        id: i64,
        #[arg(long)]
        shorts_only: bool,
        #[arg(long)]
        quote: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        image_prompt: Option<String>,
        #[arg(long)]
        image_style: Option<String>,
        #[arg(long)]
        keywords: Option<String>,
    },
    Export {
        format: ExportFormat,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(server_url) = &cli.server_url {
        settings.server_url = normalize_server_url(server_url);
    }
    if let Some(export_dir) = cli.export_dir {
        settings.export_dir = export_dir;
    }

    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let client = QuotesClient::new(settings.server_url.as_str())
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    let shell = TerminalShell::new(client.clone(), settings.export_dir.clone(), cli.yes);
    let mut controller = QuoteListController::new(client, shell);

    match cli.command {
        Command::List { shorts_only, html } => {
            controller.set_shorts_filter(shorts_only).await;
            if !last_notice_is_error(&controller) {
                let quotes = controller.state().quotes();
                if html {
                    print!("{}", render::render_quotes(quotes));
                } else {
                    print!("{}", render::render_plain(quotes));
                }
            }
        }
        Command::Delete { id } => {
            controller.refresh().await;
            controller.delete_quote(QuoteId(id)).await;
        }
        Command::Edit {
            id,
            shorts_only,
            quote,
            author,
            image_prompt,
            image_style,
            keywords,
        } => {
            controller.set_shorts_filter(shorts_only).await;
            if controller.open_edit_for(QuoteId(id)) {
                let edits = [
                    (EditField::Quote, quote),
                    (EditField::Author, author),
                    (EditField::ImagePrompt, image_prompt),
                    (EditField::ImageStyle, image_style),
                    (EditField::Keywords, keywords),
                ];
                for (field, value) in edits {
                    if let Some(value) = value {
                        controller.edit_field(field, value);
                    }
                }
                controller.save_edit().await;
            }
        }
        Command::Export { format } => controller.download_quotes(format).await,
    }

    if controller
        .shell()
        .last_notice()
        .is_some_and(|notice| notice.is_error())
    {
        std::process::exit(1);
    }
    Ok(())
}

fn last_notice_is_error(controller: &QuoteListController<QuotesClient, TerminalShell>) -> bool {
    controller
        .state()
        .last_notice()
        .is_some_and(Notice::is_error)
}
