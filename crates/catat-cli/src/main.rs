//! Catat CLI - Record money by chatting
//!
//! Usage:
//!   catat parse "bayar makan 50rb"    Interpret one message
//!   catat chat                        Interactive session
//!   catat date --days-ago 1           Resolve a relative date
//!   catat serve --port 3000           Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let model = cli.model.as_deref();

    match cli.command {
        Commands::Parse { text, today, json } => {
            let interpreter = commands::build_interpreter(model);
            commands::cmd_parse(&interpreter, &text, commands::today_or_local(today), json).await
        }
        Commands::Chat { today } => {
            let interpreter = commands::build_interpreter(model);
            commands::cmd_chat(&interpreter, commands::today_or_local(today)).await
        }
        Commands::Date {
            days_ago,
            day_of_month,
            today,
        } => commands::cmd_date(days_ago, day_of_month, commands::today_or_local(today)),
        Commands::Summary {
            file,
            period,
            advise,
            today,
        } => {
            let interpreter = commands::build_interpreter(model);
            commands::cmd_summary(
                &interpreter,
                &file,
                period,
                advise,
                commands::today_or_local(today),
            )
            .await
        }
        Commands::Status => commands::cmd_status(&commands::build_interpreter(model)).await,
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
        Commands::Serve { port, host } => {
            commands::cmd_serve(commands::build_interpreter(model), &host, port).await
        }
    }
}
