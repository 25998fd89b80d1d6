use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Client;
use tracing_subscriber::EnvFilter;

use megasena::reports::{
    render_history_table, render_latest_draw, render_recent_draws, render_summary,
    render_ticket_scores, render_timeline,
};
use megasena::{
    PrizeSummary, RECENT_DRAWS, TicketBook, config, fetch_draw_series, fetch_latest_draw,
    flag_recent_draws, prize_timeline, score_tickets,
};

#[derive(Parser)]
#[command(name = "megasena", about = "Mega-Sena results, prize history and ticket checker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the latest official draw
    Latest,

    /// Summarize estimated prizes over a range of contests
    Summary {
        /// First contest of the range (defaults to the oldest)
        #[arg(long)]
        from: Option<u32>,

        /// Last contest of the range (defaults to the newest)
        #[arg(long)]
        to: Option<u32>,

        /// Also print one row per contest
        #[arg(long)]
        table: bool,

        /// Also print the contest/estimated-prize series, tab separated
        #[arg(long)]
        timeline: bool,
    },

    /// List the most recent draws, marking any equal to the latest draw
    Recent {
        #[arg(short, long, default_value_t = RECENT_DRAWS)]
        limit: usize,
    },

    /// Validate tickets and score them against the latest draw
    Check {
        /// Six numbers separated by commas or spaces, e.g. "4,10,29,33,41,57"
        #[arg(short, long = "ticket", required = true)]
        tickets: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let client = Client::new();

    match cli.command {
        Command::Latest => {
            let draw = fetch_latest_draw(&client, &config.current_draw).await?;
            print!("{}", render_latest_draw(&draw));
        }

        Command::Summary {
            from,
            to,
            table,
            timeline,
        } => {
            let series = fetch_draw_series(&client, &config.history).await?;
            let Some((min, max)) = series.bounds() else {
                println!("⚠ The results sheet has no draws.");
                return Ok(());
            };
            let (lo, hi) = series
                .clamp(from.unwrap_or(min), to.unwrap_or(max))
                .context("series has no bounds")?;
            let records = series.range(lo, hi)?;

            let summary = PrizeSummary::compute(records)?;
            print!("{}", render_summary(&summary, (lo, hi)));
            if table {
                println!();
                print!("{}", render_history_table(records));
            }
            if timeline {
                println!();
                print!("{}", render_timeline(&prize_timeline(records)));
            }
        }

        Command::Recent { limit } => {
            let draw = fetch_latest_draw(&client, &config.current_draw).await?;
            let series = fetch_draw_series(&client, &config.history).await?;
            print!("{}", render_latest_draw(&draw));
            println!();
            print!(
                "{}",
                render_recent_draws(&flag_recent_draws(&series, &draw.drawn_numbers, limit))
            );
        }

        Command::Check { tickets } => {
            let mut book = TicketBook::new();
            for raw in &tickets {
                let fields: Vec<&str> = raw
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|field| !field.is_empty())
                    .collect();
                match book.submit(&fields) {
                    Ok(ticket) => println!("🎟️ Ticket added: {}", ticket),
                    Err(e) => println!("❌ '{}': {}", raw, e),
                }
            }
            if book.is_empty() {
                return Ok(());
            }

            let draw = fetch_latest_draw(&client, &config.current_draw).await?;
            println!();
            print!("{}", render_latest_draw(&draw));
            println!();
            print!(
                "{}",
                render_ticket_scores(&score_tickets(book.tickets(), &draw.drawn_numbers))
            );
        }
    }

    Ok(())
}
