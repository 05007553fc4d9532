use calendar_summary::components::report::scheduler::run_monthly_scheduler;
use calendar_summary::components::report::{DocumentTarget, GeneratedDocument, WindowSource};
use calendar_summary::error::Error;
use calendar_summary::utils::time::explicit_window;
use calendar_summary::{shutdown, startup};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::info;

#[derive(Parser)]
#[command(name = "calendar-summary")]
#[command(about = "Summarize last month's calendar events into a spreadsheet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a summary document
    Generate {
        /// Window start (YYYY-MM-DD), defaults to last month
        #[arg(long, requires = "end")]
        start: Option<String>,

        /// Window end, exclusive (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<String>,
    },
    /// Deliver an open event for a generated document
    Open {
        document_id: String,
    },
    /// Install the monthly trigger and run it until interrupted
    Daemon,
    /// List generated documents and their replay trigger status
    List,
}

fn print_document(document: &GeneratedDocument) {
    println!("{} ({})", document.name, document.id);
    for sheet in &document.calendar_sheets {
        println!("  {}", sheet.title);
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;

    let cli = Cli::parse();
    let config = startup::load_config()?;
    let generator = startup::build_generator(Arc::clone(&config))?;

    match cli.command {
        Commands::Generate { start, end } => {
            let now = Utc::now();
            let document = match (start, end) {
                (Some(start), Some(end)) => {
                    let window = explicit_window(&start, &end, &config.timezone)?;
                    generator
                        .generate_for_window(&window, &DocumentTarget::NewDocument, now)
                        .await?
                }
                _ => generator.generate(now).await?,
            };
            print_document(&document);
        }
        Commands::Open { document_id } => {
            match generator.dispatch_open(&document_id, Utc::now()).await? {
                Some(outcome) => {
                    let source = match outcome.source {
                        WindowSource::Persisted => "stored",
                        WindowSource::Recomputed => "recomputed",
                    };
                    println!("Regenerated for {} window {}", source, outcome.window);
                    print_document(&outcome.document);
                }
                None => {
                    return Err(Error::Trigger(format!(
                        "Document {} has no replay trigger",
                        document_id
                    ))
                    .into())
                }
            }
        }
        Commands::Daemon => {
            let schedule = generator.install_schedule().await?;

            let (shutdown_send, shutdown_recv) = oneshot::channel();
            tokio::spawn(shutdown::handle_signals(shutdown_send));

            info!("Starting monthly scheduler");
            run_monthly_scheduler(Arc::new(generator), schedule, shutdown_recv).await;
        }
        Commands::List => {
            for status in generator.inventory().await? {
                let marker = if status.has_replay_trigger { "*" } else { " " };
                println!("{} {} ({})", marker, status.file.name, status.file.id);
            }
        }
    }

    Ok(())
}
