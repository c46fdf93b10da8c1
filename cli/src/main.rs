//! manualdoc CLI - change-manual template tool
//!
//! Reads DOCX change manuals into JSON and fills edited sections back in.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use manualdoc::render::{sections_from_json, to_json, to_text, JsonFormat};
use manualdoc::{EditSession, ManualExtract, RepoStatus, WriteOptions, WriteOutcome};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Change-manual template extraction and filling
#[derive(Parser)]
#[command(
    name = "manualdoc",
    author = "iyulab",
    version,
    about = "Read and fill DOCX change-manual templates",
    long_about = "manualdoc - change-manual template tool.\n\n\
                  Extracts the general information, yes/no answers, countries and pieces\n\
                  tables of a DOCX manual, and writes edited values back into the template."
)]
struct Cli {
    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump the parse result as JSON
    Json {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Render the parse result as plain text
    Text {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a summary of the manual
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// List the pieces of a manual
    Pieces {
        /// Input file path
        input: PathBuf,

        /// JSON file with repository changes to merge in
        #[arg(short, long)]
        changes: Option<PathBuf>,

        /// Output JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Fill a template with sections from JSON
    Fill {
        /// Template file path
        template: PathBuf,

        /// Sections JSON (a section array or a `json` dump)
        sections: PathBuf,

        /// Output file or directory
        #[arg(short, long, default_value = manualdoc::DEFAULT_EXPORT_NAME)]
        output: PathBuf,

        /// Rewrite cells that already hold the value
        #[arg(long)]
        always_write: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Json {
            input,
            output,
            compact,
        } => {
            let pb = create_spinner("Parsing manual...");

            let extract = manualdoc::parse_file(&input)?;
            pb.set_message("Rendering to JSON...");

            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let json = to_json(&extract, format)?;

            pb.finish_and_clear();
            write_output(output.as_ref(), &json)?;

            if let Some(path) = output {
                println!("{} Converted to JSON: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Text { input, output } => {
            let pb = create_spinner("Parsing manual...");
            let extract = manualdoc::parse_file(&input)?;
            pb.finish_and_clear();

            write_output(output.as_ref(), &to_text(&extract))?;

            if let Some(path) = output {
                println!("{} Converted to text: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing manual...");
            let extract = manualdoc::parse_file(&input)?;
            pb.finish_and_clear();

            print_info(&input, &extract);
        }

        Commands::Pieces {
            input,
            changes,
            json,
        } => {
            let pb = create_spinner("Detecting pieces...");

            let mut session = EditSession::new();
            session.open_file(&input)?;

            if let Some(path) = changes {
                let statuses: Vec<RepoStatus> = serde_json::from_str(&fs::read_to_string(path)?)?;
                session.add_repository_changes(&statuses);
            }

            pb.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(session.pieces())?);
            } else if session.pieces().is_empty() {
                println!("{} No pieces found in manual", "!".yellow().bold());
            } else {
                let view = ManualExtract {
                    piezas_detalladas: session.pieces().to_vec(),
                    ..Default::default()
                };
                println!("{}", to_text(&view));
            }
        }

        Commands::Fill {
            template,
            sections,
            output,
            always_write,
        } => {
            let pb = create_spinner("Loading template...");

            let mut options = WriteOptions::new();
            if always_write {
                options = options.always_write();
            }
            let mut session = EditSession::new().with_write_options(options);
            session.open_file(&template)?;

            pb.set_message("Filling template...");
            *session.sections_mut() = sections_from_json(&fs::read_to_string(&sections)?)?;
            let (path, report) = session.export_to(&output)?;

            pb.finish_and_clear();

            println!(
                "{} Filled template: {} ({} written, {} unchanged)",
                "✓".green().bold(),
                path.display(),
                report.count(WriteOutcome::Written),
                report.count(WriteOutcome::Unchanged)
            );
            for key in report.missing() {
                println!("{} No place in template for field: {}", "!".yellow().bold(), key);
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_info(input: &std::path::Path, extract: &ManualExtract) {
    println!("{}", "Manual Information".cyan().bold());
    println!("{}", "─".repeat(40));
    println!(
        "{}: {}",
        "File".bold(),
        input.file_name().unwrap_or_default().to_string_lossy()
    );

    if let Some(info) = extract.info_general() {
        for field in &info.fields {
            println!("{}: {}", field.label.bold(), field.value.as_text());
        }
    } else {
        println!("{} No general information block found", "!".yellow().bold());
    }

    println!("\n{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40));
    println!("{}: {}", "Sections".bold(), extract.secciones_reconocidas.len());
    println!("{}: {}", "Piece groups".bold(), extract.piezas_detalladas.len());
    println!("{}: {}", "Pieces".bold(), extract.piece_count());
    println!("{}: {}", "Detected fields".bold(), extract.campos_detectados.len());
    println!("{}: {}", "Tables".bold(), extract.raw.tables.len());
}

fn print_version() {
    println!("{} {}", "manualdoc".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Change-manual template extraction and filling");
    println!();
    println!("Supported formats: DOCX, DOCM, DOTX");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
