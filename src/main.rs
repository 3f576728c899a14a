use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use translation_scan::{config, output, report, scan};

#[derive(Parser)]
#[command(name = "translation-scan")]
#[command(about = "Report content posts that are missing translations")]
#[command(long_about = "\
Report content posts that are missing translations

Every directory holding an index.md is a post. Translations sit next to it
as index.{lang}.md. Posts are checked against the languages listed in the
config file, after skipping archived and out-of-range posts.

Content structure:

  content/
  └── blog/
      └── 2025/
          └── release-notes/
              ├── index.md       # canonical post (default language)
              ├── index.de.md    # German translation
              └── index.fr.md    # French translation

The text report always goes to stdout. Use --output to also write JSON.
Missing translations do not change the exit status.

Run 'translation-scan gen-config' to print a documented config file.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    content: PathBuf,

    /// Config file (YAML, or TOML when the name ends in .toml)
    #[arg(long, default_value = "config.yml", global = true)]
    config: PathBuf,

    /// Also write the report as JSON to this file
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    /// Log skipped posts, findings, and front-matter warnings to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the content directory (default)
    Scan,
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.unwrap_or(Command::Scan) {
        Command::Scan => {
            let scan_config = config::load_config(&cli.config)?;
            let outcome = scan::scan(&cli.content, &scan_config)?;
            let report = report::Report::build(outcome, &scan_config, Utc::now());
            output::print_text_report(&report);
            if let Some(path) = &cli.output {
                report::write_json(&report, path)?;
                eprintln!("JSON report saved to: {}", path.display());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_yaml());
        }
    }

    Ok(())
}

/// Warnings and per-post detail only show up with `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::ERROR };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
