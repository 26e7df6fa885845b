use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use expense_report::cli::{
    handle_auth, handle_config, handle_generate, handle_init, handle_summary, ReportArgs,
};
use expense_report::config::paths::BASE_DIR_ENV;
use expense_report::config::{ReportPaths, Settings};

#[derive(Parser)]
#[command(
    name = "expense-report",
    version,
    about = "Monthly expenses report from a spreadsheet",
    long_about = "Reads one month of expenses from a spreadsheet, totals them by \
                  category and by date, and writes a PDF report with charts and tables."
)]
struct Cli {
    /// Directory holding settings, credentials and generated files
    #[arg(long, global = true, env = BASE_DIR_ENV)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the PDF report (default)
    Generate {
        #[command(flatten)]
        args: ReportArgs,

        /// Also export the totals to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Print the totals without writing any file
    Summary {
        #[command(flatten)]
        args: ReportArgs,
    },

    /// Authorize access to the spreadsheet and store the token
    Auth,

    /// Write the default settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let paths = match cli.dir {
        Some(dir) => ReportPaths::with_base_dir(dir),
        None => ReportPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Generate { args, csv }) => {
            handle_generate(&paths, &settings, args, csv)?;
        }
        Some(Commands::Summary { args }) => handle_summary(&paths, &settings, args)?,
        Some(Commands::Auth) => handle_auth(&paths)?,
        Some(Commands::Init) => handle_init(&paths, &settings)?,
        Some(Commands::Config) => handle_config(&paths, &settings)?,
        None => {
            handle_generate(&paths, &settings, ReportArgs::default(), None)?;
        }
    }

    Ok(())
}
