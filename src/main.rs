mod config;
mod core;
mod google;
mod shared;

use crate::core::cal2grid::Cal2Grid;
use chrono::NaiveDate;
use clap::Parser;

const APP_VERSION: &str = concat!(
    env!("CARGO_PKG_NAME"),
    " version ",
    env!("CARGO_PKG_VERSION")
);

#[derive(Debug, Parser)]
#[command(
    name = "cal2grid",
    version = "0.1.0",
    about = "Paints your Google Calendar schedule onto a Google Sheets grid.",
    disable_version_flag = true
)]
pub struct Cli {
    #[arg(
        long,
        value_name = "DATE",
        help = "Render the grid as of this date (YYYY-MM-DD) instead of today."
    )]
    pub date: Option<String>,
    #[arg(long, help = "Print the paint plan instead of applying it.")]
    pub dry_run: bool,
    #[arg(long, short = 'V', help = "Print version")]
    pub version: bool,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if cli.version {
        print!("{}", APP_VERSION);
        std::process::exit(0);
    }

    let reference = match cli.date.as_deref() {
        Some(text) => match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                eprintln!("Invalid --date '{}'; expected YYYY-MM-DD.", text);
                std::process::exit(1);
            }
        },
        None => None,
    };

    let mut cal2grid = match Cal2Grid::new() {
        Ok(cal2grid) => cal2grid,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = cal2grid.oauth().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    match cal2grid.render(reference, cli.dry_run).await {
        Ok(summary) => println!("{}", summary),
        Err(err) => {
            eprintln!("{:?}", err);
            std::process::exit(1);
        }
    }
}
