//! incident_report - read the append-only incident store
//!
//! Prints recorded incidents in write order, as text or JSON.

use anyhow::Result;
use clap::Parser;

use safewatch_kernel::incident;

#[derive(Parser, Debug)]
#[command(name = "incident_report", about = "List recorded safety incidents")]
struct Args {
    /// Path to the incident store.
    #[arg(long, default_value = "incident_reports.csv", env = "SAFEWATCH_STORE_PATH")]
    store: String,

    /// Emit records as a JSON array.
    #[arg(long)]
    json: bool,

    /// Show only the most recent N records.
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut records = incident::read_all(&args.store)?;
    if let Some(limit) = args.limit {
        let skip = records.len().saturating_sub(limit);
        records.drain(..skip);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("no incidents recorded in {}", args.store);
        return Ok(());
    }

    for record in &records {
        let coordinates = match record.coordinates {
            Some((lat, lon)) => format!("[{}, {}]", lat, lon),
            None => "-".to_string(),
        };
        println!(
            "{} {}  {:<24} {}  {}",
            record.date, record.time, record.label, record.city, coordinates
        );
    }
    Ok(())
}
