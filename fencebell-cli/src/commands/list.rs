//! List command - show the records in a feed file.

use std::path::PathBuf;

use fencebell::geo::{distance_meters, Coordinate};

use super::common::{format_distance, load_records};
use crate::error::CliError;

/// Arguments for the list command.
pub struct ListArgs {
    pub records: PathBuf,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Run the list command.
pub fn run(args: ListArgs) -> Result<(), CliError> {
    let records = load_records(&args.records)?;

    let position = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Some(
            Coordinate::new(lat, lon)
                .map_err(|e| CliError::Config(format!("Invalid position: {}", e)))?,
        ),
        (None, None) => None,
        _ => {
            return Err(CliError::Config(
                "--lat and --lon must be given together".to_string(),
            ))
        }
    };

    if records.is_empty() {
        println!("No records in {}", args.records.display());
        return Ok(());
    }

    println!("{} records in {}", records.len(), args.records.display());
    println!();

    let id_width = records
        .iter()
        .map(|r| r.id().as_str().len())
        .max()
        .unwrap_or(2);

    for record in &records {
        println!("  {:<id_width$}  {}", record.id(), record.name());
        println!(
            "  {:id_width$}  {} | radius {} | arrive {}",
            "",
            record.coordinate(),
            format_distance(record.radius_meters()),
            record.arrival_time().format("%H:%M:%S")
        );
        if let Some(address) = record.address() {
            println!("  {:id_width$}  {}", "", address);
        }
        if let Some(position) = position {
            let distance = distance_meters(position, record.coordinate());
            println!("  {:id_width$}  {} away", "", format_distance(distance));
        }
        println!();
    }

    Ok(())
}
