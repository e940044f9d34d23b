use std::path::{Path, PathBuf};

use frete_core::error::FreteError;

use crate::output;

pub fn run(
    output_format: &str,
    input_file: &Path,
    output_file: Option<PathBuf>,
) -> Result<(), FreteError> {
    let parsed = frete_core::parse_file(input_file)?;

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            let json = serde_json::to_string_pretty(&parsed)?;
            std::fs::write(&path, json)?;
            eprintln!(
                "Mapped {} record(s), written to {}",
                parsed.records.len(),
                path.display()
            );
            if !parsed.skipped_rows.is_empty() {
                eprintln!("  {} row(s) skipped", parsed.skipped_rows.len());
            }
        }
        None => match output_format {
            "json" => output::json::print(&parsed)?,
            _ => println!("{}", output::table::format_parsed(&parsed)),
        },
    }

    Ok(())
}
