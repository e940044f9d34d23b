use std::path::Path;

use frete_core::error::FreteError;
use frete_core::parsing::header::describe_headers;

use crate::output;

pub fn run(output_format: &str, input_file: &Path) -> Result<(), FreteError> {
    let table = frete_core::read_table(input_file)?;
    let columns = describe_headers(&table.headers);

    match output_format {
        "json" => output::json::print(&columns),
        _ => {
            output::table::print_headers(&columns);
            Ok(())
        }
    }
}
