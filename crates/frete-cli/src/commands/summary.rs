use std::path::Path;

use frete_core::error::FreteError;

use super::Context;
use crate::output;

pub fn run(ctx: &Context, input_file: &Path) -> Result<(), FreteError> {
    let dashboard = frete_core::analyze_file(input_file, &ctx.rules, ctx.now)?;

    if ctx.json() {
        output::json::print(&output::json::summary(&dashboard, &ctx.rules))
    } else {
        output::table::print_summary(&dashboard, &ctx.rules);
        Ok(())
    }
}
