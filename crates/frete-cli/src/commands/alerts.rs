use std::path::Path;

use frete_core::drilldown::search_alerts;
use frete_core::error::FreteError;

use super::Context;
use crate::output;

pub fn run(ctx: &Context, input_file: &Path, search: Option<&str>) -> Result<(), FreteError> {
    let dashboard = frete_core::analyze_file(input_file, &ctx.rules, ctx.now)?;
    let alerts = search_alerts(&dashboard.stats.alerts, search.unwrap_or_default());

    if ctx.json() {
        output::json::print(&alerts)
    } else {
        output::table::print_alerts(&alerts);
        Ok(())
    }
}
