use std::path::Path;

use frete_core::drilldown::{find_by_cte, ShipmentDetail};
use frete_core::error::FreteError;

use super::Context;
use crate::output;

pub fn run(ctx: &Context, input_file: &Path, cte: &str) -> Result<(), FreteError> {
    let dashboard = frete_core::analyze_file(input_file, &ctx.rules, ctx.now)?;
    let detail = ShipmentDetail::new(find_by_cte(&dashboard.stats, cte)?);

    if ctx.json() {
        output::json::print(&detail)
    } else {
        output::table::print_detail(&detail);
        Ok(())
    }
}
