use std::path::Path;

use frete_core::drilldown::{group_records, kpi_records, search, GroupDimension, KpiList};
use frete_core::error::FreteError;

use super::Context;
use crate::output;

/// Which records `frete list` shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Kpi(KpiList),
    Group(GroupDimension, String),
}

impl Selection {
    /// Build the selection from the mutually exclusive list flags.
    pub fn from_flags(
        kpi: Option<String>,
        carrier: Option<String>,
        occurrence: Option<String>,
        client: Option<String>,
        receiver: Option<String>,
    ) -> Result<Selection, FreteError> {
        if let Some(kpi) = kpi {
            return Ok(Selection::Kpi(kpi.parse()?));
        }
        let group = [
            (GroupDimension::Carrier, carrier),
            (GroupDimension::Occurrence, occurrence),
            (GroupDimension::Client, client),
            (GroupDimension::Receiver, receiver),
        ]
        .into_iter()
        .find_map(|(dimension, name)| name.map(|n| Selection::Group(dimension, n)));

        group.ok_or_else(|| {
            FreteError::ParseError(
                "one of --kpi, --carrier, --occurrence, --client or --receiver is required".into(),
            )
        })
    }

    fn title(&self) -> String {
        match self {
            Selection::Kpi(kpi) => kpi.title().to_string(),
            Selection::Group(dimension, name) => {
                let kind = match dimension {
                    GroupDimension::Carrier => "Transportadora",
                    GroupDimension::Occurrence => "Ocorrência",
                    GroupDimension::Client => "Remetente",
                    GroupDimension::Receiver => "Destinatário",
                };
                format!("{kind} {}", name.to_uppercase())
            }
        }
    }
}

pub fn run(
    ctx: &Context,
    input_file: &Path,
    selection: &Selection,
    term: Option<&str>,
) -> Result<(), FreteError> {
    let dashboard = frete_core::analyze_file(input_file, &ctx.rules, ctx.now)?;
    let stats = &dashboard.stats;

    let records = match selection {
        Selection::Kpi(kpi) => kpi_records(stats, *kpi),
        Selection::Group(dimension, name) => group_records(stats, *dimension, name),
    };
    let records = search(records, term.unwrap_or_default());

    if ctx.json() {
        output::json::print(&records)
    } else {
        output::table::print_records(&selection.title(), &records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kpi_flag_parsed() {
        let sel = Selection::from_flags(Some("on-time".into()), None, None, None, None).unwrap();
        assert_eq!(sel, Selection::Kpi(KpiList::OnTime));
        assert_eq!(sel.title(), "Dentro do Prazo");
    }

    #[test]
    fn group_flag_parsed() {
        let sel = Selection::from_flags(None, None, None, Some("Acme".into()), None).unwrap();
        assert_eq!(sel, Selection::Group(GroupDimension::Client, "Acme".into()));
        assert_eq!(sel.title(), "Remetente ACME");
    }

    #[test]
    fn unknown_kpi_rejected() {
        assert!(Selection::from_flags(Some("soon".into()), None, None, None, None).is_err());
    }

    #[test]
    fn missing_selection_rejected() {
        assert!(Selection::from_flags(None, None, None, None, None).is_err());
    }
}
