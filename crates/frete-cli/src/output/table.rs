use frete_core::aggregate::{Alert, ClassifiedShipment};
use frete_core::display::{format_brl, format_compact_brl, format_count};
use frete_core::drilldown::{
    ranked_carriers, ticker, top_clients, top_occurrences, top_receivers, RankEntry,
    ShipmentDetail,
};
use frete_core::model::field;
use frete_core::parsing::header::HeaderColumn;
use frete_core::parsing::values::parse_numeric;
use frete_core::parsing::ParsedTable;
use frete_core::rules::schema::RuleSetDef;
use frete_core::Dashboard;

const NAME_WIDTH: usize = 32;

pub fn print_summary(dashboard: &Dashboard, rules: &RuleSetDef) {
    let stats = &dashboard.stats;

    println!("=== {} ===\n", rules.name);
    println!(
        "  Reference time: {}",
        dashboard.reference_time.format("%d/%m/%Y %H:%M")
    );
    if !dashboard.skipped_rows.is_empty() {
        println!("  Skipped rows:   {}", dashboard.skipped_rows.len());
    }
    println!();

    println!("  CT-es           {}", format_count(stats.total_ctes));
    println!("  Valor total     {}", format_compact_brl(stats.valor));
    println!("  Peso total      {} KG", stats.peso.normalize());
    println!("  Volumes         {}", stats.volumes);
    println!("  Entregues       {}", format_count(stats.delivered_count));
    println!("  Atrasos         {}", format_count(stats.delayed_count));
    println!("  Dentro do prazo {}", format_count(stats.on_time_count));
    println!("  Vencidos        {}", format_count(stats.expired_count));
    println!("  Alertas         {}", format_count(stats.alerts.len()));
    println!();

    print_ranking("Transportadoras", &ranked_carriers(stats));
    print_ranking(
        "Top ocorrências",
        &top_occurrences(stats, &rules.hidden_occurrences),
    );
    print_ranking("Top remetentes", &top_clients(stats));
    print_ranking("Top destinatários", &top_receivers(stats));

    let scrolling = ticker(&stats.alerts);
    if !scrolling.is_empty() {
        println!("Alertas:");
        for alert in scrolling {
            println!("  [{}] CT-e {} - {}", alert.label, alert.record.cte(), alert.status);
        }
        println!();
    }
}

fn print_ranking(title: &str, entries: &[RankEntry]) {
    if entries.is_empty() {
        return;
    }
    println!("{title}:");
    for (i, entry) in entries.iter().enumerate() {
        let mut line = format!(
            "  {:>2}. {:<width$} {:>6}  {:>5}%",
            i + 1,
            cut(&entry.name, NAME_WIDTH),
            format_count(entry.count),
            entry.share.to_string().replace('.', ","),
            width = NAME_WIDTH
        );
        if let Some(valor) = entry.valor {
            line.push_str(&format!("  {:>12}", format_compact_brl(valor)));
        }
        if let Some(delays) = entry.delays {
            line.push_str(&format!("  atrasos: {delays}"));
        }
        println!("{line}");
    }
    println!();
}

pub fn print_alerts(alerts: &[&Alert]) {
    println!("Auditoria de prioridades: {} registro(s)\n", alerts.len());
    if alerts.is_empty() {
        return;
    }
    println!(
        "  {:<12} {:<22} {:<24} {:<28} {:>16}",
        "CT-E", "MOTIVO", "STATUS", "DESTINATÁRIO", "VALOR"
    );
    println!("  {}", "-".repeat(106));
    for alert in alerts {
        let marker = if alert.urgent { "!" } else { " " };
        println!(
            "{marker} {:<12} {:<22} {:<24} {:<28} {:>16}",
            cut(&alert.record.cte(), 12),
            cut(&alert.label, 22),
            cut(&alert.status, 24),
            cut(&alert.record.text(field::DESTINATARIO), 28),
            format_brl(alert.value)
        );
    }
}

pub fn print_records(title: &str, records: &[&ClassifiedShipment]) {
    println!("{title}: {} registro(s)\n", records.len());
    if records.is_empty() {
        return;
    }
    println!(
        "  {:<12} {:<24} {:<24} {:<24} {:>16}",
        "CT-E", "REMETENTE", "DESTINATÁRIO", "OCORRÊNCIA", "VALOR"
    );
    println!("  {}", "-".repeat(104));
    for shipment in records {
        let r = &shipment.record;
        println!(
            "  {:<12} {:<24} {:<24} {:<24} {:>16}",
            cut(&r.cte(), 12),
            cut(&shipment.keys.client, 24),
            cut(&shipment.keys.receiver, 24),
            cut(&shipment.keys.occurrence, 24),
            format_brl(parse_numeric(r.get(field::VALOR_NF)))
        );
    }
}

pub fn print_detail(detail: &ShipmentDetail) {
    println!("=== CT-e {} ===\n", detail.cte);

    let mut flags = Vec::new();
    if detail.delivered {
        flags.push("ENTREGUE");
    }
    if detail.late {
        flags.push("ATRASADO");
    }
    if detail.expired {
        flags.push("VENCIDO");
    }
    if detail.at_risk {
        flags.push("RISCO");
    }
    if !flags.is_empty() {
        println!("  [{}]\n", flags.join("] ["));
    }

    let rows = [
        ("Remetente", detail.sender.as_str()),
        ("Destinatário", detail.receiver.as_str()),
        ("Valor mercadoria", detail.value.as_str()),
        ("Origem", detail.origin.as_str()),
        ("Destino", detail.destination.as_str()),
        ("Emissão", detail.emission_date.as_str()),
        ("Peso real", detail.weight.as_str()),
        ("Volumes", detail.volumes.as_str()),
        ("CIA transf.", detail.carrier.as_str()),
        ("Último status", detail.last_status.as_str()),
        ("Previsão de entrega", detail.deadline.as_str()),
        ("Status perecível", detail.perishable_status.as_str()),
        ("Data limite", detail.perishable_limit.as_str()),
    ];
    for (label, value) in rows {
        println!("  {label:<20} {value}");
    }

    println!();
    if detail.documents.is_empty() {
        println!("  Nenhum documento vinculado.");
    } else {
        println!("  Documentos vinculados:");
        for doc in &detail.documents {
            println!("    - {doc}");
        }
    }
}

pub fn print_headers(columns: &[HeaderColumn]) {
    println!("  {:>4}  {:<36} FIELD", "COL", "HEADER");
    println!("  {}", "-".repeat(64));
    for col in columns {
        let field = col.field.as_deref().unwrap_or("(ignored)");
        println!("  {:>4}  {:<36} {}", col.index, cut(&col.raw, 36), field);
    }
}

pub fn format_parsed(parsed: &ParsedTable) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Mapped {} record(s) from {} column(s)\n",
        parsed.records.len(),
        parsed.mapping.len()
    ));

    for record in &parsed.records {
        out.push('\n');
        let label = if record.cte().is_empty() {
            format!("manifesto {}", record.text(field::MANIFESTO))
        } else {
            format!("CT-e {}", record.cte())
        };
        out.push_str(&format!("--- {label} ---\n"));
        for (name, cell) in &record.fields {
            if cell.is_truthy() {
                out.push_str(&format!("  {name:<20} {cell}\n"));
            }
        }
    }

    if !parsed.skipped_rows.is_empty() {
        out.push_str("\nSkipped rows:\n");
        for skipped in &parsed.skipped_rows {
            out.push_str(&format!("  row {}: {}\n", skipped.row_number, skipped.reason));
        }
    }

    out
}

pub fn print_ruleset(rs: &RuleSetDef) {
    println!("{} (version {})\n", rs.name, rs.version);
    if let Some(ref desc) = rs.description {
        println!("{desc}\n");
    }

    println!("  Delivered when the occurrence contains any of:");
    println!("    {}", rs.delivered_keywords.join(", "));
    println!("  or the perishable status contains any of:");
    println!("    {}", rs.finalized_status_keywords.join(", "));
    println!();
    println!(
        "  Expired when the perishable status contains '{}' but none of: {}",
        rs.expired_keyword,
        rs.not_expired_markers.join(", ")
    );
    println!(
        "  At risk when the perishable status contains '{}'",
        rs.risk_keyword
    );
    if !rs.hidden_occurrences.is_empty() {
        println!(
            "  Hidden from the occurrence ranking: {}",
            rs.hidden_occurrences.join(", ")
        );
    }
    println!();

    println!("  Alert labels:");
    println!("    late and expired  {}", rs.labels.late_and_expired);
    println!("    expired           {}", rs.labels.expired);
    println!("    late              {}", rs.labels.late);
    println!("    expiry risk       {}", rs.labels.expiry_risk);
    println!("    in flow           {}", rs.labels.in_flow);
    println!();

    println!("  Names for blank fields:");
    println!("    carrier           {}", rs.defaults.carrier);
    println!("    sender/receiver   {}", rs.defaults.party);
    println!("    occurrence        {}", rs.defaults.occurrence);
}

/// Cut to `width` characters, marking truncation with `~`.
fn cut(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}
