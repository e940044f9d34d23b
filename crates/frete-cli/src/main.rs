mod commands;
mod logging;
mod output;

use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use commands::list::Selection;
use commands::Context;

#[derive(Parser)]
#[command(
    name = "frete",
    version,
    about = "Delivery deadline and perishable expiry dashboard for CT-e spreadsheet exports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Custom JSON rule file (default: built-in rules)
    #[arg(long, global = true, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Reference time for deadline checks, e.g. "2024-03-15 12:00" (default: now)
    #[arg(long, global = true, value_name = "TIME", env = "FRETE_NOW")]
    now: Option<String>,

    /// Output format: table (default) or json
    #[arg(short, long, global = true, default_value = "table")]
    output: String,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Log level (error, warn, info, debug, trace); overrides -v and RUST_LOG
    #[arg(long, global = true, value_name = "LEVEL", env = "FRETE_LOG_LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// KPI cards, carrier/occurrence/sender/receiver rankings and alert ticker
    Summary {
        /// Path to the export (CSV/TXT or XLSX/XLS/ODS)
        input_file: PathBuf,
    },
    /// Priority list of late, expired and at-risk shipments
    Alerts {
        /// Path to the export
        input_file: PathBuf,

        /// Only entries whose CT-e, sender or receiver contains TERM
        #[arg(short, long, value_name = "TERM")]
        search: Option<String>,
    },
    /// Shipments behind a KPI card or a breakdown entry
    #[command(group(ArgGroup::new("selection").required(true)))]
    List {
        /// Path to the export
        input_file: PathBuf,

        /// KPI list: delivered, late, expired or on-time
        #[arg(long, group = "selection", value_name = "KPI")]
        kpi: Option<String>,

        /// Shipments of one carrier
        #[arg(long, group = "selection", value_name = "NAME")]
        carrier: Option<String>,

        /// Shipments with one occurrence
        #[arg(long, group = "selection", value_name = "NAME")]
        occurrence: Option<String>,

        /// Shipments of one sender
        #[arg(long, group = "selection", value_name = "NAME")]
        client: Option<String>,

        /// Shipments to one receiver
        #[arg(long, group = "selection", value_name = "NAME")]
        receiver: Option<String>,

        /// Only entries whose CT-e, sender or receiver contains TERM
        #[arg(short, long, value_name = "TERM")]
        search: Option<String>,
    },
    /// Detail view of one shipment
    Show {
        /// Path to the export
        input_file: PathBuf,

        /// CT-e number
        cte: String,
    },
    /// Show how each column header is mapped
    Headers {
        /// Path to the export
        input_file: PathBuf,
    },
    /// Map the export into records without classifying them
    Parse {
        /// Path to the export
        input_file: PathBuf,

        /// Write parsed output to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Manage and inspect rulesets
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List predefined rulesets
    List,
    /// Print a ruleset's keywords, labels and group defaults
    Show {
        /// Preset name
        #[arg(default_value = "default")]
        name: String,
    },
    /// Print the JSON schema with field descriptions and example
    Schema,
    /// Validate a custom rule file
    Validate {
        /// Path to JSON rule file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::setup_logging(cli.log_level.as_deref(), cli.verbose);

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), frete_core::error::FreteError> {
    let Cli {
        command,
        rules,
        now,
        output,
        ..
    } = cli;
    let context = || Context::load(rules.as_deref(), now.as_deref(), &output);

    match command {
        Commands::Summary { input_file } => commands::summary::run(&context()?, &input_file),
        Commands::Alerts { input_file, search } => {
            commands::alerts::run(&context()?, &input_file, search.as_deref())
        }
        Commands::List {
            input_file,
            kpi,
            carrier,
            occurrence,
            client,
            receiver,
            search,
        } => {
            let selection = Selection::from_flags(kpi, carrier, occurrence, client, receiver)?;
            commands::list::run(&context()?, &input_file, &selection, search.as_deref())
        }
        Commands::Show { input_file, cte } => commands::show::run(&context()?, &input_file, &cte),
        Commands::Headers { input_file } => commands::headers::run(&output, &input_file),
        Commands::Parse { input_file, out } => commands::parse::run(&output, &input_file, out),
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(),
            RulesAction::Show { name } => commands::rules::show(&name, &output),
            RulesAction::Schema => commands::rules::schema(),
            RulesAction::Validate { file } => commands::rules::validate(&file),
        },
    }
}
