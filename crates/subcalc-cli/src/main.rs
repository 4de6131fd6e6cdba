use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use subcalc_core::{calculate, calculate_cidr, Calculation};

mod batch;

use batch::{BatchProcessor, BatchResult};

/// IPv4 subnet calculator
#[derive(Parser)]
#[command(name = "subcalc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(
        short,
        long,
        value_enum,
        default_value = "human",
        global = true,
        env = "SUBCALC_OUTPUT"
    )]
    output: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate subnet properties for one address and prefix
    Calc(CalcArgs),
    /// Calculate many subnets from a file or stdin
    Batch(BatchArgs),
}

#[derive(Parser)]
struct CalcArgs {
    /// IPv4 address, or ADDRESS/PREFIX (e.g., 192.168.1.10/24)
    #[arg(value_name = "ADDRESS")]
    address: String,

    /// Prefix length (0-32), unless given as ADDRESS/PREFIX
    #[arg(value_name = "PREFIX")]
    prefix: Option<String>,
}

#[derive(Parser)]
struct BatchArgs {
    /// Input file (use '-' for stdin)
    #[arg(short, long, value_name = "FILE")]
    file: Option<String>,

    /// Number of worker threads (default: CPU cores)
    #[arg(short, long)]
    workers: Option<usize>,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output (pretty-printed)
    Json,
    /// JSON output (compact)
    JsonCompact,
    /// CSV output
    Csv,
}

/// One output row; exactly one of `calculation` and `error` is set
#[derive(Serialize)]
struct Record {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    calculation: Option<Calculation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<BatchResult> for Record {
    fn from(entry: BatchResult) -> Self {
        let (calculation, error) = match entry.result {
            Ok(calc) => (Some(calc), None),
            Err(e) => (None, Some(format!("line {}: {}", entry.line, e))),
        };
        Record {
            input: entry.input,
            calculation,
            error,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Calc(args) => handle_calc(args, cli.output)?,
        Commands::Batch(args) => handle_batch(args, cli.output)?,
    }

    Ok(())
}

/// `SUBCALC_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SUBCALC_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_calc(args: CalcArgs, format: OutputFormat) -> Result<()> {
    debug!(address = %args.address, prefix = ?args.prefix, "calc requested");

    let (input, calc) = match args.prefix {
        Some(ref prefix) => (
            format!("{}/{}", args.address.trim(), prefix.trim()),
            calculate(&args.address, prefix)?,
        ),
        None => (args.address.trim().to_string(), calculate_cidr(&args.address)?),
    };

    let record = Record {
        input,
        calculation: Some(calc),
        error: None,
    };
    print_records(&[record], format, false)
}

fn handle_batch(args: BatchArgs, format: OutputFormat) -> Result<()> {
    match args.file.as_deref() {
        None | Some("-") => debug!("Reading from stdin"),
        Some(file) => debug!("Reading from: {}", file),
    }

    let inputs = batch::read_inputs(batch::open_input(args.file.as_deref())?)?;
    let processor = BatchProcessor::new(args.workers)?;
    debug!(lines = inputs.len(), workers = processor.thread_count(), "batch started");

    let records: Vec<Record> = processor
        .process(inputs)
        .into_iter()
        .map(Record::from)
        .collect();

    print_records(&records, format, true)?;
    check_batch_failures(&records)
}

/// Fails when any batch line was rejected
fn check_batch_failures(records: &[Record]) -> Result<()> {
    let total = records.len();
    let failed = records.iter().filter(|r| r.error.is_some()).count();

    if failed > 0 {
        warn!(failed, total, "batch finished with errors");
        bail!("{} of {} lines failed", failed, total);
    }
    Ok(())
}

/// `batch` output is always a list, `calc` output a single record
fn print_records(records: &[Record], format: OutputFormat, batch: bool) -> Result<()> {
    match format {
        OutputFormat::Human => print_human(records),
        OutputFormat::Json => println!("{}", render_json(records, true, batch)?),
        OutputFormat::JsonCompact => println!("{}", render_json(records, false, batch)?),
        OutputFormat::Csv => print_csv(records)?,
    }
    Ok(())
}

fn print_human(records: &[Record]) {
    for record in records {
        match (&record.calculation, &record.error) {
            (Some(calc), _) => print_calculation(&record.input, calc),
            (None, Some(error)) => {
                eprintln!("{} {}: {}", "✗".red(), record.input, error.red());
            }
            (None, None) => {}
        }
    }
}

fn print_calculation(input: &str, calc: &Calculation) {
    println!();
    println!("{}", "Subnet Calculation".bold().cyan());
    println!("{}", "─".repeat(50).dimmed());
    println!("{:>15}: {}", "Input".bold(), input);
    println!("{:>15}: {}", "Network".bold(), calc.subnet.network.to_string().green());
    println!("{:>15}: {}", "Broadcast".bold(), calc.subnet.broadcast);
    println!("{:>15}: {}", "Subnet Mask".bold(), calc.mask.dotted);
    println!("{:>15}: {}", "Binary Mask".bold(), calc.mask.binary);
    println!("{:>15}: {}", "Usable Hosts".bold(), calc.subnet.usable_host_count);
    println!("{:>15}: {}", "Host Range".bold(), calc.host_range());
    println!("{:>15}: {}", "Class".bold(), calc.classification.address_class);
    println!("{:>15}: {}", "Type".bold(), calc.classification.scope);
    println!();
}

fn render_json(records: &[Record], pretty: bool, batch: bool) -> Result<String> {
    let json = match records {
        [single] if !batch && pretty => serde_json::to_string_pretty(single)?,
        [single] if !batch => serde_json::to_string(single)?,
        _ if pretty => serde_json::to_string_pretty(records)?,
        _ => serde_json::to_string(records)?,
    };
    Ok(json)
}

fn print_csv(records: &[Record]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    wtr.write_record(csv_header())?;
    for record in records {
        wtr.write_record(csv_row(record))?;
    }
    wtr.flush()?;
    Ok(())
}

fn csv_header() -> [&'static str; 12] {
    [
        "input",
        "network",
        "broadcast",
        "mask",
        "mask_binary",
        "usable_hosts",
        "first_host",
        "last_host",
        "prefix",
        "class",
        "scope",
        "error",
    ]
}

fn csv_row(record: &Record) -> Vec<String> {
    let mut row = vec![record.input.clone()];
    match &record.calculation {
        Some(calc) => row.extend([
            calc.subnet.network.to_string(),
            calc.subnet.broadcast.to_string(),
            calc.mask.dotted.clone(),
            calc.mask.binary.clone(),
            calc.subnet.usable_host_count.to_string(),
            calc.subnet.first_usable_host.to_string(),
            calc.subnet.last_usable_host.to_string(),
            calc.prefix_len.to_string(),
            calc.classification.address_class.to_string(),
            calc.classification.scope.to_string(),
        ]),
        None => row.extend(std::iter::repeat(String::new()).take(10)),
    }
    row.push(record.error.clone().unwrap_or_default());
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["subcalc", "calc", "192.168.1.10", "24"]);
        if let Commands::Calc(args) = cli.command {
            assert_eq!(args.address, "192.168.1.10");
            assert_eq!(args.prefix, Some("24".to_string()));
        } else {
            panic!("Expected Calc command");
        }
    }

    #[test]
    fn test_calc_cidr_notation() {
        let cli = Cli::parse_from(["subcalc", "calc", "10.0.0.5/8"]);
        if let Commands::Calc(args) = cli.command {
            assert_eq!(args.address, "10.0.0.5/8");
            assert!(args.prefix.is_none());
        } else {
            panic!("Expected Calc command");
        }
    }

    #[test]
    fn test_output_format_json() {
        let cli = Cli::parse_from(["subcalc", "--output", "json", "calc", "8.8.8.8/32"]);
        assert!(matches!(cli.output, OutputFormat::Json));

        let cli = Cli::parse_from(["subcalc", "calc", "8.8.8.8/32", "-o", "json-compact"]);
        assert!(matches!(cli.output, OutputFormat::JsonCompact));
    }

    #[test]
    fn test_batch_command() {
        let cli = Cli::parse_from(["subcalc", "batch", "--file", "subnets.txt", "--workers", "5"]);
        if let Commands::Batch(args) = cli.command {
            assert_eq!(args.file, Some("subnets.txt".to_string()));
            assert_eq!(args.workers, Some(5));
        } else {
            panic!("Expected Batch command");
        }
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::parse_from(["subcalc", "-v", "calc", "1.1.1.1", "32"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_record_from_failed_batch_line() {
        let record = Record::from(BatchResult {
            line: 7,
            input: "1.2.3 24".to_string(),
            result: Err("Format error: wrong octet count".to_string()),
        });
        assert!(record.calculation.is_none());
        assert_eq!(
            record.error.as_deref(),
            Some("line 7: Format error: wrong octet count")
        );

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("calculation").is_none());
        assert_eq!(json["input"], "1.2.3 24");
    }

    fn record_for(input: &str) -> Record {
        let (ip, prefix) = input.split_once('/').unwrap();
        Record {
            input: input.to_string(),
            calculation: Some(calculate(ip, prefix).unwrap()),
            error: None,
        }
    }

    #[test]
    fn test_calc_json_is_object() {
        let records = [record_for("10.0.0.5/8")];

        let compact = render_json(&records, false, false).unwrap();
        assert!(compact.starts_with('{'));
        let pretty = render_json(&records, true, false).unwrap();
        assert!(pretty.starts_with('{'));

        let json: serde_json::Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(json["calculation"]["network"], "10.0.0.0");
    }

    #[test]
    fn test_batch_json_is_always_array() {
        let one = [record_for("10.0.0.5/8")];
        for pretty in [false, true] {
            let json = render_json(&one, pretty, true).unwrap();
            assert!(json.starts_with('['), "{json}");
            let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed.as_array().map(Vec::len), Some(1));
        }

        let two = [record_for("10.0.0.5/8"), record_for("8.8.8.8/32")];
        let parsed: serde_json::Value =
            serde_json::from_str(&render_json(&two, false, true).unwrap()).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));

        let empty: [Record; 0] = [];
        assert_eq!(render_json(&empty, false, true).unwrap(), "[]");
    }

    #[test]
    fn test_batch_fails_when_any_line_rejected() {
        let clean = [record_for("10.0.0.5/8"), record_for("8.8.8.8/32")];
        assert!(check_batch_failures(&clean).is_ok());

        let mixed = [
            record_for("10.0.0.5/8"),
            Record::from(BatchResult {
                line: 2,
                input: "300.1.1.1/24".to_string(),
                result: Err("Range error: octet out of range: 300".to_string()),
            }),
        ];
        let err = check_batch_failures(&mixed).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 lines failed");
    }

    #[test]
    fn test_csv_row_shape() {
        let ok = Record {
            input: "192.168.1.10/24".to_string(),
            calculation: Some(calculate("192.168.1.10", "24").unwrap()),
            error: None,
        };
        let row = csv_row(&ok);
        assert_eq!(row.len(), csv_header().len());
        assert_eq!(row[1], "192.168.1.0");
        assert_eq!(row[5], "254");
        assert_eq!(row[9], "Class C");
        assert_eq!(row[11], "");

        let failed = Record {
            input: "bad".to_string(),
            calculation: None,
            error: Some("line 1: boom".to_string()),
        };
        let row = csv_row(&failed);
        assert_eq!(row.len(), csv_header().len());
        assert_eq!(row[11], "line 1: boom");
    }
}
