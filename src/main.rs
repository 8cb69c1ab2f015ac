mod debug_report;

use chrono::{DateTime, Utc};
use lqlnorm::{Context, Mode, Options, QueryDefinition, normalize_verbose_with};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "LQLNORM_LOG";

fn main() {
    init_logging();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let ctx = match config.reference_time {
        Some(reference) => Context::fixed(reference),
        None => Context::default(),
    };
    let opts = Options { natural_language: config.natural_language };

    let definition = QueryDefinition::from_blob(config.blob.as_str())
        .with_start(config.start.as_str())
        .with_end(config.end.as_str());

    let res = match normalize_verbose_with(&definition, config.mode.policy(), &ctx, &opts) {
        Ok(res) => res,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if config.verbose {
        debug_report::print_run(&config.blob, &res, config.color);
    }

    match serde_json::to_string_pretty(&res.query.definition) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("error: failed to encode definition: {err}");
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

struct CliConfig {
    blob: String,
    start: String,
    end: String,
    mode: Mode,
    reference_time: Option<DateTime<Utc>>,
    natural_language: bool,
    verbose: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut blob: Option<String> = None;
    let mut start = String::new();
    let mut end = String::new();
    let mut mode = Mode::Definition;
    let mut reference_time = None;
    let mut natural_language = true;
    let mut verbose = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("lqlnorm {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--execute" => mode = Mode::Execution,
            "--no-natural" => natural_language = false,
            "-v" | "--verbose" => verbose = true,
            "--color" => color = true,
            "--no-color" => color = false,
            "--start" | "-s" => {
                start = args.next().ok_or_else(|| "error: --start expects a value".to_string())?;
            }
            "--end" | "-e" => {
                end = args.next().ok_or_else(|| "error: --end expects a value".to_string())?;
            }
            "--reference" => {
                let value = args.next().ok_or_else(|| "error: --reference expects a value".to_string())?;
                reference_time = Some(parse_reference(&value)?);
            }
            "--blob" | "-b" => {
                let value = args.next().ok_or_else(|| "error: --blob expects a value".to_string())?;
                set_blob(&mut blob, value)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    set_blob(&mut blob, rest)?;
                }
                break;
            }
            _ if arg.starts_with("--start=") => start = arg.trim_start_matches("--start=").to_string(),
            _ if arg.starts_with("--end=") => end = arg.trim_start_matches("--end=").to_string(),
            _ if arg.starts_with("--reference=") => {
                reference_time = Some(parse_reference(arg.trim_start_matches("--reference="))?);
            }
            _ if arg.starts_with("--blob=") => {
                set_blob(&mut blob, arg.trim_start_matches("--blob=").to_string())?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                set_blob(&mut blob, rest)?;
                break;
            }
        }
    }

    let blob = match blob {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if blob.trim().is_empty() {
        return Err(format!("error: no query provided\n\n{}", help_text()));
    }

    Ok(CliConfig { blob, start, end, mode, reference_time, natural_language, verbose, color })
}

fn set_blob(slot: &mut Option<String>, value: String) -> Result<(), String> {
    if slot.is_some() {
        return Err("error: query provided multiple times".to_string());
    }
    *slot = Some(value);
    Ok(())
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_reference(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("error: invalid --reference '{value}' (expected RFC 3339, e.g. 2020-07-16T18:00:00Z)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "lqlnorm {version}

Validate an LQL query definition and normalize its time window.

Usage:
  lqlnorm [OPTIONS] [--] <query...>
  lqlnorm [OPTIONS] --blob <query>

The query is either a JSON record (LQL_ID, START_TIME_RANGE, END_TIME_RANGE,
QUERY_TEXT) or literal LQL text. If omitted, it is read from stdin.

Options:
  -b, --blob <query>         Query blob to normalize.
  -s, --start <expr>         Start of the time window.
  -e, --end <expr>           End of the time window.
  --execute                  Execution mode: both bounds are required.
                             Default is definition mode (bounds optional).
  --reference <timestamp>    Evaluate relative times against this RFC 3339
                             instant instead of the wall clock.
  --no-natural               Disable English phrases like \"last friday\".
  -v, --verbose              Print a per-stage report before the result.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Time expressions:
  now, -24h, -1d@d, @w, +3mon     relative tokens
  today, last 3 days, 2 hours ago relative phrases
  2020-07-16T18:00:00Z            RFC 3339
  1594927200000                   epoch milliseconds

Environment:
  {log_env}                 Log filter (default: warn).

Exit codes:
  0  Success.
  1  Validation failed.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV
    )
}
