//! Command-line interface for lexbridge
//! Runs the external analyzer over a source file and prints or exports the
//! token table it reports.
//!
//! Usage:
//!   lexbridge analyze `<path>` [--format `<format>`] [--output `<csv>`]   - Analyze a source file
//!   lexbridge convert `<csv>` [--format `<format>`]                     - Re-read an exported CSV
//!   lexbridge formats                                                 - List output formats
//!
//! Set `RUST_LOG=lexbridge=debug` to trace the analyzer exchange on stderr.

use clap::{value_parser, Arg, ArgMatches, Command};
use config::ConfigError;
use lexbridge::config::{LexbridgeConfig, Loader};
use lexbridge::formats::{CsvFormatter, FormatError, FormatRegistry};
use lexbridge::{codec, session, Session, TokenTable};
use std::fmt::Display;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

#[tokio::main]
async fn main() {
    init_tracing();

    let matches = Command::new("lexbridge")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run an external lexical analyzer and inspect or export its tokens")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("analyze")
                .about("Analyze a source file and print its token table")
                .arg(
                    Arg::new("path")
                        .help("Path to the source file (UTF-8)")
                        .required(true)
                        .index(1),
                )
                .arg(format_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write the table as CSV to this file instead of printing it"),
                )
                .arg(
                    Arg::new("analyzer")
                        .long("analyzer")
                        .help("Analyzer executable (overrides analyzer.executable)"),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .value_parser(value_parser!(u64))
                        .help("Seconds before the analyzer is killed, 0 to wait forever"),
                )
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("convert")
                .about("Read an exported CSV token table and render it")
                .arg(
                    Arg::new("path")
                        .help("Path to the CSV file")
                        .required(true)
                        .index(1),
                )
                .arg(format_arg())
                .arg(config_arg()),
        )
        .subcommand(Command::new("formats").about("List available output formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("analyze", analyze_matches)) => handle_analyze_command(analyze_matches).await,
        Some(("convert", convert_matches)) => handle_convert_command(convert_matches).await,
        Some(("formats", _)) => handle_formats_command(),
        _ => unreachable!(),
    }
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format (csv, json, table)")
        .default_value("table")
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .help("Configuration file layered over the defaults")
}

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("lexbridge=warn"));
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    });
}

/// Handle the analyze command
async fn handle_analyze_command(matches: &ArgMatches) {
    let path = matches.get_one::<String>("path").expect("path is required");
    let format = matches.get_one::<String>("format").expect("format has a default");

    let config = load_config(matches)
        .unwrap_or_else(|e| fail(format!("Configuration error: {}", e)));
    let output = matches.get_one::<String>("output");
    let registry = registry(&config);
    if output.is_none() {
        check_format(&registry, format);
    }

    let session = Session::from_config(&config).unwrap_or_else(|e| fail(e));
    let source = session::load_source(path)
        .await
        .unwrap_or_else(|e| fail(format!("Cannot read {}: {}", path, e)));

    let table = session.run_analysis(&source).await.unwrap_or_else(|e| fail(e));

    match output {
        Some(output) => {
            session.export_to(output).await.unwrap_or_else(|e| fail(e));
            eprintln!("Exported {} tokens to {}", table.len(), output);
        }
        None => print!("{}", render(&registry, &table, format)),
    }
}

/// Handle the convert command
async fn handle_convert_command(matches: &ArgMatches) {
    let path = matches.get_one::<String>("path").expect("path is required");
    let format = matches.get_one::<String>("format").expect("format has a default");

    let config = load_config(matches)
        .unwrap_or_else(|e| fail(format!("Configuration error: {}", e)));
    let registry = registry(&config);
    check_format(&registry, format);

    let text = session::load_source(path)
        .await
        .unwrap_or_else(|e| fail(format!("Cannot read {}: {}", path, e)));
    let table = codec::parse(&text).unwrap_or_else(|e| fail(e));

    print!("{}", render(&registry, &table, format));
}

/// Handle the formats command
fn handle_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available formats:");
    for name in registry.list_formats() {
        let description = registry.get(&name).map(|f| f.description()).unwrap_or("");
        println!("  {:<8} {}", name, description);
    }
}

/// Defaults, then ./lexbridge.toml, then --config, then flags
fn load_config(matches: &ArgMatches) -> Result<LexbridgeConfig, ConfigError> {
    let mut loader = Loader::new().with_local_file();

    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Ok(Some(executable)) = matches.try_get_one::<String>("analyzer") {
        // Flags are relative to where the user stands, not to the install dir
        let executable = std::env::current_dir()
            .map(|cwd| cwd.join(executable))
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        loader = loader.with_executable(&executable)?;
    }
    if let Ok(Some(secs)) = matches.try_get_one::<u64>("timeout") {
        loader = loader.with_timeout_secs(*secs)?;
    }

    loader.build()
}

/// Built-in formats, csv using the configured line ending
fn registry(config: &LexbridgeConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::with_defaults();
    registry.register(CsvFormatter::new(config.export.line_ending));
    registry
}

/// Exit listing the available formats when `format` is unknown
fn check_format(registry: &FormatRegistry, format: &str) {
    if registry.has(format) {
        return;
    }
    eprintln!("Error: {}", FormatError::FormatNotFound(format.to_string()));
    eprintln!("\nAvailable formats:");
    for name in registry.list_formats() {
        eprintln!("  {}", name);
    }
    std::process::exit(1);
}

fn render(registry: &FormatRegistry, table: &TokenTable, format: &str) -> String {
    registry.render(table, format).unwrap_or_else(|e| fail(e))
}

fn fail(message: impl Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}
