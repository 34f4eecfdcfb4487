//! Command-line interface for remarkable
//! This binary prints any stage of the remarkable pipeline for a markdown document.
//!
//! Usage:
//!   remarkable `<path>` [--stage `<stage>`] [--format json|yaml] [--config `<file>`]
//!   remarkable `<path>` --tokens                  - Read a JSON token stream instead of markdown
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default: warn).

mod output;

use clap::{Arg, ArgAction, ArgMatches, Command};
use output::{render_stage, OutputFormat, AVAILABLE_FORMATS};
use remarkable_babel::Remarkable;
use remarkable_config::{ConfigError, Loader, RemarkableConfig, Stage};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    let matches = cli().get_matches();

    match run(&matches) {
        Ok(text) => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
        }
        Err(message) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cli() -> Command {
    let stages: Vec<&'static str> = Stage::ALL.iter().map(|stage| stage.name()).collect();

    Command::new("remarkable")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve the metadata comments of a markdown document into a document tree")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the markdown file (or token stream, with --tokens)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("stage")
                .long("stage")
                .short('s')
                .help("Pipeline stage to print (default from config: tree)")
                .value_parser(stages),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format for structured stages")
                .value_parser(AVAILABLE_FORMATS.to_vec())
                .default_value("json"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .help("Read the input as a JSON token stream")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("retain-space")
                .long("retain-space")
                .help("Keep whitespace tokens in the tree")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("allow-html")
                .long("allow-html")
                .help("Keep html tokens in the tree")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("delete-cycles")
                .long("delete-cycles")
                .help("Delete edges that close a cycle instead of naming them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("compact")
                .long("compact")
                .help("Print JSON on a single line")
                .action(ArgAction::SetTrue),
        )
}

fn run(matches: &ArgMatches) -> Result<String, String> {
    let config = load_config(matches).map_err(|e| format!("Invalid configuration: {}", e))?;

    let path = matches
        .get_one::<String>("path")
        .ok_or_else(|| "Missing input path".to_string())?;
    let mut doc = Remarkable::from_path(path, config.pipeline.to_options())
        .map_err(|e| format!("Cannot load {}: {}", path, e))?;
    if matches.get_flag("tokens") {
        doc = doc.with_format("json");
    }

    let format_name = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("json");
    let format = OutputFormat::from_name(format_name, config.output.pretty)?;
    render_stage(&doc, config.output.stage, format)
}

/// The defaults, the `--config` file and the command-line flags, in that order
fn load_config(matches: &ArgMatches) -> Result<RemarkableConfig, ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(stage) = matches.get_one::<String>("stage") {
        loader = loader.set_override("output.stage", stage.as_str())?;
    }
    if matches.get_flag("retain-space") {
        loader = loader.set_override("pipeline.retain_space", true)?;
    }
    if matches.get_flag("allow-html") {
        loader = loader.set_override("pipeline.allow_html", true)?;
    }
    if matches.get_flag("delete-cycles") {
        loader = loader.set_override("pipeline.name_cycles", false)?;
    }
    if matches.get_flag("compact") {
        loader = loader.set_override("output.pretty", false)?;
    }
    loader.build()
}
