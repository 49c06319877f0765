// Command-line interface for yWriter 7 conversions
//
// The ywcnv program moves a yWriter project in and out of office documents. All conversion logic
// lives in the yw-babel crate; this binary parses arguments, loads the configuration, installs
// logging and reports the outcome.
//
// Usage:
//  ywcnv <file> [--suffix <suffix>]            - Convert in the direction the file name implies (default)
//  ywcnv export <project.yw7> --suffix <suffix> [--format <ext>]
//  ywcnv import <document>                     - Merge an edited document back into its project
//  ywcnv new <document>                        - Create a project from a work in progress or outline
//  ywcnv formats                               - List the known documents
//  ywcnv inspect <file>                        - Print the project model a file yields, as JSON
//
// A suffix names the document type: `_manuscript`, `_scenes`, `_charlist`, ... The empty suffix
// is the plain export of the whole novel.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use yw_babel::formats::Yw7File;
use yw_babel::fsutil::read_file;
use yw_babel::{Converter, FormatError, Project, FAILURE_MARKER};
use yw_config::{Loader, YwConfig};

const SUBCOMMANDS: &[&str] = &["convert", "export", "import", "new", "formats", "inspect", "help"];

fn build_cli() -> Command {
    Command::new("ywcnv")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert yWriter 7 projects to and from office documents")
        .long_about(
            "ywcnv exports yWriter 7 projects to ODT, ODS, HTML and CSV documents and merges\n\
            edited documents back into the project.\n\n\
            Examples:\n  \
            ywcnv novel.yw7 --suffix _manuscript      # Export the manuscript (ODT)\n  \
            ywcnv novel_manuscript.html               # Merge the edited manuscript back\n  \
            ywcnv new draft.odt                       # Start a project from a draft\n  \
            ywcnv formats                             # List document types",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a ywcnv.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log conversion details to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert in the direction the file name implies (default command)")
                .long_about(
                    "A .yw7 project is exported to the document type given by --suffix.\n\
                    A document with a known suffix is merged back into its project.\n\
                    A document without suffix becomes a new project.",
                )
                .arg(
                    Arg::new("file")
                        .help("Project or document path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(suffix_arg(false)),
        )
        .subcommand(
            Command::new("export")
                .about("Export a project to a document")
                .arg(
                    Arg::new("project")
                        .help("Path to the .yw7 project")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(suffix_arg(true))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Document extension; defaults to the first of odt, ods, html, csv")
                        .value_parser(["odt", "ods", "html", "csv"])
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Merge an edited document back into its project")
                .arg(
                    Arg::new("document")
                        .help("Path to the document, e.g. novel_scenes.html")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("new")
                .about("Create a project from a work in progress or an outline")
                .arg(
                    Arg::new("document")
                        .help("Path to a document without suffix, e.g. novel.odt")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(Command::new("formats").about("List the document types ywcnv reads and writes"))
        .subcommand(
            Command::new("inspect")
                .about("Print the project model a file yields, as JSON")
                .arg(
                    Arg::new("file")
                        .help("Project or document path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn suffix_arg(required: bool) -> Arg {
    Arg::new("suffix")
        .long("suffix")
        .short('s')
        .value_name("SUFFIX")
        .help("Document type, e.g. _manuscript, _scenes, _charlist")
        .allow_hyphen_values(true)
        .required(required)
        .value_hint(ValueHint::Other)
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            // A file as first argument means the default command.
            if args.len() > 1 && !args[1].starts_with('-') && !SUBCOMMANDS.contains(&args[1].as_str())
            {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    init_logging(matches.get_flag("verbose"), &config);
    let converter = Converter::new()
        .with_fallback_locale(&config.locale.language, &config.locale.country)
        .keep_backup(config.output.keep_backup);

    match matches.subcommand() {
        Some(("convert", sub)) => {
            let file = required(sub, "file");
            let suffix = sub.get_one::<String>("suffix").map(|s| s.as_str());
            report(converter.run(Path::new(file), suffix));
        }
        Some(("export", sub)) => {
            let project = required(sub, "project");
            let suffix = required(sub, "suffix");
            let format = sub.get_one::<String>("format").map(|s| s.as_str());
            finish(converter.export_from_yw(Path::new(project), suffix, format));
        }
        Some(("import", sub)) => {
            finish(converter.import_to_yw(Path::new(required(sub, "document"))));
        }
        Some(("new", sub)) => {
            finish(converter.create_yw(Path::new(required(sub, "document"))));
        }
        Some(("formats", _)) => handle_formats_command(&converter),
        Some(("inspect", sub)) => handle_inspect_command(&converter, required(sub, "file")),
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(|s| s.as_str())
        .unwrap_or_else(|| {
            eprintln!("Missing argument: {id}");
            std::process::exit(2);
        })
}

/// Print a status line; failures go to stderr with exit code 1.
fn report(status: String) {
    match status.strip_prefix(FAILURE_MARKER) {
        Some(message) => {
            eprintln!("Error: {message}");
            std::process::exit(1);
        }
        None => println!("{status}"),
    }
}

fn finish(result: Result<String, FormatError>) {
    report(result.unwrap_or_else(|e| e.status_message()));
}

fn handle_formats_command(converter: &Converter) {
    println!("Document types (file ending, reads/writes, description):\n");
    for format in converter.registry().formats() {
        let modes = match (format.supports_parsing(), format.supports_serialization()) {
            (true, true) => "rw",
            (true, false) => "r-",
            (false, true) => "-w",
            (false, false) => "--",
        };
        println!(
            "  {:<22} {modes}  {}",
            format.file_ending(),
            format.description()
        );
    }
}

fn handle_inspect_command(converter: &Converter, file: &str) {
    let project = inspect(converter, Path::new(file)).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    match serde_json::to_string_pretty(&project) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: cannot serialize project: {e}");
            std::process::exit(1);
        }
    }
}

/// Read any readable file into a project without touching anything on disk.
fn inspect(converter: &Converter, path: &Path) -> Result<Project, FormatError> {
    let name = path.to_string_lossy();
    let format = converter.registry().detect(&name)?;
    debug!(format = format.name(), "inspecting");
    if format.name() == "yw7" {
        return Yw7File::new(path).read();
    }
    format.parse(&read_file(path)?)
}

fn load_cli_config(explicit_path: Option<&str>) -> YwConfig {
    let loader = Loader::new().with_optional_file("ywcnv.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// `--verbose` wins over `RUST_LOG`, which wins over the configured level.
fn log_filter(verbose: bool, config: &YwConfig) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
}

fn init_logging(verbose: bool, config: &YwConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
