// Command-line interface for ibx
//
// This binary converts IBX1 binary documents to XML and back, and offers an
// inspect command for looking at the raw tables of a file.
//
// Converting:
//
// The source format is detected from the file extension (.dat/.ibx or .xml) and can be forced
// with --from. The target defaults to the other side of the source format.
// Input that is not IBX1 (or XML that does not follow the element/property shape) is copied
// unchanged, never dropped.
// Usage:
//  ibx <input> [--to <format>] [--from <format>] [--output <path>]  - Convert (default)
//  ibx convert <input> ...                                         - Same as above (explicit)
//  ibx convert <dir> -o <dir>                                      - Convert a whole tree
//  ibx inspect <path> [<view>]                                     - Dump tables or tree (defaults to "tables")
//  ibx --list-formats                                              - List formats and views
//
// Extra Parameters:
//
// Configuration keys can be overridden with --extra-<parameter-name> <value>. The short
// flags --hex8, --hex16, --hex32, --noshare and --debug are spelled-out versions of the same.
// Example:
//  ibx level.dat --extra-hex16 --extra-encoding-marker 2

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use ibx_cli::batch::{convert_bytes, BatchJob, FileOutcome};
use ibx_cli::{counterpart, inspect, logging};
use ibx_codec::{FormatOptions, FormatRegistry};
use ibx_config::{IbxConfig, Loader};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SUBCOMMANDS: &[&str] = &["convert", "inspect", "help"];

/// Flags that are shorthands for `--extra-<name>`.
const DIRECT_FLAGS: &[&str] = &["hex8", "hex16", "hex32", "noshare", "debug"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let has_value = if i + 1 < args.len() {
                !args[i + 1].starts_with('-')
            } else {
                false
            };

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("ibx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert IBX1 binary documents to XML and back")
        .long_about(
            "ibx is a lossless converter between IBX1 binary documents and XML.\n\n\
            Commands:\n  \
            - convert: Convert a file or a directory tree (default command)\n  \
            - inspect: Dump the tables or the decoded tree of a file\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override configuration keys.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            ibx level.dat                      # XML to stdout\n  \
            ibx level.dat --hex8 -o level.xml  # int8 values as hex\n  \
            ibx level.xml -o level.dat         # Back to binary\n  \
            ibx convert data/ -o out/          # Convert every file below data/\n  \
            ibx inspect level.dat              # String and value tables"
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats and inspect views")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an ibx.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Log every table entry and tree node to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("hex8")
                .long("hex8")
                .help("Write int8 values as hex in XML")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("hex16")
                .long("hex16")
                .help("Write int16 values as hex in XML")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("hex32")
                .long("hex32")
                .help("Write int32 values as hex in XML")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("noshare")
                .long("noshare")
                .help("Give every property its own typed value slot when encoding")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between IBX1 and XML (default command)")
                .long_about(
                    "Convert a file or a directory tree.\n\n\
                    Supported formats:\n  \
                    - ibx: IBX1 binary (.dat, .ibx)\n  \
                    - xml: XML (.xml)\n\n\
                    The source format is auto-detected from the file extension and the\n\
                    target defaults to the other format. Text output goes to stdout unless\n\
                    -o is given; binary output always needs -o.\n\n\
                    When the input is a directory, -o names the output directory and every\n\
                    file with a known extension is converted, keeping relative paths.\n\n\
                    Examples:\n  \
                    ibx convert level.dat                 # XML to stdout\n  \
                    ibx convert level.xml -o level.dat    # XML to binary\n  \
                    ibx convert data/ -o out/             # Whole tree"
                )
                .arg(
                    Arg::new("input")
                        .help("Input file or directory")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (defaults to the other format)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file or directory (defaults to stdout)")
                        .long_help(
                            "Path to write the converted output.\n\n\
                            If it names an existing directory, the output file is placed inside\n\
                            it with the input's name and the target extension."
                        )
                        .value_hint(ValueHint::AnyPath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Dump the tables or the decoded tree of a file")
                .long_about(
                    "Views:\n  \
                    - tables:    Encoding marker, String Table and Typed Value Table (default)\n  \
                    - tree-json: Decoded tree as JSON\n\n\
                    XML input is encoded first, so 'tables' shows what conversion would write.\n\n\
                    Examples:\n  \
                    ibx inspect level.dat              # Tables\n  \
                    ibx inspect level.xml tree-json    # Tree as JSON"
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the input file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .help("View to render. Defaults to 'tables'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            inspect::AVAILABLE_VIEWS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare input path means the convert subcommand
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    // Global flags given after the subcommand only land in its matches
    let scope = matches.subcommand().map(|(_, m)| m).unwrap_or(&matches);

    if scope.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let mut config = load_cli_config(scope.get_one::<String>("config").map(|s| s.as_str()));
    merge_direct_flags(scope, &mut extra_params);
    if let Err(err) = apply_config_overrides(&mut config, &mut extra_params) {
        fail(err);
    }
    logging::init_tracing(config.trace.debug);
    for key in extra_params.keys() {
        warn!("Ignoring unknown parameter --extra-{key}");
    }

    let registry = FormatRegistry::default();
    let options = config.format_options();

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                fail("input is required");
            };
            let from = sub_matches.get_one::<String>("from").map(|s| s.as_str());
            let to = sub_matches.get_one::<String>("to").map(|s| s.as_str());
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            for format in from.iter().chain(to.iter()) {
                if let Err(e) = registry.get(format) {
                    fail(e);
                }
            }

            if Path::new(input).is_dir() {
                handle_batch_command(&registry, input, from, to, output, &options, &config);
            } else {
                handle_convert_command(&registry, input, from, to, output, &options, &config);
            }
        }
        Some(("inspect", sub_matches)) => {
            let Some(path) = sub_matches.get_one::<String>("path") else {
                fail("path is required");
            };
            let view = sub_matches
                .get_one::<String>("view")
                .map(|s| s.as_str())
                .unwrap_or(inspect::DEFAULT_VIEW);
            let from = sub_matches.get_one::<String>("from").map(|s| s.as_str());
            handle_inspect_command(&registry, path, from, view, &options);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn resolve_from(registry: &FormatRegistry, input: &str, from: Option<&str>) -> String {
    if let Some(from) = from {
        return from.to_string();
    }
    registry
        .detect_format_from_filename(input)
        .unwrap_or_else(|| {
            eprintln!("Error: Could not detect format from filename '{input}'");
            eprintln!("Please specify --from explicitly");
            std::process::exit(1);
        })
}

/// Where a single-file conversion writes. An existing directory gets the
/// input's file name with the target extension.
fn resolve_output(output: &str, input: &str, extension: &str) -> PathBuf {
    let output = Path::new(output);
    if output.is_dir() {
        let name = Path::new(input)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("output"));
        return output.join(name.with_extension(extension));
    }
    output.to_path_buf()
}

fn extension_for<'a>(config: &'a IbxConfig, format: &str) -> &'a str {
    if format == "ibx" {
        &config.batch.binary_extension
    } else {
        &config.batch.text_extension
    }
}

fn handle_convert_command(
    registry: &FormatRegistry,
    input: &str,
    from: Option<&str>,
    to: Option<&str>,
    output: Option<&str>,
    options: &FormatOptions,
    config: &IbxConfig,
) {
    let from = resolve_from(registry, input, from);
    let to = to.unwrap_or_else(|| counterpart(&from));

    let source = fs::read(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    let (bytes, outcome) =
        convert_bytes(registry, &source, &from, to, options).unwrap_or_else(|e| fail(e));
    if let FileOutcome::Unchanged(reason) = &outcome {
        warn!("{input}: {reason}; copying input unchanged");
    }

    match output {
        Some(path) => {
            let target = resolve_output(path, input, extension_for(config, to));
            debug!(input, output = %target.display(), "writing");
            fs::write(&target, bytes).unwrap_or_else(|e| {
                eprintln!("Error writing file '{}': {e}", target.display());
                std::process::exit(1);
            });
        }
        None if to == "ibx" && outcome == FileOutcome::Converted => {
            fail("Binary output requires an output file. Use -o <path>.");
        }
        None => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout.write_all(&bytes).and_then(|_| stdout.flush()) {
                fail(format!("writing to stdout failed: {e}"));
            }
        }
    }
}

fn handle_batch_command(
    registry: &FormatRegistry,
    input: &str,
    from: Option<&str>,
    to: Option<&str>,
    output: Option<&str>,
    options: &FormatOptions,
    config: &IbxConfig,
) {
    let Some(output) = output else {
        fail("Converting a directory requires an output directory. Use -o <dir>.");
    };
    let job = BatchJob {
        registry,
        options: *options,
        from,
        to,
        binary_extension: &config.batch.binary_extension,
        text_extension: &config.batch.text_extension,
    };
    let mut stdout = io::stdout().lock();
    let summary = job
        .run(Path::new(input), Path::new(output), &mut stdout)
        .and_then(|summary| stdout.flush().map(|_| summary))
        .unwrap_or_else(|e| fail(e));
    if summary.failed > 0 {
        std::process::exit(1);
    }
}

fn handle_inspect_command(
    registry: &FormatRegistry,
    path: &str,
    from: Option<&str>,
    view: &str,
    options: &FormatOptions,
) {
    let from = resolve_from(registry, path, from);
    let source = fs::read(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    });

    let output =
        inspect::execute_view(registry, &source, &from, view, options).unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

fn handle_list_formats_command() {
    let registry = FormatRegistry::default();
    println!("Available formats:");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!(
                "  {name:<6}{} (.{})",
                format.description(),
                format.file_extensions().join(", .")
            );
        }
    }

    println!("\nInspect views:");
    for view in inspect::AVAILABLE_VIEWS {
        println!("  {view}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> IbxConfig {
    let loader = Loader::new().with_optional_file("ibx.toml");
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

/// Fold `--hex8` and friends into the extras so one code path applies them.
fn merge_direct_flags(matches: &ArgMatches, extra_params: &mut HashMap<String, String>) {
    for flag in DIRECT_FLAGS {
        if matches.get_flag(flag) {
            extra_params.insert(flag.to_string(), "true".to_string());
        }
    }
}

fn apply_config_overrides(
    config: &mut IbxConfig,
    extra_params: &mut HashMap<String, String>,
) -> Result<(), String> {
    if let Some(raw) = extra_params.remove("hex8") {
        config.decode.hex8 = parse_bool_arg("hex8", &raw)?;
    }
    if let Some(raw) = extra_params.remove("hex16") {
        config.decode.hex16 = parse_bool_arg("hex16", &raw)?;
    }
    if let Some(raw) = extra_params.remove("hex32") {
        config.decode.hex32 = parse_bool_arg("hex32", &raw)?;
    }

    if let Some(raw) = take_override(extra_params, &["share"]) {
        config.encode.share = parse_bool_arg("share", &raw)?;
    }
    if let Some(raw) = take_override(extra_params, &["noshare", "no-share"]) {
        if parse_bool_arg("noshare", &raw)? {
            config.encode.share = false;
        }
    }

    if let Some(raw) = take_override(extra_params, &["encoding-marker", "encoding"]) {
        config.encode.encoding_marker = parse_byte_arg("encoding-marker", &raw)?;
    }

    if let Some(raw) = take_override(extra_params, &["debug", "trace"]) {
        config.trace.debug = parse_bool_arg("debug", &raw)?;
    }

    Ok(())
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> Result<bool, String> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        other => Err(format!("Invalid boolean value '{other}' for --extra-{flag}")),
    }
}

fn parse_byte_arg(flag: &str, raw: &str) -> Result<u8, String> {
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    };
    parsed.ok_or_else(|| format!("Invalid byte value '{raw}' for --extra-{flag}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_extra_args_empty() {
        let args = strings(&["ibx", "inspect", "level.dat"]);
        let (cleaned, extra) = parse_extra_args(&args);

        assert_eq!(cleaned, args);
        assert!(extra.is_empty());
    }

    #[test]
    fn test_parse_extra_args_single_param() {
        let args = strings(&["ibx", "level.dat", "--extra-encoding-marker", "2"]);
        let (cleaned, extra) = parse_extra_args(&args);

        assert_eq!(cleaned, strings(&["ibx", "level.dat"]));
        assert_eq!(extra.len(), 1);
        assert_eq!(extra.get("encoding-marker"), Some(&"2".to_string()));
    }

    #[test]
    fn test_parse_extra_args_mixed_with_regular_args() {
        let args = strings(&[
            "ibx",
            "convert",
            "level.dat",
            "--to",
            "xml",
            "--extra-hex16",
            "yes",
            "--from",
            "ibx",
        ]);
        let (cleaned, extra) = parse_extra_args(&args);

        assert_eq!(
            cleaned,
            strings(&["ibx", "convert", "level.dat", "--to", "xml", "--from", "ibx"])
        );
        assert_eq!(extra.get("hex16"), Some(&"yes".to_string()));
    }

    #[test]
    fn test_parse_extra_args_boolean_flags() {
        let args = strings(&[
            "ibx",
            "level.dat",
            "--extra-hex8",
            "--extra-encoding-marker",
            "0x02",
            "--extra-noshare",
        ]);
        let (cleaned, extra) = parse_extra_args(&args);

        assert_eq!(cleaned, strings(&["ibx", "level.dat"]));
        assert_eq!(extra.len(), 3);
        assert_eq!(extra.get("hex8"), Some(&"true".to_string()));
        assert_eq!(extra.get("encoding-marker"), Some(&"0x02".to_string()));
        assert_eq!(extra.get("noshare"), Some(&"true".to_string()));
    }

    #[test]
    fn test_parse_extra_args_allows_extras_alias() {
        let args = strings(&["ibx", "level.xml", "--extras-share", "false"]);
        let (cleaned, extra) = parse_extra_args(&args);

        assert_eq!(cleaned, strings(&["ibx", "level.xml"]));
        assert_eq!(extra.get("share"), Some(&"false".to_string()));
    }

    #[test]
    fn apply_config_overrides_updates_known_flags() {
        let mut config = load_cli_config(None);
        let mut extras = HashMap::new();
        extras.insert("hex8".to_string(), "true".to_string());
        extras.insert("hex32".to_string(), "1".to_string());
        extras.insert("no-share".to_string(), "true".to_string());
        extras.insert("encoding-marker".to_string(), "0x02".to_string());
        extras.insert("debug".to_string(), "yes".to_string());

        apply_config_overrides(&mut config, &mut extras).unwrap();

        assert!(config.decode.hex8);
        assert!(!config.decode.hex16);
        assert!(config.decode.hex32);
        assert!(!config.encode.share);
        assert_eq!(config.encode.encoding_marker, 0x02);
        assert!(config.trace.debug);
        assert!(extras.is_empty());
    }

    #[test]
    fn apply_config_overrides_leaves_unknown_keys() {
        let mut config = load_cli_config(None);
        let mut extras = HashMap::new();
        extras.insert("colour".to_string(), "true".to_string());

        apply_config_overrides(&mut config, &mut extras).unwrap();

        assert!(config.encode.share);
        assert_eq!(extras.get("colour"), Some(&"true".to_string()));
    }

    #[test]
    fn apply_config_overrides_rejects_bad_values() {
        let mut config = load_cli_config(None);
        let mut extras = HashMap::new();
        extras.insert("hex8".to_string(), "maybe".to_string());
        assert_eq!(
            apply_config_overrides(&mut config, &mut extras).unwrap_err(),
            "Invalid boolean value 'maybe' for --extra-hex8"
        );

        let mut extras = HashMap::new();
        extras.insert("encoding-marker".to_string(), "256".to_string());
        assert!(apply_config_overrides(&mut config, &mut extras).is_err());
    }

    #[test]
    fn resolve_output_into_directory() {
        let dir = std::env::temp_dir();
        let target = resolve_output(dir.to_str().unwrap(), "data/level.dat", "xml");
        assert_eq!(target, dir.join("level.xml"));
        assert_eq!(
            resolve_output("out.xml", "level.dat", "xml"),
            PathBuf::from("out.xml")
        );
    }

    #[test]
    fn cli_definition_is_valid() {
        build_cli().debug_assert();
    }
}
