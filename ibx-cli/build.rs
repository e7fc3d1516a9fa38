use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the views from src/inspect.rs
// Build scripts can't access src/ modules
const AVAILABLE_VIEWS: &[&str] = &["tables", "tree-json"];

fn global_flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .action(ArgAction::SetTrue)
        .global(true)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("ibx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert IBX1 binary documents to XML and back")
        .arg_required_else_help(true)
        .arg(global_flag("list-formats", "List available formats and inspect views"))
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an ibx.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(global_flag("debug", "Log every table entry and tree node to stderr"))
        .arg(global_flag("hex8", "Write int8 values as hex in XML"))
        .arg(global_flag("hex16", "Write int16 values as hex in XML"))
        .arg(global_flag("hex32", "Write int32 values as hex in XML"))
        .arg(global_flag(
            "noshare",
            "Give every property its own typed value slot when encoding",
        ))
        .subcommand(
            Command::new("convert")
                .about("Convert between IBX1 and XML (default command)")
                .arg(
                    Arg::new("input")
                        .help("Input file or directory")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(Arg::new("from").long("from").help("Source format"))
                .arg(Arg::new("to").long("to").help("Target format"))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file or directory")
                        .value_hint(ValueHint::AnyPath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Dump the tables or the decoded tree of a file")
                .arg(
                    Arg::new("path")
                        .help("Path to the input file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .help("View to render")
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_VIEWS))
                        .index(2),
                )
                .arg(Arg::new("from").long("from").help("Source format")),
        );

    generate_to(Bash, &mut cmd, "ibx", &outdir)?;
    generate_to(Zsh, &mut cmd, "ibx", &outdir)?;
    generate_to(Fish, &mut cmd, "ibx", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
