use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of build_cli() in src/main.rs, reduced to what completions need.
// Build scripts can't access src/ modules.
fn file_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn suffix_arg() -> Arg {
    Arg::new("suffix")
        .long("suffix")
        .short('s')
        .allow_hyphen_values(true)
        .value_hint(ValueHint::Other)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("ywcnv")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert yWriter 7 projects to and from office documents")
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .arg(file_arg("file"))
                .arg(suffix_arg()),
        )
        .subcommand(
            Command::new("export")
                .arg(file_arg("project"))
                .arg(suffix_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_parser(["odt", "ods", "html", "csv"]),
                ),
        )
        .subcommand(Command::new("import").arg(file_arg("document")))
        .subcommand(Command::new("new").arg(file_arg("document")))
        .subcommand(Command::new("formats"))
        .subcommand(Command::new("inspect").arg(file_arg("file")));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "ywcnv", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "ywcnv", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "ywcnv", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
