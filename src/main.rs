use clap::Parser;
use outline_babel::cli::{run_conversion, ConvertOptions, Target, Verbosity};
use outline_babel::{get_generator_types, get_parser_types};

use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Type of output (e.g., xmind, xlsx, dir_tree). Defaults to the one matching the output extension
    #[arg(short = 't', long, value_name = "TYPE")]
    to_type: Option<String>,

    /// Print the parsed tree instead of writing an output file
    #[arg(long, conflicts_with = "output")]
    dump: bool,

    /// Fill all cells with white color (xlsx output)
    #[arg(long = "to-shironuri", default_value_t = false)]
    to_shironuri: bool,

    /// Report each conversion stage on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Report format detection details on stderr
    #[arg(long)]
    debug: bool,

    /// List available input/output types
    #[arg(short = 'l', long)]
    list_type: bool,

    /// Input file
    #[arg(required_unless_present = "list_type")]
    input: Option<PathBuf>,

    /// Output file (a directory for dir_tree)
    #[arg(required_unless_present_any = ["dump", "list_type"])]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.list_type {
        println!("type of input:");
        println!("{}", get_parser_types().join(" "));
        println!();
        println!("type of output:");
        println!("{}", get_generator_types().join(" "));
        println!();
        return Ok(());
    }

    let options = ConvertOptions {
        to_type: cli.to_type,
        to_shironuri: cli.to_shironuri,
        verbosity: Verbosity::from_flags(cli.verbose, cli.debug),
    };
    let Some(input) = cli.input else {
        anyhow::bail!("No input file given");
    };

    match cli.output {
        Some(output) if !cli.dump => run_conversion(&input, Target::File(&output), options)?,
        _ => {
            let mut stdout = io::stdout().lock();
            run_conversion(&input, Target::Dump(&mut stdout), options)?;
        }
    }

    Ok(())
}
