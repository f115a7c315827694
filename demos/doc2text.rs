/// Example: Extract the text of legacy Word documents (.doc)
///
/// Prints the text of every file given on the command line. With
/// `--list-streams` the container directory is printed instead.
///
/// Usage:
///   cargo run --example doc2text -- document.doc
///   cargo run --example doc2text -- --list-streams document.doc
///   RUST_LOG=debug cargo run --example doc2text -- --raw-fields a.doc b.doc
use clap::Parser;
use oletext::TextConverter;
use oletext::doc::{ExtractOptions, Package};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "doc2text", about = "Extract plain text from legacy .doc files")]
struct Cli {
    /// Files to read
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print the container directory instead of the text
    #[arg(long)]
    list_streams: bool,

    /// Keep field code text instead of showing field results
    #[arg(long)]
    raw_fields: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let options = ExtractOptions::new().with_resolve_fields(!cli.raw_fields);

    let mut failed = false;
    for path in &cli.files {
        if cli.files.len() > 1 {
            println!("==> {} <==", path.display());
        }

        let package = match Package::open(path) {
            Ok(pkg) => pkg.with_options(options),
            Err(e) => {
                eprintln!("Error opening {}: {}", path.display(), e);
                failed = true;
                continue;
            },
        };

        if cli.list_streams {
            for entry in package.ole_file().entries() {
                println!(
                    "{:>4}  {:<10} {:>10}  {}",
                    entry.sid,
                    format!("{:?}", entry.entry_type),
                    entry.size,
                    entry.name
                );
            }
            continue;
        }

        match package.parse() {
            Ok(Some(text)) => println!("{}", text),
            Ok(None) => eprintln!("{}: no Word text found", path.display()),
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                failed = true;
            },
        }
    }

    if failed {
        process::exit(1);
    }
}
