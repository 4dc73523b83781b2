// bases/embed_shim/src/main.rs
use clap::Parser;
use embed_shim::StreamKind;
use std::path::PathBuf;

/// Run the embedding surface from a terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory relative output paths are resolved against
    #[arg(long, default_value = ".")]
    work_dir: PathBuf,

    /// Tokens forwarded to the embedded tool, e.g. `download "Song Name" --format flac`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let code = embed_shim::run(&args.tokens, &args.work_dir);

    for (kind, line) in embed_shim::drain_logs() {
        match kind {
            StreamKind::Stdout => println!("{}", line),
            StreamKind::Stderr => eprintln!("{}", line),
        }
    }

    std::process::exit(code);
}
