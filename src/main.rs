use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use tracing::{info, warn};

mod extract;
mod logging;
mod profile;
mod render;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "anchor-extract")]
#[command(about = "Extract anchored messages from escaped job logs", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the payload message from a log blob.
    Extract(ExtractArgs),
    /// List the built-in profiles.
    Profiles,
}

#[derive(Args)]
struct ExtractArgs {
    /// Log file to read, or `-` for stdin.
    input: String,

    /// Built-in profile name (default: error-message).
    #[arg(long, conflicts_with = "profile_file")]
    profile_name: Option<String>,

    /// JSON profile file.
    #[arg(long = "profile")]
    profile_file: Option<String>,

    /// Override the profile's anchor phrase.
    #[arg(long)]
    anchor: Option<String>,

    /// Override the number of lines between anchor and payload.
    #[arg(long)]
    offset: Option<usize>,

    /// Print the raw payload line (or why none was found) to stderr.
    #[arg(long)]
    show_payload: bool,

    #[arg(short = 'o', long)]
    out: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.cmd {
        Commands::Extract(args) => {
            run_extract(&args, &mut io::stdout().lock(), &mut io::stderr().lock())?;
        }
        Commands::Profiles => {
            print!("{}", render::render_profile_table(&profile::builtin::all()));
        }
    }

    Ok(())
}

/// Run one extraction. The result goes to `stdout` unless `-o` is given;
/// `--show-payload` diagnostics go to `diag`.
fn run_extract(args: &ExtractArgs, stdout: &mut dyn Write, diag: &mut dyn Write) -> Result<()> {
    // 1) Pick profile, apply overrides.
    let mut selected =
        profile::resolve(args.profile_name.as_deref(), args.profile_file.as_deref())?;
    selected.override_anchor(args.anchor.clone(), args.offset)?;
    info!(profile = %selected.name, anchor = %selected.extractor.anchor.phrase, "running extraction");

    // 2) Read input. Read failures are fatal.
    let text = read_input(&args.input)?;

    if args.show_payload {
        match selected.extractor.locate(&text) {
            Ok(payload) => writeln!(diag, "payload line {}: {}", payload.index, payload.text)?,
            Err(err) => writeln!(diag, "no payload line: {}", err)?,
        }
    }

    // 3) Extract + render.
    let extracted = selected.extractor.extract(&text);
    if extracted.is_empty() {
        warn!(input = %args.input, "nothing extracted");
    }
    let rendered = render::render_extracted(&extracted)?;

    match &args.out {
        Some(out) => {
            fs::write(out, rendered).with_context(|| format!("write output file {}", out))?;
            info!("wrote {}", out);
        }
        None => stdout.write_all(rendered.as_bytes())?,
    }
    Ok(())
}

/// Read the whole input from a file, or from stdin when `path` is `-`.
///
/// Invalid UTF-8 is replaced with U+FFFD rather than rejected.
fn read_input(path: &str) -> Result<String> {
    let bytes = if path == "-" {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("read log from stdin")?;
        bytes
    } else {
        fs::read(path).with_context(|| format!("read log file {}", path))?
    };
    Ok(decode_lossy(path, bytes))
}

fn decode_lossy(path: &str, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            let bytes = err.into_bytes();
            warn!(input = path, "input is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }
}
