use clap::Parser;
use sio::debug::{walk_file, WalkOptions, DEFAULT_MAX_DEPTH};
use sio::{SioFile, SioType, TypeRegistry};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sio", about = "Print the frame tree of an SIO file")]
struct Cli {
    /// SIO file to read
    input: PathBuf,
    /// Require this 4-byte type (hex, e.g. cafebabe)
    #[arg(long = "type", value_name = "HEX8", conflicts_with = "content_type")]
    sio_type: Option<SioType>,
    /// Require the type derived from this content-type descriptor
    #[arg(long)]
    content_type: Option<String>,
    /// Emit the tree as JSON instead of indented text
    #[arg(long)]
    json: bool,
    /// Frames nested deeper than this are dumped as raw bytes
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Treat Field payloads as opaque
    #[arg(long)]
    opaque_fields: bool,
    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut file = match (cli.sio_type, &cli.content_type) {
        (Some(ty), _)    => SioFile::with_type(ty),
        (None, Some(ct)) => SioFile::for_content_type(&TypeRegistry::open(), ct)?,
        (None, None)     => SioFile::open(),
    };

    {
        let mut reader = BufReader::new(File::open(&cli.input)?);
        file.read(&mut reader)?;
        let trailing = reader.fill_buf()?.len();
        if trailing > 0 {
            warn!(path = %cli.input.display(), "bytes follow the top-level frame; ignored");
        }
    }
    info!(
        path = %cli.input.display(),
        len = file.body().data().len(),
        "read sio file"
    );

    let opts = WalkOptions {
        max_depth:        cli.max_depth,
        decompose_fields: !cli.opaque_fields,
    };
    let tree = walk_file(&file, &opts);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print!("{}", tree);
    }
    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
