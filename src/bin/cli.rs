//! tapstream CLI
//!
//! Drives a TAP stream against one server and prints decoded events, one
//! per line. The `sync` subcommand is checkpoint-driven: first run dumps
//! everything, later runs backfill from the stored timestamp.

use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use tapstream::checkpoint::{CheckpointStore, FileCheckpointStore};
use tapstream::{Config, Result, TapEvent, TapRequest, TapStream};

/// tapstream CLI
#[derive(Parser, Debug)]
#[command(name = "tapstream-cli")]
#[command(about = "Streaming change-capture client for the TAP replication protocol")]
#[command(version)]
struct Args {
    /// Server address (host[:port[:weight]])
    #[arg(short, long, default_value = "localhost:11210")]
    server: String,

    /// Connect timeout in milliseconds
    #[arg(long, default_value = "15000")]
    connect_timeout_ms: u64,

    /// Per-read timeout in milliseconds
    #[arg(long, default_value = "15000")]
    read_timeout_ms: u64,

    /// Request keys without values
    #[arg(long)]
    keys_only: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// One-shot full snapshot of all stored data
    Dump {
        /// Logical stream name sent to the server
        stream_name: String,
    },

    /// Replay all changes since a timestamp
    Backfill {
        /// Logical stream name sent to the server
        stream_name: String,

        /// Epoch-seconds timestamp to replay from (0 means since epoch)
        #[arg(long)]
        since: u64,
    },

    /// Checkpoint-driven run: dump on first sight, backfill afterwards
    Sync {
        /// Logical node name, used as both checkpoint key and stream name
        node: String,

        /// Directory holding checkpoint files
        #[arg(long, default_value = "./tapstream_data")]
        checkpoint_dir: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tapstream=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    tracing::info!("tapstream v{}", tapstream::VERSION);
    tracing::info!("Server: {}", args.server);

    let mut builder = Config::builder()
        .connect_timeout_ms(args.connect_timeout_ms)
        .read_timeout_ms(args.read_timeout_ms);
    if let Commands::Sync { checkpoint_dir, .. } = &args.command {
        builder = builder.checkpoint_dir(checkpoint_dir);
    }
    let config = builder.build();

    let result = match &args.command {
        Commands::Dump { stream_name } => run_stream(
            &args,
            &config,
            stream_name,
            TapRequest::dump(stream_name.as_str()),
        ),
        Commands::Backfill { stream_name, since } => run_stream(
            &args,
            &config,
            stream_name,
            TapRequest::backfill(stream_name.as_str(), *since),
        ),
        Commands::Sync { node, .. } => sync(&args, &config, node),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Open a stream and drive one request to end-of-stream, printing events
fn run_stream(args: &Args, config: &Config, name: &str, request: TapRequest) -> Result<()> {
    let request = if args.keys_only {
        request.keys_only()
    } else {
        request
    };

    let mut stream = TapStream::open(&args.server, name, config)?;
    let mut sink = |event: TapEvent| print_event(&event);
    stream.run(&request, &mut sink)
}

/// Checkpoint-driven run
///
/// Loads the node's checkpoint to pick dump vs backfill, then persists a
/// new checkpoint even when the run fails, so the next invocation resumes
/// from this attempt rather than replaying everything again.
fn sync(args: &Args, config: &Config, node: &str) -> Result<()> {
    let store = FileCheckpointStore::open(&config.checkpoint_dir)?;

    let request = match store.load(node)? {
        Some(since) => {
            tracing::info!("Backfilling {:?} from timestamp {}", node, since);
            TapRequest::backfill(node, since)
        }
        None => {
            tracing::info!("No checkpoint for {:?}, dumping all data", node);
            TapRequest::dump(node)
        }
    };

    let outcome = run_stream(args, config, node, request);
    if let Err(ref e) = outcome {
        tracing::error!("stream ended abnormally: {}", e);
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    tracing::info!("Setting checkpoint for {:?} to {}", node, now);
    store.store(node, now)?;

    outcome
}

/// Print one decoded event
fn print_event(event: &TapEvent) {
    match event {
        TapEvent::Noop => println!("NOOP"),
        TapEvent::Mutation { key, value } => println!(
            "MUTATION {} ({} bytes)",
            String::from_utf8_lossy(key),
            value.len()
        ),
        TapEvent::Delete { key, .. } => println!("DELETE {}", String::from_utf8_lossy(key)),
        TapEvent::Flush => println!("FLUSH"),
        TapEvent::Opaque => println!("OPAQUE"),
        TapEvent::Unknown { opcode, key, value } => println!(
            "UNKNOWN 0x{:02x} {} ({} bytes)",
            opcode,
            String::from_utf8_lossy(key),
            value.len()
        ),
    }
}
