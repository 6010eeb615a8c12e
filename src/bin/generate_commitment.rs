use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use rand::rngs::OsRng;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use zkp_commitment_tree::{
    config::Config,
    ledger::{InMemoryEventLog, JsonEventLog},
    Accumulator, CommitmentRecord, MimcSponge,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Where to write the note (nullifier, secret, commitment, nullifierHash)
    #[arg(short, long, default_value = "note.json")]
    output: PathBuf,

    /// Append the new commitment to this JSON events file
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            Config::load_from_file(path)?
        }
        None => Config::default(),
    };
    config.apply_env_overrides()?;
    config.validate().context("Invalid configuration")?;

    let sponge = Arc::new(MimcSponge::new());
    let accumulator = Accumulator::new(config.tree.depth, Arc::clone(&sponge))
        .context("Failed to initialize accumulator")?;
    debug!(
        "Tree depth {} holds {} commitments",
        accumulator.depth(),
        accumulator.capacity()
    );

    let record = CommitmentRecord::generate(&mut OsRng, sponge.as_ref())
        .context("Failed to derive commitment")?;
    debug!("Generated {record:?}");

    // Append first so a full tree leaves no orphaned note behind.
    let events_file = args.events.or(config.ledger.events_file);
    if let Some(events_path) = events_file {
        let mut log = if events_path.exists() {
            let existing = JsonEventLog::new(&events_path, config.ledger.max_file_size);
            InMemoryEventLog::from_source_with_capacity(&existing, accumulator.capacity())?
        } else {
            InMemoryEventLog::with_capacity(accumulator.capacity())
        };
        let leaf_index = log.append(record.commitment)?.leaf_index;
        log.save_to_file(&events_path)?;
        info!(
            "Commitment appended to {} at leaf index {}",
            events_path.display(),
            leaf_index
        );
    }

    let note = serde_json::to_string_pretty(&record).context("Failed to serialize note")?;
    fs::write(&args.output, note)
        .with_context(|| format!("Failed to write note file: {}", args.output.display()))?;
    info!("Note written to: {}", args.output.display());

    println!("Commitment: {}", record.commitment);
    println!("Nullifier hash: {}", record.nullifier_hash);
    println!("Note saved to: {}", args.output.display());
    println!("Keep the note private: it is required to spend this commitment.");

    Ok(())
}
