use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zkp_commitment_tree::{
    config::Config,
    ledger::{snapshot, JsonEventLog},
    proof::prepare_inputs,
    utils::current_unix_timestamp,
    Accumulator, AuthenticationPath, CommitmentRecord, MimcSponge, WitnessOutput,
};

/// Notes are four field elements; anything larger is not a note.
const MAX_NOTE_FILE_SIZE: u64 = 64 * 1024;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON events file; overrides `[ledger] events_file`
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// Note written by generate_commitment
    #[arg(short, long)]
    note: PathBuf,

    /// Overrides `[witness] output_file`
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn load_note(path: &Path) -> Result<CommitmentRecord> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read note file metadata: {}", path.display()))?;
    if metadata.len() > MAX_NOTE_FILE_SIZE {
        return Err(anyhow::anyhow!(
            "Note file too large: {} bytes (max {} bytes)",
            metadata.len(),
            MAX_NOTE_FILE_SIZE
        ));
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read note file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse note file: {}", path.display()))
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
    debug!("Tree depth: {}", config.tree.depth);

    let events_path = args
        .events
        .or_else(|| config.ledger.events_file.clone())
        .context("No events file given: pass --events or set [ledger] events_file")?;
    let output_path = args
        .output
        .unwrap_or_else(|| config.witness.output_file.clone());

    let sponge = Arc::new(MimcSponge::new());
    let accumulator = Accumulator::new(config.tree.depth, Arc::clone(&sponge))
        .context("Failed to initialize accumulator")?;

    let record = load_note(&args.note)?;
    if !record
        .check(sponge.as_ref())
        .context("Failed to recompute note values")?
    {
        return Err(anyhow::anyhow!(
            "Note is inconsistent: commitment or nullifier hash does not match its secrets"
        ));
    }
    println!("Commitment: {}", record.commitment);

    info!("Loading events from: {}", events_path.display());
    let log = JsonEventLog::new(&events_path, config.ledger.max_file_size);
    let leaves = snapshot(&log)?;
    println!(
        "Loaded {} commitments from {}",
        leaves.len(),
        events_path.display()
    );

    println!("Building Merkle tree (depth {})...", accumulator.depth());
    let (input, signals) = prepare_inputs(&accumulator, &leaves, &record)?;
    let leaf_index =
        AuthenticationPath::new(input.path_elements.clone(), input.path_indices.clone())
            .leaf_index()?;

    let witness = WitnessOutput {
        root: signals.root,
        nullifier_hash: signals.nullifier_hash,
        commitment: record.commitment,
        leaf_index,
        depth: accumulator.depth(),
        timestamp: current_unix_timestamp()?,
        input,
    };
    witness
        .validate(&sponge, &config.security)
        .context("Generated witness failed self-validation")?;

    let content =
        serde_json::to_string_pretty(&witness).context("Failed to serialize witness")?;
    fs::write(&output_path, content)
        .with_context(|| format!("Failed to write witness file: {}", output_path.display()))?;

    info!("Witness written to: {}", output_path.display());
    println!("Merkle root: {}", witness.root);
    println!("Leaf index: {}", witness.leaf_index);
    println!("Nullifier hash: {}", witness.nullifier_hash);
    println!("Witness saved to: {}", output_path.display());

    Ok(())
}
