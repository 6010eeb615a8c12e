use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info};
use std::fs;
use std::io::{BufRead, BufReader, Seek, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zkp_commitment_tree::{
    config::Config,
    ledger::{snapshot, JsonEventLog},
    Accumulator, FieldElement, MimcSponge, WitnessOutput,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    witness_file: PathBuf,

    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Published root the witness must match (decimal or 0x-hex)
    #[arg(short, long, conflicts_with = "events")]
    root: Option<String>,

    /// Recompute the expected root from this JSON events file
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// Spent nullifier hashes, one per line
    #[arg(short, long)]
    nullifier_file: Option<PathBuf>,
}

fn check_and_add_nullifier(nullifier_file: &Path, nullifier_hash: &FieldElement) -> Result<()> {
    let file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(nullifier_file)
        .context("Failed to open nullifier file")?;

    let reader = BufReader::new(&file);
    for (line_number, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line from nullifier file")?;
        if line.trim().is_empty() {
            continue;
        }
        let spent: FieldElement = line.parse().with_context(|| {
            format!(
                "Malformed entry on line {} of nullifier file: '{}'",
                line_number + 1,
                line.trim()
            )
        })?;
        if spent == *nullifier_hash {
            return Err(anyhow::anyhow!(
                "Nullifier hash already spent: {nullifier_hash}"
            ));
        }
    }

    let mut writer = std::io::BufWriter::new(&file);
    writer
        .seek(std::io::SeekFrom::End(0))
        .context("Failed to seek to end of file")?;
    writer
        .write_all(nullifier_hash.to_decimal().as_bytes())
        .context("Failed to write nullifier hash")?;
    writer.write_all(b"\n").context("Failed to write newline")?;
    writer.flush().context("Failed to flush writer")?;

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    config.apply_env_overrides()?;
    config.validate().context("Invalid configuration")?;

    if !args.witness_file.exists() {
        return Err(anyhow::anyhow!(
            "Witness file does not exist: {}",
            args.witness_file.display()
        ));
    }

    info!("Loading witness from: {}", args.witness_file.display());
    println!("Loading witness from: {}", args.witness_file.display());

    let metadata =
        fs::metadata(&args.witness_file).context("Failed to read witness file metadata")?;
    debug!("Witness file size: {} bytes", metadata.len());
    if metadata.len() > config.witness.max_file_size {
        return Err(anyhow::anyhow!(
            "Witness file too large: {} bytes (max {} bytes). Raise [witness] max_file_size if this is expected.",
            metadata.len(),
            config.witness.max_file_size
        ));
    }

    let content =
        fs::read_to_string(&args.witness_file).context("Failed to read witness file")?;
    let witness: WitnessOutput =
        serde_json::from_str(&content).context("Failed to parse witness JSON")?;

    if witness.depth != config.tree.depth {
        return Err(anyhow::anyhow!(
            "Witness depth {} does not match configured tree depth {}",
            witness.depth,
            config.tree.depth
        ));
    }

    let sponge = Arc::new(MimcSponge::new());
    witness
        .validate(&sponge, &config.security)
        .context("Witness validation failed. The witness is malformed or its values are inconsistent.")?;
    info!("Witness validation passed");

    println!("Witness details:");
    println!("  Merkle Root: {}", witness.root);
    println!("  Nullifier Hash: {}", witness.nullifier_hash);
    println!("  Leaf Index: {}", witness.leaf_index);
    println!("  Timestamp: {}", witness.timestamp);

    let expected_root = match (&args.root, &args.events) {
        (Some(root), _) => Some(
            root.parse::<FieldElement>()
                .with_context(|| format!("Failed to parse --root '{root}'"))?,
        ),
        (None, Some(events_path)) => {
            let accumulator = Accumulator::new(config.tree.depth, Arc::clone(&sponge))?;
            let log = JsonEventLog::new(events_path, config.ledger.max_file_size);
            Some(accumulator.root(&snapshot(&log)?)?)
        }
        (None, None) => None,
    };

    if let Some(expected_root) = expected_root {
        if expected_root != witness.root {
            error!(
                "Root mismatch: expected {}, witness has {}",
                expected_root, witness.root
            );
            println!("\n✗ Witness root does not match the expected root!");
            return Err(anyhow::anyhow!(
                "Witness root {} does not match expected root {}",
                witness.root,
                expected_root
            ));
        }
        info!("Witness root matches expected root");
    }

    println!("\n✓ Witness verification PASSED!");

    let nullifier_path = args.nullifier_file.unwrap_or_else(|| {
        let mut path = args.witness_file.clone();
        path.set_extension("nullifiers.txt");
        path
    });
    check_and_add_nullifier(&nullifier_path, &witness.nullifier_hash).with_context(|| {
        format!(
            "Failed to record nullifier hash to: {}",
            nullifier_path.display()
        )
    })?;
    info!("Nullifier hash recorded to: {}", nullifier_path.display());
    println!("Nullifier hash recorded to: {}", nullifier_path.display());

    Ok(())
}
