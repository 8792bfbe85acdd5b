//! ledger-host: local host for the legal agreement contract
//!
//! Reads one invocation per line as JSON (`{"function": "...", "args": [...]}`)
//! from a script file or stdin, runs each in its own transaction against an
//! in-memory store, and prints one JSON response per line. The store can be
//! loaded from and saved to a snapshot file so state survives between runs.

use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};

use legal_agreement::store::Inventory;
use legal_agreement::{
    AuditLog, ContractConfig, EventSink, FanoutSink, LegalAgreementContract, MemoryStore,
    Transaction, TracingSink,
};

#[derive(Parser)]
#[command(name = "ledger-host")]
#[command(about = "Run legal agreement contract invocations against a local store")]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, env = "LEDGER_HOST_CONFIG")]
    config: Option<PathBuf>,

    /// Store snapshot, loaded on start and saved on exit
    #[arg(short, long, env = "LEDGER_HOST_STATE")]
    state: Option<PathBuf>,

    /// JSON-lines invocation script (defaults to stdin)
    #[arg(long)]
    script: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct Invocation {
    function: String,
    #[serde(default)]
    args: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("legal_agreement=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            ContractConfig::from_yaml(&content)?
        }
        None => ContractConfig::default(),
    };

    let store = match &cli.state {
        Some(path) if path.exists() => MemoryStore::load_snapshot(path)
            .with_context(|| format!("loading snapshot {}", path.display()))?,
        _ => MemoryStore::new(),
    };
    let inventory = Inventory::take(&store).context("scanning loaded store")?;
    info!(
        records = inventory.records(),
        agreements = inventory.agreements,
        signings = inventory.signings,
        identities = inventory.identities,
        "Store ready"
    );
    if !inventory.is_clean() {
        warn!(
            undecodable = ?inventory.undecodable,
            misplaced = ?inventory.misplaced,
            "Store holds entries that are not well-formed records"
        );
    }

    let audit = Arc::new(AuditLog::with_max_entries(config.audit_max_entries));
    let sink: Arc<dyn EventSink> = Arc::new(
        FanoutSink::new()
            .with(Arc::new(TracingSink::new(config.contract_name.clone())))
            .with(audit.clone()),
    );
    let contract = LegalAgreementContract::with_config(config, sink);

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path)
                .with_context(|| format!("opening script {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (line_no, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let invocation: Invocation = match serde_json::from_str(&line) {
            Ok(invocation) => invocation,
            Err(e) => {
                warn!(line = line_no + 1, error = %e, "Skipping invalid invocation");
                continue;
            }
        };

        let tx = Transaction::new(&store, uuid::Uuid::new_v4().to_string());
        let response = contract.invoke(&tx, &invocation.function, &invocation.args);
        writeln!(out, "{}", serde_json::to_string(&response.to_envelope(tx.tx_id()))?)?;
    }
    out.flush()?;

    let stats = audit.stats();
    info!(
        writes = stats.writes,
        rejections = stats.rejections,
        malformed_skipped = stats.malformed_skipped,
        "Run complete"
    );

    if let Some(path) = &cli.state {
        store
            .save_snapshot(path)
            .with_context(|| format!("saving snapshot {}", path.display()))?;
        info!(path = %path.display(), entries = store.len(), "Saved store snapshot");
    }

    Ok(())
}
