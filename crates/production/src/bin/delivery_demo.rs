//! Modifier delivery demo.
//!
//! Requests a batch of modifiers from a handful of simulated peers. Some
//! peers never answer; the runner retries on timeout and finally reports
//! those modifiers as failed deliveries.

use anyhow::{bail, Context};
use clap::Parser;
use modsync_core::{ModifierStatus, ModifierStore, Notification};
use modsync_delivery::DeliveryConfig;
use modsync_production::{init_tracing, DeliveryRunner, SharedStore, DEFAULT_FILTER};
use modsync_types::{ModifierId, ModifierTypeId, PeerId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "modsync-delivery-demo")]
#[command(about = "Simulate modifier requests against unreliable peers")]
#[command(version)]
struct Args {
    /// TOML file with delivery settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Delivery timeout in milliseconds (overrides the config file)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Checks before giving up (overrides the config file)
    #[arg(long)]
    max_checks: Option<u32>,

    /// Number of modifiers to request
    #[arg(short, long, default_value = "50")]
    modifiers: u64,

    /// Number of simulated peers
    #[arg(long, default_value = "4")]
    peers: u64,

    /// Probability that a peer never answers a request (0.0 to 1.0)
    #[arg(long, default_value = "0.2")]
    drop_rate: f64,

    /// RNG seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

/// History store shared between the simulated node and the runner.
#[derive(Default)]
struct History(Mutex<HashSet<ModifierId>>);

impl History {
    fn insert(&self, id: ModifierId) {
        if let Ok(mut ids) = self.0.lock() {
            ids.insert(id);
        }
    }
}

impl ModifierStore for History {
    fn contains(&self, id: &ModifierId) -> bool {
        self.0.lock().map(|ids| ids.contains(id)).unwrap_or(false)
    }
}

fn load_config(args: &Args) -> anyhow::Result<DeliveryConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            DeliveryConfig::from_toml_str(&text)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        // Short enough for the demo to finish in seconds
        None => DeliveryConfig::new(Duration::from_millis(200), 3),
    };

    if let Some(ms) = args.timeout_ms {
        config.delivery_timeout = Duration::from_millis(ms);
    }
    if let Some(checks) = args.max_checks {
        config.max_delivery_checks = checks;
    }
    config.validate()?;

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(DEFAULT_FILTER).map_err(|e| anyhow::anyhow!(e))?;

    if !(0.0..=1.0).contains(&args.drop_rate) {
        bail!("--drop-rate must be between 0.0 and 1.0");
    }
    if args.peers == 0 {
        bail!("--peers must be at least 1");
    }
    let config = load_config(&args)?;
    info!(?config, modifiers = args.modifiers, peers = args.peers, "Starting demo");

    let history = Arc::new(History::default());
    let stores = vec![history.clone() as SharedStore];
    let (runner, handle, mut notifications) = DeliveryRunner::new(config.clone(), stores);
    let runner_task = tokio::spawn(runner.run());

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut by_peer: BTreeMap<PeerId, Vec<ModifierId>> = BTreeMap::new();
    let mut all_ids = Vec::new();
    for n in 0..args.modifiers {
        let id = ModifierId::of_content(format!("modifier-{n}").as_bytes());
        let peer = PeerId(rng.gen_range(0..args.peers));
        by_peer.entry(peer).or_default().push(id);
        all_ids.push(id);
    }

    let mut expected_failures = 0usize;
    let mut deliveries = Vec::new();
    for (peer, ids) in by_peer {
        handle.request(Some(peer), ModifierTypeId::HEADER, ids.clone())?;

        for id in ids {
            if rng.gen_bool(args.drop_rate) {
                expected_failures += 1;
                continue;
            }
            // Answer within one timeout so the first check never fires
            let delay = config.delivery_timeout.mul_f64(rng.gen_range(0.1..0.9));
            let handle = handle.clone();
            let history = history.clone();
            deliveries.push(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                handle.received(id, Some(peer))?;
                history.insert(id);
                handle.applied(id)
            }));
        }
    }

    for delivery in deliveries {
        delivery.await??;
    }

    let mut failed = Vec::new();
    while failed.len() < expected_failures {
        match notifications.recv().await {
            Some(Notification::DeliveryFailed { id, peer, checks, .. }) => {
                info!(%id, ?peer, checks, "Modifier never arrived");
                failed.push(id);
            }
            Some(_) => {}
            None => bail!("delivery runner stopped early"),
        }
    }

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for id in &all_ids {
        handle.query_status(*id)?;
        let status = loop {
            match notifications.recv().await {
                Some(Notification::Status { status, .. }) => break status,
                Some(_) => {}
                None => bail!("delivery runner stopped early"),
            }
        };
        *counts.entry(status.as_str()).or_default() += 1;
    }

    drop(handle);
    let info = runner_task.await?;

    println!("Requested {} modifiers", all_ids.len());
    println!(
        "  held:   {}",
        counts.get(ModifierStatus::Held.as_str()).copied().unwrap_or(0)
    );
    println!("  failed: {}", failed.len());
    for (status, count) in &counts {
        println!("  status {status}: {count}");
    }
    println!("Tracker at exit: {info}");

    Ok(())
}
