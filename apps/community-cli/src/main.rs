//! community: interactive front desk for a gated community.
//!
//! Seeds the registry with the community's houses and services, mirrors every
//! change into the configured store, and serves a numbered menu on stdin/stdout.
//! Logs go to stderr so they never interleave with the menu.
//!
//! Run:
//! ```bash
//! # sqlite file in the working directory (default)
//! cargo run -p community-cli
//!
//! # nothing written to disk, replies as JSON
//! STORAGE_PROVIDER=memory OUTPUT_FORMAT=json cargo run -p community-cli
//! ```
//!
//! Configuration: See `config.rs` for all environment variables.

mod config;
mod desk;
mod store;

use std::io;

use domain::registry::Community;
use domain::seed;
use domain::service::CommunityService;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::store::AnyStore;

fn init_tracing(cfg: &config::Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        config::LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(io::stderr),
                )
                .init();
        }
        config::LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }
}

/// Build the service and load the startup houses and services.
fn seeded_service(cfg: &config::Config, store: AnyStore) -> CommunityService<AnyStore> {
    let mut svc = CommunityService::new(Community::new(cfg.community_name.clone()), store);
    for house in seed::houses() {
        let id = house.id;
        if let Some(e) = svc.seed_house(house).mirror_error {
            warn!(house_id = id, err = %e, "failed to mirror seeded house");
        }
    }
    for service in seed::services() {
        let id = service.id;
        if let Some(e) = svc.seed_service(service).mirror_error {
            warn!(service_id = id, err = %e, "failed to mirror seeded service");
        }
    }
    svc
}

fn main() {
    // Load and validate config first (fail fast on misconfiguration)
    let cfg = match config::Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&cfg);
    cfg.warn_if_ephemeral();

    let store = AnyStore::from_config(&cfg);
    info!(store = store.kind(), community = %cfg.community_name, "{}", domain::about());
    let mut svc = seeded_service(&cfg, store);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Err(e) = desk::run_menu(&mut svc, cfg.output_format, stdin.lock(), &mut stdout) {
        eprintln!("io error: {}", e);
        std::process::exit(1);
    }
}
