//! Kivela API Server
//!
//! Main entry point for the Kivela ledger backend.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kivela_api::{AppState, create_router};
use kivela_core::LedgerEngine;
use kivela_shared::types::{AccountId, Money};
use kivela_shared::{AppConfig, JwtService};
use kivela_store::{AccountRecord, LedgerStore, MemoryStore, NotificationCreated};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kivela=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Create the account store
    let store = Arc::new(MemoryStore::new());

    if config.server.seed_demo_accounts {
        seed_accounts(&store, &config)?;
    } else if config.ledger.treasury_account_id.is_none() {
        warn!("no treasury account configured, credit requests will fail");
    }

    // Delivery worker: observes committed notifications and hands each one
    // to the push provider per registered target. Delivery failures never
    // affect committed operations.
    tokio::spawn(run_delivery_worker(
        store.clone(),
        store.notification_feed(),
    ));

    // Create the engine and services
    let engine = LedgerEngine::new(store.clone(), config.ledger.clone());
    let jwt_service = JwtService::new(config.auth.clone());

    // Create application state
    let state = AppState {
        engine: Arc::new(engine),
        jwt_service: Arc::new(jwt_service),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Seeds the treasury and a couple of demo accounts (development only;
/// account opening is otherwise a collaborator concern).
fn seed_accounts(store: &MemoryStore, config: &AppConfig) -> anyhow::Result<()> {
    if let Some(treasury_id) = config.ledger.treasury_account_id {
        if store.get_account(treasury_id).is_none() {
            store.insert_account(AccountRecord::new(
                treasury_id,
                "Kivela Treasury",
                Money::ZERO,
            ))?;
            info!(%treasury_id, "seeded treasury account");
        }
    } else {
        warn!("no treasury account configured, credit requests will fail");
    }

    for (name, balance) in [
        ("Demo Alice", Money::from_minor_units(1_000_000)),
        ("Demo Bruno", Money::from_minor_units(250_000)),
    ] {
        let record = AccountRecord::new(AccountId::new(), name, balance);
        info!(account_id = %record.id, name, "seeded demo account");
        store.insert_account(record)?;
    }

    Ok(())
}

/// Forwards committed notifications to the account's registered push
/// targets. Pruning permanently-invalid targets is the push provider's
/// responsibility, not this worker's.
async fn run_delivery_worker(
    store: Arc<MemoryStore>,
    mut feed: broadcast::Receiver<NotificationCreated>,
) {
    loop {
        match feed.recv().await {
            Ok(event) => {
                let Some(account) = store.get_account(event.account_id) else {
                    warn!(account_id = %event.account_id, "notification for unknown account");
                    continue;
                };
                if account.notification_targets.is_empty() {
                    debug!(account_id = %event.account_id, "no push targets registered");
                    continue;
                }
                for target in &account.notification_targets {
                    info!(
                        account_id = %event.account_id,
                        target,
                        title = %event.notification.title,
                        "dispatching push notification"
                    );
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "delivery worker lagged behind the notification feed");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
