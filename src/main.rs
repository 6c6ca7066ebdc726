//! studio-ledger server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use studio_ledger::api;
use studio_ledger::app_state::AppState;
use studio_ledger::config::LedgerConfig;
use studio_ledger::domain::{Catalog, EventBus, MembershipRegistry, ScheduleRegistry, UserRegistry};
use studio_ledger::integrations::{LogNotifier, Notifier, PaymentGateway, SimulatedPayments};
use studio_ledger::persistence::{PostgresPersistence, spawn_event_recorder};
use studio_ledger::seed;
use studio_ledger::service::{AccountService, LedgerService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = LedgerConfig::from_env().context("invalid LISTEN_ADDR")?;
    tracing::info!(addr = %config.listen_addr, "starting studio-ledger");

    // Build domain layer
    let event_bus = EventBus::new(config.event_bus_capacity);
    let users = Arc::new(UserRegistry::new());

    // Build service layer
    let ledger = Arc::new(LedgerService::new(
        Arc::new(ScheduleRegistry::new()),
        Arc::new(MembershipRegistry::new()),
        Arc::new(Catalog::new()),
        event_bus.clone(),
        config.policy(),
    ));
    let accounts = Arc::new(AccountService::new(users, config.admin_password.clone()));

    // Event log must subscribe before seeding so the demo bookings are recorded
    let event_log = if config.persistence_enabled {
        match PostgresPersistence::connect(&config).await {
            Ok(log) => {
                spawn_event_recorder(log.clone(), &event_bus, config.cleanup_after_days);
                tracing::info!("event log enabled");
                Some(log)
            }
            Err(e) => {
                tracing::warn!(error = %e, "event log unavailable, continuing without it");
                None
            }
        }
    } else {
        None
    };

    if config.seed_demo_data {
        seed::load_demo_data(&ledger, &accounts, Utc::now())
            .await
            .context("failed to load demo data")?;
    }

    // Build application state
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let payments: Arc<dyn PaymentGateway> =
        Arc::new(SimulatedPayments::new(config.payment_success_rate));
    let app_state = AppState {
        ledger,
        accounts,
        notifier,
        payments,
        event_bus,
        event_log,
    };

    let app = api::build_app(app_state, Duration::from_secs(config.request_timeout_secs));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
