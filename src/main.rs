use chrono::Utc;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wayfarer::{
    config::Settings,
    core::{dashboard, overview},
    errors::Result,
    store::Store,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Read settings
    let settings = Settings::from_env()
        .inspect_err(|e| error!("Failed to read settings: {}", e))?;
    info!(
        database_url = %settings.database_url,
        latency_scale = settings.latency_scale,
        "Loaded settings"
    );

    // 4. Build and seed the store
    let store = Store::open(&settings)
        .await
        .inspect_err(|e| error!("Failed to open store: {}", e))?;

    // 5. Summarize
    let today = Utc::now().date_naive();
    let dashboard = dashboard::load_dashboard(&store, today).await?;
    info!(
        total_trips = dashboard.stats.total_trips,
        active_trips = dashboard.stats.active_trips,
        completed_trips = dashboard.stats.completed_trips,
        total_budget = dashboard.stats.total_budget,
        upcoming_trips = dashboard.upcoming_trips.len(),
        "Dashboard"
    );

    match overview::load_current_trip_overview(&store).await? {
        Some(current) => info!(
            trip = %current.trip.name,
            destination = %current.trip.destination,
            days = current.itinerary.as_ref().map_or(0, |i| i.days.len()),
            has_budget = current.budget.is_some(),
            "Current trip"
        ),
        None => info!("No trip under way"),
    }

    Ok(())
}
