//! RSVP store demo driver.
//!
//! Opens the configured snapshot, records a few responses for a new event and prints the
//! resulting statistics as JSON.

use chrono::{Duration, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rsvp_store::models::{CleanupOptions, Event, Player, RsvpStatus};
use rsvp_store::{Config, RsvpStore, Storage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RSVP store");
    tracing::info!("Data path: {:?}", config.data_path);
    tracing::info!("Storage: {:?}", config.storage);
    tracing::info!("Capacity scope: {:?}", config.capacity_scope);

    let storage = Storage::from_config(&config).await?;
    let store = RsvpStore::open(storage, config.store_options()).await?;

    let report = store.cleanup_data(&CleanupOptions::default()).await?;
    tracing::info!(
        "Startup cleanup removed {} events and {} rsvps",
        report.events,
        report.rsvps
    );

    let event = store
        .create_event(Event::new(
            "Saturday five-a-side",
            "Friendly match, bring both shirt colours",
            Utc::now() + Duration::days(7),
            "Riverside pitch 2",
            2,
        ))
        .await?;

    let ana = Player::new("ana", "Ana Costa", "ana@example.com");
    let ben = Player::new("ben", "Ben Okafor", "ben@example.com");
    let cleo = Player::new("cleo", "Cleo Varga", "cleo@example.com");

    store
        .update_rsvp(&event.id, ana, RsvpStatus::Yes, None)
        .await?;
    store
        .update_rsvp(&event.id, ben, RsvpStatus::Yes, Some("Bringing the ball".into()))
        .await?;

    match store
        .update_rsvp(&event.id, cleo.clone(), RsvpStatus::Yes, None)
        .await
    {
        Ok(_) => {}
        Err(err) if err.is_validation() => {
            tracing::info!("{}; adding {} to the waitlist", err.message(), cleo.name);
            store.add_to_waitlist(&event.id, cleo).await?;
        }
        Err(err) => return Err(err.into()),
    }

    store.setup_reminders(&event.id, 1).await?;

    let stats = store.get_event_stats(&event.id).await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
