use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::realtime::{RealtimeEventSink, RealtimeHub};
use tripsync_core::events::DomainEventSink;
use tripsync_core::notifications::{NotificationService, NotificationServiceTrait};
use tripsync_core::proposals::{ConversionService, ConversionServiceTrait};
use tripsync_core::schedule::{RsvpService, RsvpServiceTrait};
use tripsync_storage_sqlite::db::{self, write_actor};
use tripsync_storage_sqlite::notifications::NotificationRepository;
use tripsync_storage_sqlite::proposals::ProposalRepository;
use tripsync_storage_sqlite::schedule::ScheduleRepository;
use tripsync_storage_sqlite::trips::TripRepository;
use tripsync_travel_search::{AmadeusClient, OfferSearchProvider};

pub struct AppState {
    pub conversion_service: Arc<dyn ConversionServiceTrait>,
    pub rsvp_service: Arc<dyn RsvpServiceTrait>,
    pub notification_service: Arc<dyn NotificationServiceTrait>,
    pub trip_repository: Arc<TripRepository>,
    pub search_provider: Arc<dyn OfferSearchProvider>,
    pub hub: Arc<RealtimeHub>,
    pub amadeus_env: String,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("TS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let trip_repository = Arc::new(TripRepository::new(pool.clone(), writer.clone()));
    let proposal_repository = Arc::new(ProposalRepository::new(pool.clone(), writer.clone()));
    let schedule_repository = Arc::new(ScheduleRepository::new(pool.clone(), writer.clone()));
    let notification_repository =
        Arc::new(NotificationRepository::new(pool.clone(), writer.clone()));

    let notification_service = Arc::new(NotificationService::new(notification_repository));

    // The hub is shared by the websocket endpoint and the event sink the
    // services emit into after commit.
    let hub = Arc::new(RealtimeHub::new());
    let event_sink: Arc<dyn DomainEventSink> = Arc::new(RealtimeEventSink::new(hub.clone()));

    let conversion_service: Arc<dyn ConversionServiceTrait> = Arc::new(
        ConversionService::new(
            proposal_repository.clone(),
            trip_repository.clone(),
            notification_service.clone(),
        )
        .with_event_sink(event_sink.clone()),
    );

    let rsvp_service: Arc<dyn RsvpServiceTrait> = Arc::new(
        RsvpService::new(
            schedule_repository.clone(),
            trip_repository.clone(),
            notification_service.clone(),
        )
        .with_event_sink(event_sink.clone()),
    );

    let search_provider: Arc<dyn OfferSearchProvider> =
        Arc::new(AmadeusClient::new(config.amadeus.clone()));

    Ok(Arc::new(AppState {
        conversion_service,
        rsvp_service,
        notification_service,
        trip_repository,
        search_provider,
        hub,
        amadeus_env: config.amadeus.environment.clone(),
        db_path,
    }))
}
