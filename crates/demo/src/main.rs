//! Scripted walkthrough of a meetup's lifecycle.
//!
//! Raises events through the aggregate, persists them to an in-memory log,
//! prints them as JSON and rebuilds the meetup from the stored history.

mod config;

use std::error::Error;
use std::sync::Arc;

use chrono::Duration;
use common::{Clock, ManualClock, UserId};
use domain::{
    CancellationReason, EventStream, Meetup, MeetupEnvelope, MeetupName, MeetupStream,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::{Config, LogFormat};

/// Append-only event log standing in for a persistence layer.
#[derive(Debug, Default)]
struct EventLog {
    events: Vec<MeetupEnvelope>,
}

impl EventLog {
    /// Moves the meetup's pending changes into the log.
    fn persist(&mut self, meetup: &mut Meetup) {
        let changes = meetup.take_changes();
        let count = changes.len();
        self.events.extend(changes);
        tracing::info!(meetup_id = %meetup.id(), count, total = self.events.len(), "persisted events");
    }

    fn load(&self) -> Result<MeetupStream, domain::StreamError> {
        EventStream::create(self.events.iter().cloned())
    }
}

fn print_events(events: &[MeetupEnvelope], pretty: bool) -> Result<(), serde_json::Error> {
    for event in events {
        let json = if pretty {
            serde_json::to_string_pretty(event)?
        } else {
            serde_json::to_string(event)?
        };
        println!("{json}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;

    // 1. Initialize tracing
    let json = config.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    // 3. Pin the clock if asked to
    let manual = ManualClock::new();
    if let Some(now) = config.now {
        manual.set(now);
    }
    let clock: Arc<dyn Clock> = Arc::new(manual.clone());
    tracing::info!(now = %clock.now(), pinned = manual.is_overridden(), "starting meetup demo");

    // 4. Run the scenario
    let alice = UserId::new();
    let bob = UserId::new();
    let carol = UserId::new();
    let mut log = EventLog::default();

    let mut meetup = Meetup::create(
        clock.now() + Duration::days(1),
        MeetupName::new("Rooftop Party")?,
        alice,
        [bob],
        Arc::clone(&clock),
    )?;

    meetup.invite_user(bob)?;
    if let Err(error) = meetup.accept(carol) {
        tracing::warn!(%error, "accept refused");
    }
    meetup.invite_user(carol)?;
    meetup.accept(bob)?;
    meetup.accept(carol)?;
    meetup.reschedule(clock.now() + Duration::days(2))?;
    log.persist(&mut meetup);

    meetup.change_organiser(bob)?;
    meetup.rename(MeetupName::new("Garden Party")?)?;
    meetup.reject(alice)?;
    log.persist(&mut meetup);

    print_events(&log.events, config.pretty)?;

    // 5. Rebuild from the stored history
    let stream = log.load()?;
    let mut restored = Meetup::from_stream(&stream, Arc::clone(&clock));
    tracing::info!(
        version = %restored.version(),
        matches = restored.state() == meetup.state(),
        "rebuilt meetup from history"
    );

    restored.cancel(CancellationReason::new("Forecast says storms.")?)?;
    if let Err(error) = restored.reschedule(clock.now() + Duration::days(3)) {
        tracing::warn!(%error, "reschedule refused");
    }
    let cancelled = restored.changes().to_vec();
    log.persist(&mut restored);
    print_events(&cancelled, config.pretty)?;

    // 6. A meetup that already took place cannot be cancelled
    manual.advance(Duration::days(30));
    let late = log.load()?;
    let mut occurred = Meetup::from_stream(&late, Arc::clone(&clock));
    tracing::info!(
        has_occurred = occurred.has_occurred(),
        status = %occurred.status(),
        events = late.len(),
        "meetup after a month"
    );
    if let Err(error) = occurred.cancel(CancellationReason::new("Too late to call off.")?) {
        tracing::warn!(%error, "cancel refused");
    }

    if config.print_metrics {
        print!("{}", metrics_handle.render());
    }

    tracing::info!("meetup demo finished");
    Ok(())
}
