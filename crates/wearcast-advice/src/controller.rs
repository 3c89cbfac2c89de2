//! Search lifecycle: `Idle -> Loading -> {Success, Error}`.
//!
//! Each search takes a ticket carrying a request epoch. A result is applied
//! only if its ticket is still the newest one, so a slow response for an
//! older search can never overwrite a newer one.

use serde::Serialize;
use wearcast_core::{AppError, ConfigError, ThresholdConfig, ThresholdStore};
use wearcast_weather::{PlaceLabel, WeatherCondition, WeatherReading, WeatherSource};

use crate::error_mapping::{not_found, SourceErrorExt};
use crate::recommend::{evaluate, Recommendation};

/// What a successful search produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub place: PlaceLabel,
    pub reading: WeatherReading,
}

impl Snapshot {
    pub fn condition(&self) -> WeatherCondition {
        self.reading.condition()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    /// No search has been made yet
    #[default]
    Idle,
    Loading {
        query: String,
    },
    Success(Snapshot),
    Error {
        message: String,
    },
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading { .. })
    }
}

/// Identifies one search; only the newest ticket may resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// Resolve `place_name` and fetch its current weather.
///
/// Free of controller state so callers may run it on another task and hand
/// the outcome back through [`Controller::resolve`].
pub async fn lookup<S>(source: &S, place_name: &str) -> Result<Snapshot, AppError>
where
    S: WeatherSource + ?Sized,
{
    let location = source
        .geocode(place_name)
        .await
        .map_err(SourceErrorExt::into_app_error)?
        .ok_or_else(|| not_found(place_name))?;

    let reading = source
        .fetch_current(location.coordinates)
        .await
        .map_err(SourceErrorExt::into_app_error)?;

    Ok(Snapshot {
        place: location.place,
        reading,
    })
}

pub struct Controller<S> {
    source: S,
    store: ThresholdStore,
    thresholds: ThresholdConfig,
    state: SearchState,
    epoch: u64,
}

impl<S: WeatherSource> Controller<S> {
    /// Build a controller, loading thresholds from `store`.
    pub fn new(source: S, store: ThresholdStore) -> Self {
        let thresholds = store.load();
        tracing::debug!(?thresholds, "Controller ready");

        Self {
            source,
            store,
            thresholds,
            state: SearchState::Idle,
            epoch: 0,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Enter `Loading` for a new search.
    ///
    /// A blank name leaves the state untouched and returns `None`.
    pub fn begin_search(&mut self, place_name: &str) -> Option<SearchTicket> {
        let query = place_name.trim();
        if query.is_empty() {
            return None;
        }

        self.epoch += 1;
        if self.state.is_loading() {
            tracing::debug!("Search for {:?} supersedes the one in flight", query);
        }
        self.state = SearchState::Loading {
            query: query.to_string(),
        };
        Some(SearchTicket(self.epoch))
    }

    /// Apply a search outcome. Returns false if the ticket is stale.
    pub fn resolve(&mut self, ticket: SearchTicket, outcome: Result<Snapshot, AppError>) -> bool {
        if ticket.0 != self.epoch || !self.state.is_loading() {
            tracing::debug!(
                "Dropping result for search #{} (current #{})",
                ticket.0,
                self.epoch
            );
            return false;
        }

        self.state = match outcome {
            Ok(snapshot) => {
                tracing::info!("Weather for {} ready", snapshot.place);
                SearchState::Success(snapshot)
            }
            Err(e) => {
                tracing::warn!("Search #{} failed: {}", ticket.0, e);
                SearchState::Error {
                    message: e.user_message().to_string(),
                }
            }
        };
        true
    }

    /// Run a whole search cycle and return the resulting state.
    pub async fn search(&mut self, place_name: &str) -> &SearchState {
        let Some(ticket) = self.begin_search(place_name) else {
            return &self.state;
        };

        let query = place_name.trim().to_string();
        let outcome = lookup(&self.source, &query).await;
        self.resolve(ticket, outcome);
        &self.state
    }

    /// Recommendations for the current result, computed fresh each call.
    pub fn recommendations(&self) -> Option<Vec<Recommendation>> {
        match &self.state {
            SearchState::Success(snapshot) => Some(evaluate(&snapshot.reading, &self.thresholds)),
            _ => None,
        }
    }

    /// Description of the current condition, if there is a result.
    pub fn description(&self) -> Option<&'static str> {
        match &self.state {
            SearchState::Success(snapshot) => Some(snapshot.condition().description()),
            _ => None,
        }
    }

    /// Replace the thresholds wholesale and persist them.
    ///
    /// Only non-finite values are rejected; a failed write is logged by the
    /// store and the new values still apply for this session.
    pub fn update_thresholds(&mut self, thresholds: ThresholdConfig) -> Result<(), ConfigError> {
        thresholds.validate()?;
        self.store.save(&thresholds);
        self.thresholds = thresholds;
        Ok(())
    }

    /// Restore and persist the default thresholds.
    pub fn reset_thresholds(&mut self) {
        let defaults = ThresholdConfig::default();
        self.store.save(&defaults);
        self.thresholds = defaults;
    }
}
