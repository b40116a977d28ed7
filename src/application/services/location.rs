//! Location → service-area resolution and the client-held location session
//!
//! A location is usable only when a serviceable area matched *and* at least
//! one active service type is offered there. Upstream failures are kept
//! apart from "not serviceable" so an outage never reads as no coverage.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::LocationSection;
use crate::domain::service_area::{LocationQuery, ServiceArea};
use crate::domain::service_type::ServiceType;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::utills::retry_with_backoff;

/// Why a location was found not serviceable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotServiceableReason {
    NoMatchingArea,
    AreaDisabled,
    NoActiveServiceTypes,
}

impl NotServiceableReason {
    fn as_str(&self) -> &'static str {
        match self {
            Self::NoMatchingArea => "no_matching_area",
            Self::AreaDisabled => "area_disabled",
            Self::NoActiveServiceTypes => "no_active_service_types",
        }
    }
}

/// Outcome of one resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocationResolution {
    Serviceable {
        area: ServiceArea,
        available_service_types: Vec<String>,
    },
    NotServiceable {
        area: Option<ServiceArea>,
        reason: NotServiceableReason,
    },
}

impl LocationResolution {
    pub fn is_serviceable(&self) -> bool {
        matches!(self, Self::Serviceable { .. })
    }

    pub fn available_service_types(&self) -> &[String] {
        match self {
            Self::Serviceable {
                available_service_types,
                ..
            } => available_service_types,
            Self::NotServiceable { .. } => &[],
        }
    }
}

/// Resolves a pincode or coordinate to a service area
pub struct LocationResolver {
    repos: Arc<dyn RepositoryProvider>,
    config: LocationSection,
}

impl LocationResolver {
    pub fn new(repos: Arc<dyn RepositoryProvider>, config: LocationSection) -> Self {
        Self { repos, config }
    }

    pub async fn resolve_location(&self, query: &LocationQuery) -> DomainResult<LocationResolution> {
        let query = query.normalized()?;

        let area = retry_with_backoff(
            self.config.retry(),
            || self.find_area(&query),
            DomainError::is_transient,
            "find_service_area",
        )
        .await?;

        let resolution = match area {
            None => LocationResolution::NotServiceable {
                area: None,
                reason: NotServiceableReason::NoMatchingArea,
            },
            Some(area) if !area.is_serviceable => LocationResolution::NotServiceable {
                area: Some(area),
                reason: NotServiceableReason::AreaDisabled,
            },
            Some(area) => {
                let active = retry_with_backoff(
                    self.config.retry(),
                    || self.repos.service_types().find_active(),
                    DomainError::is_transient,
                    "find_active_service_types",
                )
                .await?;
                let available = offered_types(&area, &active);
                if available.is_empty() {
                    LocationResolution::NotServiceable {
                        area: Some(area),
                        reason: NotServiceableReason::NoActiveServiceTypes,
                    }
                } else {
                    LocationResolution::Serviceable {
                        area,
                        available_service_types: available,
                    }
                }
            }
        };

        let outcome = match &resolution {
            LocationResolution::Serviceable { .. } => "serviceable",
            LocationResolution::NotServiceable { reason, .. } => reason.as_str(),
        };
        metrics::counter!("location_resolutions_total", "outcome" => outcome).increment(1);
        info!(%query, outcome, "Location resolved");

        Ok(resolution)
    }

    /// Begin a resolution on the session, run it, and apply the result.
    /// Returns whether the result was applied (it is not if a newer change
    /// was started on the session meanwhile).
    pub async fn change_location(&self, session: &mut LocationSession, query: LocationQuery) -> bool {
        let ticket = session.begin(query.clone());
        let result = self.resolve_location(&query).await;
        session.apply(ticket, result)
    }

    async fn find_area(&self, query: &LocationQuery) -> DomainResult<Option<ServiceArea>> {
        let areas = self.repos.service_areas();
        match query {
            LocationQuery::Pincode(code) => areas.find_by_pincode(code).await,
            LocationQuery::Coordinates(point) => {
                let nearest = areas
                    .find_geolocated()
                    .await?
                    .into_iter()
                    .filter_map(|area| {
                        let distance = area.location?.distance_km(point);
                        Some((distance, area))
                    })
                    .filter(|(distance, _)| *distance <= self.config.max_match_distance_km)
                    .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

                if let Some((distance, area)) = &nearest {
                    debug!(area_id = area.id, distance_km = *distance, "Nearest service area");
                }
                Ok(nearest.map(|(_, area)| area))
            }
        }
    }
}

/// The area's service types that are active, in storefront order.
fn offered_types(area: &ServiceArea, active: &[ServiceType]) -> Vec<String> {
    let mut offered: Vec<&ServiceType> = active
        .iter()
        .filter(|st| st.is_active && area.service_types.contains(&st.id))
        .collect();
    offered.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)));
    offered.into_iter().map(|st| st.id.clone()).collect()
}

// ── Location session ────────────────────────────────────────────

/// Sequence number of one location change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

/// Client-observable location state
#[derive(Debug, Clone, PartialEq)]
pub enum LocationState {
    Uninitialized,
    Checking {
        query: LocationQuery,
    },
    Serviceable {
        query: LocationQuery,
        area: ServiceArea,
        available_service_types: Vec<String>,
    },
    NotServiceable {
        query: LocationQuery,
        area: Option<ServiceArea>,
        reason: NotServiceableReason,
    },
    /// Resolution failed; `error.is_transient()` tells whether a retry may help
    Unavailable {
        query: LocationQuery,
        error: DomainError,
    },
}

/// Currently selected location, owned by a single UI writer.
///
/// Every change takes a ticket; only the result for the latest ticket is
/// applied, regardless of the order in which responses arrive.
#[derive(Debug)]
pub struct LocationSession {
    state: LocationState,
    latest: u64,
}

impl LocationSession {
    pub fn new() -> Self {
        Self {
            state: LocationState::Uninitialized,
            latest: 0,
        }
    }

    /// Start a location change. Any in-flight result becomes stale.
    pub fn begin(&mut self, query: LocationQuery) -> RequestTicket {
        self.latest += 1;
        self.state = LocationState::Checking { query };
        RequestTicket(self.latest)
    }

    /// Apply a resolution result. Stale or already-applied tickets are ignored.
    pub fn apply(&mut self, ticket: RequestTicket, result: DomainResult<LocationResolution>) -> bool {
        if ticket.0 != self.latest {
            debug!(ticket = ticket.0, latest = self.latest, "Ignoring stale location result");
            return false;
        }
        let query = match &self.state {
            LocationState::Checking { query } => query.clone(),
            _ => {
                debug!(ticket = ticket.0, "Location result already applied");
                return false;
            }
        };

        self.state = match result {
            Ok(LocationResolution::Serviceable {
                area,
                available_service_types,
            }) => LocationState::Serviceable {
                query,
                area,
                available_service_types,
            },
            Ok(LocationResolution::NotServiceable { area, reason }) => {
                LocationState::NotServiceable { query, area, reason }
            }
            Err(error) => {
                warn!(%query, error = %error, "Location resolution failed");
                LocationState::Unavailable { query, error }
            }
        };
        true
    }

    pub fn state(&self) -> &LocationState {
        &self.state
    }

    pub fn is_checking_service(&self) -> bool {
        matches!(self.state, LocationState::Checking { .. })
    }

    /// A service area was resolved for the current location.
    pub fn has_location(&self) -> bool {
        self.service_area().is_some()
    }

    pub fn service_area(&self) -> Option<&ServiceArea> {
        match &self.state {
            LocationState::Serviceable { area, .. } => Some(area),
            LocationState::NotServiceable { area, .. } => area.as_ref(),
            _ => None,
        }
    }

    pub fn available_service_types(&self) -> &[String] {
        match &self.state {
            LocationState::Serviceable {
                available_service_types,
                ..
            } => available_service_types,
            _ => &[],
        }
    }

    /// Gate for storefront pages: a serviceable area with at least one
    /// active service type.
    pub fn is_usable(&self) -> bool {
        match &self.state {
            LocationState::Serviceable {
                area,
                available_service_types,
                ..
            } => area.is_serviceable && !available_service_types.is_empty(),
            _ => false,
        }
    }

    /// Ticket of the settled location, for tagging catalog requests.
    pub fn current_ticket(&self) -> Option<RequestTicket> {
        (self.latest > 0 && !self.is_checking_service()).then_some(RequestTicket(self.latest))
    }

    /// Pass a response through only if it was requested for the location
    /// that is still current.
    pub fn accept<T>(&self, ticket: RequestTicket, value: T) -> Option<T> {
        if ticket.0 == self.latest && !self.is_checking_service() {
            Some(value)
        } else {
            debug!(ticket = ticket.0, latest = self.latest, "Dropping stale response");
            None
        }
    }
}

impl Default for LocationSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::fixture;

    fn resolver(fx: &crate::application::services::test_support::Fixture) -> LocationResolver {
        let config = LocationSection {
            retry_initial_delay_ms: 1,
            ..LocationSection::default()
        };
        LocationResolver::new(fx.repos.clone(), config)
    }

    #[tokio::test]
    async fn unknown_pincode_is_not_serviceable() {
        let fx = fixture();
        let resolution = resolver(&fx)
            .resolve_location(&LocationQuery::pincode("999999"))
            .await
            .unwrap();
        assert_eq!(
            resolution,
            LocationResolution::NotServiceable {
                area: None,
                reason: NotServiceableReason::NoMatchingArea
            }
        );
        assert!(resolution.available_service_types().is_empty());
    }

    #[tokio::test]
    async fn serviceable_pincode_lists_active_types_in_order() {
        let fx = fixture();
        let resolution = resolver(&fx)
            .resolve_location(&LocationQuery::pincode("560001"))
            .await
            .unwrap();
        // `legacy` is listed on the area but inactive
        assert_eq!(
            resolution.available_service_types(),
            &["grocery".to_string(), "handyman".to_string(), "fashion".to_string()]
        );
    }

    #[tokio::test]
    async fn disabled_area_is_never_serviceable() {
        let fx = fixture();
        let resolution = resolver(&fx)
            .resolve_location(&LocationQuery::pincode("110001"))
            .await
            .unwrap();
        assert!(matches!(
            resolution,
            LocationResolution::NotServiceable {
                area: Some(_),
                reason: NotServiceableReason::AreaDisabled
            }
        ));
        assert!(resolution.available_service_types().is_empty());
    }

    #[tokio::test]
    async fn area_without_active_types_is_not_serviceable() {
        let fx = fixture();
        let resolution = resolver(&fx)
            .resolve_location(&LocationQuery::pincode("400001"))
            .await
            .unwrap();
        assert!(matches!(
            resolution,
            LocationResolution::NotServiceable {
                reason: NotServiceableReason::NoActiveServiceTypes,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn coordinates_match_nearest_area_within_radius() {
        let fx = fixture();
        let r = resolver(&fx);

        // A few km from the Bengaluru area
        let near = r
            .resolve_location(&LocationQuery::coordinates(12.99, 77.62))
            .await
            .unwrap();
        match near {
            LocationResolution::Serviceable { area, .. } => assert_eq!(area.pincode, "560001"),
            other => panic!("expected serviceable, got {:?}", other),
        }

        // Far from everything
        let far = r
            .resolve_location(&LocationQuery::coordinates(28.6, 72.0))
            .await
            .unwrap();
        assert!(!far.is_serviceable());
    }

    #[tokio::test]
    async fn invalid_input_is_a_validation_error() {
        let fx = fixture();
        let r = resolver(&fx);
        assert!(matches!(
            r.resolve_location(&LocationQuery::pincode("")).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            r.resolve_location(&LocationQuery::coordinates(120.0, 0.0)).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let fx = fixture();
        fx.memory.fail_next(2);
        let resolution = resolver(&fx)
            .resolve_location(&LocationQuery::pincode("560001"))
            .await
            .unwrap();
        assert!(resolution.is_serviceable());
    }

    #[tokio::test]
    async fn outage_is_unavailable_not_unserviceable() {
        let fx = fixture();
        fx.memory.set_unavailable(true);
        let r = resolver(&fx);

        let mut session = LocationSession::new();
        assert!(r.change_location(&mut session, LocationQuery::pincode("560001")).await);
        match session.state() {
            LocationState::Unavailable { error, .. } => assert!(error.is_transient()),
            other => panic!("expected unavailable, got {:?}", other),
        }
        assert!(!session.is_usable());
        assert!(!session.has_location());
    }

    #[tokio::test]
    async fn session_transitions() {
        let fx = fixture();
        let r = resolver(&fx);
        let mut session = LocationSession::new();
        assert_eq!(session.state(), &LocationState::Uninitialized);
        assert!(session.current_ticket().is_none());

        r.change_location(&mut session, LocationQuery::pincode("560001")).await;
        assert!(session.is_usable());
        assert!(session.has_location());
        assert_eq!(session.available_service_types().len(), 3);

        r.change_location(&mut session, LocationQuery::pincode("999999")).await;
        assert!(!session.is_usable());
        assert!(!session.has_location());
        assert!(session.available_service_types().is_empty());

        r.change_location(&mut session, LocationQuery::pincode("400001")).await;
        assert!(!session.is_usable());
        assert!(session.has_location());

        r.change_location(&mut session, LocationQuery::pincode("560001")).await;
        assert!(session.is_usable());
    }

    #[tokio::test]
    async fn stale_results_are_ignored() {
        let fx = fixture();
        let r = resolver(&fx);
        let mut session = LocationSession::new();

        let first_query = LocationQuery::pincode("560001");
        let second_query = LocationQuery::pincode("999999");
        let first = session.begin(first_query.clone());
        let second = session.begin(second_query.clone());
        assert!(session.is_checking_service());

        // The newer request settles first, then the old one arrives late.
        let second_result = r.resolve_location(&second_query).await;
        let first_result = r.resolve_location(&first_query).await;
        assert!(session.apply(second, second_result));
        assert!(!session.apply(first, first_result));

        assert!(!session.is_usable());
        assert!(matches!(session.state(), LocationState::NotServiceable { .. }));
    }

    #[test]
    fn responses_for_old_locations_are_dropped() {
        let mut session = LocationSession::new();
        let ticket = session.begin(LocationQuery::pincode("560001"));
        // Still checking: nothing is accepted yet
        assert_eq!(session.accept(ticket, 1), None);

        session.apply(
            ticket,
            Ok(LocationResolution::NotServiceable {
                area: None,
                reason: NotServiceableReason::NoMatchingArea,
            }),
        );
        let settled = session.current_ticket().unwrap();
        assert_eq!(session.accept(settled, 2), Some(2));

        session.begin(LocationQuery::pincode("110001"));
        assert_eq!(session.accept(settled, 3), None);
    }
}
