//! Per-target entry points
//!
//! An entry point is what the load runner drives: an optional one-time
//! `setup` producing a read-only [`Fixture`], and an `iteration` body each
//! virtual user repeats. Each entry point fixes which service boundary is
//! exercised and therefore which headers are sent.

use crate::aircraft::run_aircraft_scenario;
use crate::auth::run_authentication_scenario;
use crate::auth_headers::{AuthContext, ScenarioTarget};
use crate::context::ScenarioContext;
use crate::error::ScenarioError;
use crate::flights::run_flight_scenario;
use crate::identity::IdentityContext;
use crate::organization::create_organization;
use crate::random::ValueGenerator;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Setup output shared by every iteration of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Fixture {
    pub identity: Option<IdentityContext>,
    pub aircraft_id: Option<String>,
}

impl Fixture {
    fn auth(&self) -> AuthContext<'_> {
        AuthContext::with_identity(self.identity.as_ref())
    }
}

#[async_trait]
pub trait EntryPoint: Send + Sync {
    fn name(&self) -> &'static str;

    /// Runs once before the load phase. An error aborts the run.
    async fn setup(
        &self,
        _ctx: &ScenarioContext,
        _random: &mut ValueGenerator,
    ) -> Result<Fixture, ScenarioError> {
        Ok(Fixture::default())
    }

    /// One virtual-user iteration. An error aborts only this iteration.
    async fn iteration(
        &self,
        ctx: &ScenarioContext,
        random: &mut ValueGenerator,
        fixture: &Fixture,
    ) -> Result<(), ScenarioError>;
}

async fn provision(
    ctx: &ScenarioContext,
    random: &mut ValueGenerator,
) -> Result<IdentityContext, ScenarioError> {
    create_organization(ctx, random, &ctx.endpoints.auth_service_url).await
}

/// Aircraft service, direct headers
#[derive(Debug, Default)]
pub struct AircraftEntry;

#[async_trait]
impl EntryPoint for AircraftEntry {
    fn name(&self) -> &'static str {
        "aircraft"
    }

    async fn setup(
        &self,
        ctx: &ScenarioContext,
        random: &mut ValueGenerator,
    ) -> Result<Fixture, ScenarioError> {
        Ok(Fixture {
            identity: Some(provision(ctx, random).await?),
            aircraft_id: None,
        })
    }

    async fn iteration(
        &self,
        ctx: &ScenarioContext,
        random: &mut ValueGenerator,
        fixture: &Fixture,
    ) -> Result<(), ScenarioError> {
        let target =
            ScenarioTarget::resolve(ctx.endpoints.aircraft_service_url.clone(), &ctx.endpoints);
        run_aircraft_scenario(ctx, random, &target, fixture.auth()).await;
        Ok(())
    }
}

/// Flight service, direct headers, one aircraft shared by all iterations
#[derive(Debug, Default)]
pub struct FlightsEntry;

#[async_trait]
impl EntryPoint for FlightsEntry {
    fn name(&self) -> &'static str {
        "flights"
    }

    async fn setup(
        &self,
        ctx: &ScenarioContext,
        random: &mut ValueGenerator,
    ) -> Result<Fixture, ScenarioError> {
        let identity = provision(ctx, random).await?;
        let aircraft_target =
            ScenarioTarget::resolve(ctx.endpoints.aircraft_service_url.clone(), &ctx.endpoints);
        let aircraft_id = run_aircraft_scenario(
            ctx,
            random,
            &aircraft_target,
            AuthContext::with_identity(Some(&identity)),
        )
        .await;

        match &aircraft_id {
            Some(id) => info!(aircraft_id = %id, "Shared aircraft created"),
            None => warn!("Shared aircraft was not created; flight iterations will be skipped"),
        }

        Ok(Fixture {
            identity: Some(identity),
            aircraft_id,
        })
    }

    async fn iteration(
        &self,
        ctx: &ScenarioContext,
        random: &mut ValueGenerator,
        fixture: &Fixture,
    ) -> Result<(), ScenarioError> {
        let Some(aircraft_id) = fixture.aircraft_id.as_deref() else {
            debug!("No shared aircraft, skipping flight scenario");
            return Ok(());
        };
        let target =
            ScenarioTarget::resolve(ctx.endpoints.flight_service_url.clone(), &ctx.endpoints);
        run_flight_scenario(ctx, random, &target, aircraft_id, fixture.auth()).await;
        Ok(())
    }
}

/// Router, direct headers, aircraft then flight
#[derive(Debug, Default)]
pub struct RouterEntry;

#[async_trait]
impl EntryPoint for RouterEntry {
    fn name(&self) -> &'static str {
        "router"
    }

    async fn setup(
        &self,
        ctx: &ScenarioContext,
        random: &mut ValueGenerator,
    ) -> Result<Fixture, ScenarioError> {
        Ok(Fixture {
            identity: Some(provision(ctx, random).await?),
            aircraft_id: None,
        })
    }

    async fn iteration(
        &self,
        ctx: &ScenarioContext,
        random: &mut ValueGenerator,
        fixture: &Fixture,
    ) -> Result<(), ScenarioError> {
        let target = ScenarioTarget::resolve(ctx.endpoints.router_url.clone(), &ctx.endpoints);
        let aircraft_id = run_aircraft_scenario(ctx, random, &target, fixture.auth()).await;
        if let Some(aircraft_id) = aircraft_id {
            run_flight_scenario(ctx, random, &target, &aircraft_id, fixture.auth()).await;
        }
        Ok(())
    }
}

/// Gateway with a freshly issued bearer token per iteration
#[derive(Debug, Default)]
pub struct GatewayEntry;

#[async_trait]
impl EntryPoint for GatewayEntry {
    fn name(&self) -> &'static str {
        "gateway"
    }

    async fn iteration(
        &self,
        ctx: &ScenarioContext,
        random: &mut ValueGenerator,
        _fixture: &Fixture,
    ) -> Result<(), ScenarioError> {
        let token =
            run_authentication_scenario(ctx, random, &ctx.endpoints.auth_service_url).await?;
        let auth = AuthContext::with_token(token.as_deref());
        let target = ScenarioTarget::resolve(ctx.endpoints.gateway_url.clone(), &ctx.endpoints);

        if let Some(aircraft_id) = run_aircraft_scenario(ctx, random, &target, auth).await {
            run_flight_scenario(ctx, random, &target, &aircraft_id, auth).await;
        }
        Ok(())
    }
}

/// Authentication REST flow only
#[derive(Debug, Default)]
pub struct AuthEntry;

#[async_trait]
impl EntryPoint for AuthEntry {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn iteration(
        &self,
        ctx: &ScenarioContext,
        random: &mut ValueGenerator,
        _fixture: &Fixture,
    ) -> Result<(), ScenarioError> {
        run_authentication_scenario(ctx, random, &ctx.endpoints.auth_service_url).await?;
        Ok(())
    }
}

/// Selectable entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPointKind {
    Aircraft,
    Flights,
    Router,
    Gateway,
    Auth,
}

impl EntryPointKind {
    pub fn all() -> [EntryPointKind; 5] {
        [
            EntryPointKind::Aircraft,
            EntryPointKind::Flights,
            EntryPointKind::Router,
            EntryPointKind::Gateway,
            EntryPointKind::Auth,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryPointKind::Aircraft => "aircraft",
            EntryPointKind::Flights => "flights",
            EntryPointKind::Router => "router",
            EntryPointKind::Gateway => "gateway",
            EntryPointKind::Auth => "auth",
        }
    }

    pub fn entry_point(&self) -> Box<dyn EntryPoint> {
        match self {
            EntryPointKind::Aircraft => Box::new(AircraftEntry),
            EntryPointKind::Flights => Box::new(FlightsEntry),
            EntryPointKind::Router => Box::new(RouterEntry),
            EntryPointKind::Gateway => Box::new(GatewayEntry),
            EntryPointKind::Auth => Box::new(AuthEntry),
        }
    }
}

impl fmt::Display for EntryPointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryPointKind {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ScenarioError::UnknownEntryPoint(s.to_string()))
    }
}
