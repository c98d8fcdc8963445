//! Flight scenario: miss-lookup, create bound to an aircraft, read-after-write

use crate::auth_headers::{build_auth_headers, AuthContext, ScenarioTarget};
use crate::context::ScenarioContext;
use crate::documents::{CreateFlight, CreateFlightVariables, GetFlightById, IdVariables};
use crate::random::ValueGenerator;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use tracing::debug;

pub const CHECK_FLIGHT_CREATED: &str = "flight created";
pub const CHECK_FLIGHT_READ_BACK: &str = "flight read back";
pub const CHECK_FLIGHT_AIRCRAFT: &str = "flight bound to aircraft";

pub const ORIGIN: &str = "LHR";
pub const DESTINATION: &str = "JFK";

/// Run the flight scenario against `target`, creating a flight operated by `aircraft_id`.
///
/// Callers only invoke this with an id from a successful aircraft creation.
/// Returns the created flight id, if any.
pub async fn run_flight_scenario(
    ctx: &ScenarioContext,
    random: &mut ValueGenerator,
    target: &ScenarioTarget,
    aircraft_id: &str,
    auth: AuthContext<'_>,
) -> Option<String> {
    let headers = build_auth_headers(&auth, target.strategy);
    let graphql = ctx.graphql();

    let missing_id = random.uuid().to_string();
    graphql
        .execute::<GetFlightById>(&target.url, &IdVariables::new(missing_id), &headers)
        .await;

    let variables = flight_variables(random, aircraft_id, Utc::now());
    let created = graphql
        .execute::<CreateFlight>(&target.url, &variables, &headers)
        .await
        .into_data()
        .and_then(|data| data.create_flight)
        .filter(|flight| !flight.id.is_empty());

    ctx.check(CHECK_FLIGHT_CREATED, created.is_some());

    let flight_id = created?.id;
    debug!(flight_id = %flight_id, number = %variables.number, aircraft_id, "Flight created");

    let read_back = graphql
        .execute::<GetFlightById>(&target.url, &IdVariables::new(flight_id.clone()), &headers)
        .await
        .into_data()
        .and_then(|data| data.get_flight_by_id);

    ctx.check(
        CHECK_FLIGHT_READ_BACK,
        read_back.as_ref().is_some_and(|flight| flight.id == flight_id),
    );
    if let Some(flight) = &read_back {
        ctx.check(
            CHECK_FLIGHT_AIRCRAFT,
            flight
                .aircraft
                .as_ref()
                .is_some_and(|aircraft| aircraft.id == aircraft_id),
        );
    }

    Some(flight_id)
}

/// One-hour LHR to JFK flight departing at `now`
fn flight_variables(
    random: &mut ValueGenerator,
    aircraft_id: &str,
    now: DateTime<Utc>,
) -> CreateFlightVariables {
    let arrival = now + Duration::hours(1);
    CreateFlightVariables {
        number: random.flight_number(),
        origin: ORIGIN.to_string(),
        destination: DESTINATION.to_string(),
        departure_time: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        arrival_time: arrival.to_rfc3339_opts(SecondsFormat::Millis, true),
        aircraft_id: aircraft_id.to_string(),
    }
}
