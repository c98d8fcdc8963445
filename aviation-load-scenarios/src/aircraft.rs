//! Aircraft scenario: miss-lookup, create, read-after-write

use crate::auth_headers::{build_auth_headers, AuthContext, ScenarioTarget};
use crate::context::ScenarioContext;
use crate::documents::{
    AircraftStatus, CreateAircraft, CreateAircraftInput, CreateAircraftVariables, GetAircraft,
    IdVariables,
};
use crate::random::ValueGenerator;
use tracing::debug;

pub const CHECK_AIRCRAFT_CREATED: &str = "aircraft created";
pub const CHECK_AIRCRAFT_READ_BACK: &str = "aircraft read back";

/// Run the aircraft scenario against `target`.
///
/// Returns the created aircraft id, or `None` when creation produced none and
/// dependent scenarios must be skipped.
pub async fn run_aircraft_scenario(
    ctx: &ScenarioContext,
    random: &mut ValueGenerator,
    target: &ScenarioTarget,
    auth: AuthContext<'_>,
) -> Option<String> {
    let headers = build_auth_headers(&auth, target.strategy);
    let graphql = ctx.graphql();

    // Unknown id: exercises the not-found path
    let missing_id = random.uuid().to_string();
    graphql
        .execute::<GetAircraft>(&target.url, &IdVariables::new(missing_id), &headers)
        .await;

    let variables = CreateAircraftVariables {
        input: CreateAircraftInput {
            registration: random.registration(),
            manufacturer: "Boeing".to_string(),
            model: "737".to_string(),
            capacity: 50,
            status: AircraftStatus::Available,
            year_of_manufacture: 2020,
        },
    };
    let created = graphql
        .execute::<CreateAircraft>(&target.url, &variables, &headers)
        .await
        .into_data()
        .and_then(|data| data.create_aircraft)
        .map(|aircraft| aircraft.id)
        .filter(|id| !id.is_empty());

    ctx.check(CHECK_AIRCRAFT_CREATED, created.is_some());

    let aircraft_id = created?;
    debug!(
        aircraft_id = %aircraft_id,
        registration = %variables.input.registration,
        "Aircraft created"
    );

    let read_back = graphql
        .execute::<GetAircraft>(&target.url, &IdVariables::new(aircraft_id.clone()), &headers)
        .await
        .into_data()
        .and_then(|data| data.get_aircraft_by_id);
    ctx.check(
        CHECK_AIRCRAFT_READ_BACK,
        read_back.is_some_and(|aircraft| aircraft.id == aircraft_id),
    );

    Some(aircraft_id)
}
