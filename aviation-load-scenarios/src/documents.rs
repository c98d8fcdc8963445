//! GraphQL documents sent by the aircraft and flight scenarios
//!
//! Result types mirror the selection sets. Fields the services may leave out
//! under partial failure are optional so a half-filled payload still
//! deserializes.

use aviation_load_http::GraphqlDocument;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AircraftStatus {
    Available,
    Grounded,
    InService,
    Maintenance,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    Arrived,
    Cancelled,
    Delayed,
    Departed,
    InProgress,
    Scheduled,
    Unspecified,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdVariables {
    pub id: String,
}

impl IdVariables {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Aircraft {
    pub id: String,
    pub registration: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub status: Option<AircraftStatus>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AircraftRef {
    pub id: String,
}

// Aircraft

pub struct GetAircraft;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAircraftData {
    pub get_aircraft_by_id: Option<Aircraft>,
}

impl GraphqlDocument for GetAircraft {
    const OPERATION_NAME: &'static str = "GetAircraft";
    const QUERY: &'static str = r#"query GetAircraft($id: ID!) {
  getAircraftById(input: $id) {
    id
    registration
    manufacturer
    model
    status
  }
}"#;
    type Variables = IdVariables;
    type Data = GetAircraftData;
}

pub struct CreateAircraft;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAircraftInput {
    pub registration: String,
    pub manufacturer: String,
    pub model: String,
    pub capacity: u32,
    pub status: AircraftStatus,
    pub year_of_manufacture: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateAircraftVariables {
    pub input: CreateAircraftInput,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAircraftData {
    pub create_aircraft: Option<Aircraft>,
}

impl GraphqlDocument for CreateAircraft {
    const OPERATION_NAME: &'static str = "CreateAircraft";
    const QUERY: &'static str = r#"mutation CreateAircraft($input: CreateAircraftInput!) {
  createAircraft(input: $input) {
    id
    registration
    manufacturer
    model
    status
  }
}"#;
    type Variables = CreateAircraftVariables;
    type Data = CreateAircraftData;
}

// Flights

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlightSummary {
    pub id: String,
    pub number: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub status: Option<FlightStatus>,
    pub aircraft: Option<AircraftRef>,
}

pub struct GetFlightById;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFlightByIdData {
    pub get_flight_by_id: Option<FlightSummary>,
}

impl GraphqlDocument for GetFlightById {
    const OPERATION_NAME: &'static str = "GetFlightById";
    const QUERY: &'static str = r#"query GetFlightById($id: ID!) {
  getFlightById(id: $id) {
    id
    number
    origin
    destination
    status
    aircraft {
      id
    }
  }
}"#;
    type Variables = IdVariables;
    type Data = GetFlightByIdData;
}

pub struct CreateFlight;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlightVariables {
    pub number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub aircraft_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFlight {
    pub id: String,
    pub number: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub aircraft: Option<AircraftRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFlightData {
    pub create_flight: Option<CreatedFlight>,
}

impl GraphqlDocument for CreateFlight {
    const OPERATION_NAME: &'static str = "CreateFlight";
    const QUERY: &'static str = r#"mutation CreateFlight(
  $number: String!
  $origin: String!
  $destination: String!
  $departureTime: Time!
  $arrivalTime: Time!
  $aircraftId: ID!
) {
  createFlight(
    number: $number
    origin: $origin
    destination: $destination
    departureTime: $departureTime
    arrivalTime: $arrivalTime
    aircraftId: $aircraftId
  ) {
    id
    number
    origin
    destination
    departureTime
    arrivalTime
    aircraft {
      id
    }
  }
}"#;
    type Variables = CreateFlightVariables;
    type Data = CreateFlightData;
}
