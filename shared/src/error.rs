use thiserror::Error;

/// Boundary-level failures. Not-Found conditions live with the component
/// that raises them (ledger, route directory) so callers can tell them
/// apart.
#[derive(Debug, Error, PartialEq)]
pub enum FleetError {
    #[error("{field} {value} is out of range")]
    InvalidCoordinate { field: &'static str, value: f64 },

    #[error("position report is missing a truck id")]
    MissingTruckId,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
