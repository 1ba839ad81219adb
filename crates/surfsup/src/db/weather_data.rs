use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::Date;
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Malformed {table} row: {reason}")]
    InvalidRecord { table: &'static str, reason: String },
    #[error("Required table '{0}' does not exist")]
    MissingTable(String),
}

/// Read access to the `measurement` and `station` tables.
///
/// Every call is a single scoped read; implementations hold no per-request state.
#[async_trait]
pub trait ObservationRepository: Sync + Send {
    /// All observations, newest date first
    async fn observations(&self) -> Result<Vec<Observation>, Error>;
    /// Observations recorded by one station, newest date first
    async fn station_observations(&self, station: &str) -> Result<Vec<Observation>, Error>;
    /// All stations ordered by id
    async fn stations(&self) -> Result<Vec<Station>, Error>;
    async fn health_check(&self) -> Result<(), Error>;
}

/// One daily reading from a single station
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: Date,
    pub station: String,
    /// `None` when the station reported no precipitation reading
    pub precipitation: Option<f64>,
    /// `None` when the station reported no temperature reading
    pub temperature: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Station {
    pub id: i64,
    /// Station code, e.g. `USC00519281`
    pub station: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}
