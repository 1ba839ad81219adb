mod dates;
pub mod db;
mod query;
pub mod routes;
mod startup;
pub mod templates;
mod utils;

pub use dates::*;
pub use db::{Observation, ObservationRepository, SqliteRepository, Station};
pub use query::*;
pub use routes::*;
pub use startup::*;
pub use utils::*;
