pub mod climate_routes;
mod error;
pub mod health;

pub use climate_routes::*;
pub use error::ErrorBody;
pub use health::*;
