//! Request/response adapters for the utility commands.

pub mod weather;
pub mod wiki;

pub use weather::WeatherClient;
pub use wiki::WikiClient;
