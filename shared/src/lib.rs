pub mod archive;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod geo;
pub mod logger;
pub mod routes;
pub mod types;


pub use archive::DeviationArchive;
pub use broadcast::Broadcaster;
pub use routes::RouteProvider;
