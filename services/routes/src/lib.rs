pub mod directory;

#[cfg(test)]
mod tests;

pub use directory::{RouteDirectory, RouteError, WaypointSpec};
