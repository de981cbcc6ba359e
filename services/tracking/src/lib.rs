pub mod cache;
pub mod pipeline;


pub use cache::PositionCache;
pub use pipeline::{PositionUpdate, UpdatePipeline};
