pub mod driver;
pub mod engine;
pub mod stats;

pub use driver::{DiscoveryDriver, WindowReport};
pub use engine::{Algorithm, EngineError, LogHandle, MiningEngine, ModelArtifact, RenderVariant};
pub use engine::http::HttpMiningEngine;
