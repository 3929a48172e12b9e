//! Hard-link creation: validates one [`LinkRequest`](crate::models::link::LinkRequest),
//! then links every requested source in order, streaming one event per file.

pub mod decision;
pub mod engine;
pub mod sink;

pub use engine::{EngineState, HardlinkEngine, LinkReport};
pub use sink::ProgressSink;
