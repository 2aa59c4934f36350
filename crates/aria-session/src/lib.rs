//! Streaming synthesis session pipeline
//!
//! Coordinates three independently paced activities: text arriving from the
//! caller, sentence-by-sentence inference on a dedicated worker thread, and
//! audio consumption by the configured sinks (live playback, file save,
//! streaming channel). One session is active at a time; sessions are bounded
//! by `start_session`/`end_session` and can be cancelled mid-flight with
//! `stop`.

pub mod engine;
pub mod pipeline;
pub mod session;

pub use engine::{Engine, SayOptions};
pub use pipeline::SessionPipeline;
pub use session::{SessionError, SessionOptions, StreamChunk, StreamSender};
