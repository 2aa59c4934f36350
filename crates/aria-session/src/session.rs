//! Session-scoped configuration and the streaming wire format

use std::path::PathBuf;

use thiserror::Error;

use aria_tts::TtsError;

/// Payload delivered on the streaming channel: raw little-endian 16-bit PCM
/// chunks, terminated by `End`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    Pcm(Vec<u8>),
    End,
}

/// Thread-safe handle into the consumer's event loop. Sending from the
/// inference worker never blocks; the receiving task drains at its own pace.
pub type StreamSender = tokio::sync::mpsc::UnboundedSender<StreamChunk>;

/// Everything one session needs, fixed at `start_session` and handed to the
/// inference worker before any unit of the session. Replaces ambient
/// "current voice" state: the worker only ever reads the config it was
/// given.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Voice profile units of this session resolve against. Units fed while
    /// this is unset are skipped with an error log.
    pub voice: Option<String>,
    /// Deliver frames to the live playback queue.
    pub play: bool,
    /// Accumulate frames and write them as one WAV file at session end.
    pub save_path: Option<PathBuf>,
    /// Deliver each frame's PCM bytes to this channel as it is produced.
    pub stream: Option<StreamSender>,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Tts(#[from] TtsError),

    #[error("Worker thread spawn failed: {0}")]
    WorkerSpawn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
