pub mod frame;
pub mod playback;
pub mod wav;

// Public API
pub use frame::{f32_to_pcm16, AudioFrame};
pub use playback::{PlayCommand, PlaybackWorker};
pub use wav::write_wav_mono16;
