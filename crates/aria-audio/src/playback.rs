use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use parking_lot::Mutex;

use aria_foundation::AudioError;

use crate::frame::{f32_to_pcm16, AudioFrame};

/// Commands consumed by the playback worker. `Cancel` empties the device
/// buffer and terminates the worker thread.
#[derive(Debug)]
pub enum PlayCommand {
    Frame(AudioFrame),
    Cancel,
}

/// Dedicated playback thread.
///
/// The output device is opened lazily on the first frame and held across
/// consecutive frames; it is closed only after the queue has been idle for
/// one poll interval and the buffered samples have drained, so back-to-back
/// units do not churn the device.
pub struct PlaybackWorker;

impl PlaybackWorker {
    pub fn spawn(
        rx: Receiver<PlayCommand>,
        poll_interval: Duration,
    ) -> Result<JoinHandle<()>, AudioError> {
        thread::Builder::new()
            .name("aria-playback".to_string())
            .spawn(move || playback_loop(rx, poll_interval))
            .map_err(|e| AudioError::ThreadSpawn(e.to_string()))
    }
}

fn playback_loop(rx: Receiver<PlayCommand>, poll_interval: Duration) {
    let mut output: Option<OutputStream> = None;

    loop {
        match rx.recv_timeout(poll_interval) {
            Ok(PlayCommand::Frame(frame)) => {
                if output.is_none() {
                    match OutputStream::open(frame.sample_rate) {
                        Ok(stream) => output = Some(stream),
                        Err(e) => {
                            // Playback is best-effort; the frame still went
                            // to the other sinks.
                            tracing::error!("Failed to open output device: {}", e);
                            continue;
                        }
                    }
                }
                if let Some(out) = &output {
                    out.enqueue(&frame);
                }
            }
            Ok(PlayCommand::Cancel) => {
                if let Some(out) = output.take() {
                    out.clear();
                }
                break;
            }
            Err(RecvTimeoutError::Timeout) => {
                if let Some(out) = &output {
                    if out.is_drained() {
                        tracing::debug!("Playback idle, closing output device");
                        output = None;
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    tracing::debug!("Playback worker exiting");
}

/// An open cpal output stream fed from a shared sample queue. The device
/// callback drains the queue and pads with silence when it runs dry.
struct OutputStream {
    _stream: cpal::Stream,
    buffer: Arc<Mutex<VecDeque<i16>>>,
}

impl OutputStream {
    fn open(sample_rate: u32) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let buffer: Arc<Mutex<VecDeque<i16>>> = Arc::new(Mutex::new(VecDeque::new()));
        let cb_buffer = buffer.clone();
        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut buf = cb_buffer.lock();
                for sample in data.iter_mut() {
                    *sample = buf
                        .pop_front()
                        .map(|s| f32::from(s) / 32768.0)
                        .unwrap_or(0.0);
                }
            },
            |err| tracing::error!("Playback stream error: {}", err),
            None,
        )?;
        stream.play()?;

        Ok(Self {
            _stream: stream,
            buffer,
        })
    }

    fn enqueue(&self, frame: &AudioFrame) {
        self.buffer.lock().extend(f32_to_pcm16(&frame.samples));
    }

    fn is_drained(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    fn clear(&self) {
        self.buffer.lock().clear();
    }
}
