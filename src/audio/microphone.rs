use super::backend::{AudioChunk, CaptureBackend, CaptureConfig};
use crate::error::{Result, SessionError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::StreamConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Chunk channel capacity. The recording controller drains continuously, so
/// the channel only fills if the consumer stalls for several seconds.
const CHUNK_CHANNEL_CAPACITY: usize = 1024;

/// Microphone capture backend using the cpal default input device
///
/// cpal streams are not `Send`, so the stream lives on a dedicated thread
/// that is signalled through an atomic stop flag. Captured buffers are
/// downmixed to mono i16 and forwarded over the chunk channel.
pub struct MicrophoneBackend {
    config: CaptureConfig,
    stop_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    capturing: bool,
}

impl MicrophoneBackend {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl CaptureBackend for MicrophoneBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioChunk>> {
        if self.capturing {
            return Err(SessionError::MicAccess(
                "capture already active".to_string(),
            ));
        }

        let (chunk_tx, chunk_rx) = mpsc::channel(CHUNK_CHANNEL_CAPACITY);
        let (ready_tx, ready_rx) = std::sync::mpsc::channel::<std::result::Result<u32, String>>();

        let stop_flag = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop_flag);

        let worker = std::thread::spawn(move || capture_thread(chunk_tx, ready_tx, flag));

        // The device open result arrives before any audio does.
        let ready = tokio::task::spawn_blocking(move || ready_rx.recv())
            .await
            .map_err(|e| SessionError::MicAccess(format!("capture thread failed: {}", e)))?
            .map_err(|_| SessionError::MicAccess("capture thread exited early".to_string()))?;

        match ready {
            Ok(device_rate) => {
                info!(
                    device_rate,
                    preferred_rate = self.config.sample_rate,
                    "microphone capture started"
                );
                self.stop_flag = stop_flag;
                self.worker = Some(worker);
                self.capturing = true;
                Ok(chunk_rx)
            }
            Err(reason) => {
                let _ = worker.join();
                Err(SessionError::MicAccess(reason))
            }
        }
    }

    async fn stop(&mut self) -> Result<()> {
        if !self.capturing {
            return Ok(());
        }

        self.stop_flag.store(true, Ordering::SeqCst);

        if let Some(worker) = self.worker.take() {
            let _ = tokio::task::spawn_blocking(move || worker.join()).await;
        }

        self.capturing = false;
        info!("microphone capture stopped");
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "cpal-microphone"
    }
}

/// Owns the cpal stream for the duration of one capture.
///
/// Reports the device open result (or failure reason) through `ready_tx`,
/// then idles until the stop flag is raised. Dropping the stream at the end
/// closes the chunk channel.
fn capture_thread(
    chunk_tx: mpsc::Sender<AudioChunk>,
    ready_tx: std::sync::mpsc::Sender<std::result::Result<u32, String>>,
    stop_flag: Arc<AtomicBool>,
) {
    let host = cpal::default_host();

    let device = match host.default_input_device() {
        Some(d) => d,
        None => {
            let _ = ready_tx.send(Err("no input device available".to_string()));
            return;
        }
    };

    let supported = match device.default_input_config() {
        Ok(c) => c,
        Err(e) => {
            let _ = ready_tx.send(Err(format!("failed to get input config: {}", e)));
            return;
        }
    };

    let sample_format = supported.sample_format();
    let stream_config: StreamConfig = supported.into();
    let sample_rate = stream_config.sample_rate.0;
    let channels = stream_config.channels as usize;
    let started = Instant::now();

    let err_fn = |err| {
        error!("audio input stream error: {}", err);
    };

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            let tx = chunk_tx.clone();
            device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let samples = downmix_f32(data, channels);
                    send_chunk(&tx, samples, sample_rate, started);
                },
                err_fn,
                None,
            )
        }
        cpal::SampleFormat::I16 => {
            let tx = chunk_tx.clone();
            device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let samples = downmix_i16(data, channels);
                    send_chunk(&tx, samples, sample_rate, started);
                },
                err_fn,
                None,
            )
        }
        other => {
            let _ = ready_tx.send(Err(format!("unsupported sample format '{}'", other)));
            return;
        }
    };

    let stream = match stream {
        Ok(s) => s,
        Err(e) => {
            let _ = ready_tx.send(Err(format!("failed to build input stream: {}", e)));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = ready_tx.send(Err(format!("failed to start input stream: {}", e)));
        return;
    }

    let _ = ready_tx.send(Ok(sample_rate));

    while !stop_flag.load(Ordering::SeqCst) {
        std::thread::sleep(std::time::Duration::from_millis(20));
    }

    drop(stream);
}

/// Convert interleaved f32 samples to mono i16 by averaging channels
fn downmix_f32(data: &[f32], channels: usize) -> Vec<i16> {
    if channels <= 1 {
        data.iter().map(|&s| f32_to_i16(s)).collect()
    } else {
        data.chunks(channels)
            .map(|frame| f32_to_i16(frame.iter().sum::<f32>() / channels as f32))
            .collect()
    }
}

/// Convert interleaved i16 samples to mono by averaging channels
fn downmix_i16(data: &[i16], channels: usize) -> Vec<i16> {
    if channels <= 1 {
        data.to_vec()
    } else {
        data.chunks(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }
}

fn f32_to_i16(s: f32) -> i16 {
    (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

fn send_chunk(
    tx: &mpsc::Sender<AudioChunk>,
    samples: Vec<i16>,
    sample_rate: u32,
    started: Instant,
) {
    if samples.is_empty() {
        return;
    }

    let chunk = AudioChunk {
        samples,
        sample_rate,
        timestamp_ms: started.elapsed().as_millis() as u64,
    };

    if let Err(e) = tx.try_send(chunk) {
        debug!("failed to forward audio chunk: {}", e);
    }
}
