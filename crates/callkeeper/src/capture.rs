//! Desktop realization of the capture backend.
//!
//! Desktop hosts have no call-tapped audio path, so the two voice-call
//! sources report unavailable and the probe falls through to the plain
//! microphone. Microphone capture runs on a dedicated worker thread
//! that owns the cpal stream end to end; the session handle only talks
//! to it over channels, so the handle stays `Send` while the stream
//! never crosses a thread boundary.
//!
//! The worker writes PCM WAV frames to the path the naming scheme
//! hands it. On-device backends produce the real AAC/MPEG-4 profile;
//! this one exists for development and for hosts where the microphone
//! is all there is.

use crate::config::CaptureConfig;

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
        mpsc::{Receiver, Sender, channel},
    },
    thread::JoinHandle,
    time::Duration,
};

use callkeeper_core::{
    CaptureBackend, CaptureSession, CaptureSource, CoreResult, EncodingProfile, RecordError,
};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, error, info, instrument, warn};

type SharedWriter = Arc<Mutex<Option<WavWriter<std::io::BufWriter<fs::File>>>>>;

/// Capture backend for desktop hosts.
pub struct DesktopCaptureBackend {
    input_device: Option<String>,
    max_duration: Duration,
}

impl DesktopCaptureBackend {
    /// Create a backend honoring the configured input device and cap.
    pub fn new(config: &CaptureConfig, max_duration: Duration) -> Self {
        Self {
            input_device: config.input_device.clone(),
            max_duration,
        }
    }
}

impl CaptureBackend for DesktopCaptureBackend {
    #[instrument(skip_all, fields(%source, output = ?output))]
    fn open(
        &self,
        source: CaptureSource,
        _profile: &EncodingProfile,
        output: &Path,
    ) -> CoreResult<Box<dyn CaptureSession>> {
        match source {
            CaptureSource::VoiceCall | CaptureSource::VoiceCommunication => {
                Err(unavailable(source, "no call-tapped audio path on this host"))
            }
            CaptureSource::Microphone => {
                let session = MicrophoneSession::open(
                    self.input_device.clone(),
                    self.max_duration,
                    output.to_path_buf(),
                )?;
                Ok(Box::new(session))
            }
        }
    }
}

#[track_caller]
fn unavailable(source: CaptureSource, reason: impl Into<String>) -> RecordError {
    RecordError::SourceUnavailable {
        source,
        reason: reason.into(),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[track_caller]
fn stop_failed(reason: impl Into<String>) -> RecordError {
    RecordError::StopFailed {
        reason: reason.into(),
        location: ErrorLocation::from(Location::caller()),
    }
}

enum Command {
    Start,
    Stop,
}

/// A prepared microphone capture, one worker thread per session.
///
/// Request/response over channels: `open` waits for the prepare ack
/// (device acquired, output created), `start`/`stop` each consume one
/// ack. The worker exits after `Stop`, on `Start` failure, or when the
/// command channel closes.
pub struct MicrophoneSession {
    cmd_tx: Sender<Command>,
    ack_rx: Receiver<CoreResult<()>>,
    worker: Option<JoinHandle<()>>,
    output: PathBuf,
    started: bool,
    released: bool,
}

impl MicrophoneSession {
    #[track_caller]
    fn open(
        device_name: Option<String>,
        max_duration: Duration,
        output: PathBuf,
    ) -> CoreResult<Self> {
        let (cmd_tx, cmd_rx) = channel();
        let (ack_tx, ack_rx) = channel();

        let worker_output = output.clone();
        let worker = std::thread::Builder::new()
            .name("mic-capture".into())
            .spawn(move || capture_worker(device_name, max_duration, worker_output, cmd_rx, ack_tx))
            .map_err(|e| {
                unavailable(
                    CaptureSource::Microphone,
                    format!("Failed to spawn capture thread: {}", e),
                )
            })?;

        // First ack is the prepare result.
        match ack_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                cmd_tx,
                ack_rx,
                worker: Some(worker),
                output,
                started: false,
                released: false,
            }),
            Ok(Err(e)) => {
                let _ = worker.join();
                Err(e)
            }
            Err(_) => {
                let _ = worker.join();
                Err(unavailable(
                    CaptureSource::Microphone,
                    "Capture thread exited during prepare",
                ))
            }
        }
    }

    fn release_resources(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        // Best-effort: the worker may already be gone after a stop or a
        // failed start.
        let _ = self.cmd_tx.send(Command::Stop);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }

        if !self.started {
            // Never started: nothing usable was written.
            let _ = fs::remove_file(&self.output);
            debug!(output = ?self.output, "Removed partial capture output");
        }
    }
}

impl CaptureSession for MicrophoneSession {
    #[instrument(skip(self), fields(output = ?self.output))]
    fn start(&mut self) -> CoreResult<()> {
        self.cmd_tx.send(Command::Start).map_err(|_| {
            unavailable(CaptureSource::Microphone, "Capture thread gone before start")
        })?;

        match self.ack_rx.recv() {
            Ok(Ok(())) => {
                self.started = true;
                info!("Microphone capture started");
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(unavailable(
                CaptureSource::Microphone,
                "Capture thread exited before start ack",
            )),
        }
    }

    #[instrument(skip(self), fields(output = ?self.output))]
    fn stop(&mut self) -> CoreResult<()> {
        self.cmd_tx
            .send(Command::Stop)
            .map_err(|_| stop_failed("Capture thread gone before stop"))?;

        let ack = match self.ack_rx.recv() {
            Ok(result) => result,
            Err(_) => Err(stop_failed("Capture thread exited before stop ack")),
        };

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }

        ack
    }

    fn release(&mut self) {
        self.release_resources();
    }
}

impl Drop for MicrophoneSession {
    fn drop(&mut self) {
        self.release_resources();
    }
}

fn capture_worker(
    device_name: Option<String>,
    max_duration: Duration,
    output: PathBuf,
    cmd_rx: Receiver<Command>,
    ack_tx: Sender<CoreResult<()>>,
) {
    let (device, config, writer) = match prepare(device_name, &output) {
        Ok(prepared) => {
            let _ = ack_tx.send(Ok(()));
            prepared
        }
        Err(e) => {
            let _ = ack_tx.send(Err(e));
            return;
        }
    };

    // Signals the audio callback to stop writing, either on stop or once
    // the duration cap is hit.
    let shutdown = Arc::new(AtomicBool::new(false));
    let max_samples =
        u64::from(config.sample_rate) * u64::from(config.channels) * max_duration.as_secs();
    let mut stream = None;

    while let Ok(command) = cmd_rx.recv() {
        match command {
            Command::Start => {
                match start_stream(
                    &device,
                    &config,
                    Arc::clone(&writer),
                    Arc::clone(&shutdown),
                    max_samples,
                ) {
                    Ok(s) => {
                        stream = Some(s);
                        let _ = ack_tx.send(Ok(()));
                    }
                    Err(e) => {
                        let _ = ack_tx.send(Err(e));
                        discard_partial(&writer, &output);
                        return;
                    }
                }
            }
            Command::Stop => {
                shutdown.store(true, Ordering::Release);
                if let Some(s) = stream.take() {
                    drop(s);
                    // Brief yield so an in-flight callback observes the
                    // shutdown flag before the writer is finalized.
                    std::thread::sleep(Duration::from_millis(5));
                }
                let _ = ack_tx.send(finalize_writer(&writer));
                return;
            }
        }
    }

    // Command channel closed without a Stop: the session was released.
    shutdown.store(true, Ordering::Release);
    if let Some(s) = stream.take() {
        drop(s);
        std::thread::sleep(Duration::from_millis(5));
    }
    let _ = finalize_writer(&writer);
}

#[track_caller]
fn prepare(
    device_name: Option<String>,
    output: &Path,
) -> CoreResult<(cpal::Device, cpal::StreamConfig, SharedWriter)> {
    let host = cpal::default_host();

    let device = match &device_name {
        Some(name) => host
            .input_devices()
            .map_err(|e| {
                unavailable(
                    CaptureSource::Microphone,
                    format!("Failed to enumerate input devices: {}", e),
                )
            })?
            .find(|d| d.name().map(|n| &n == name).unwrap_or(false))
            .ok_or_else(|| {
                unavailable(
                    CaptureSource::Microphone,
                    format!("Input device not found: {}", name),
                )
            })?,
        None => host.default_input_device().ok_or_else(|| {
            unavailable(CaptureSource::Microphone, "No default input device")
        })?,
    };

    let supported = device.default_input_config().map_err(|e| {
        unavailable(
            CaptureSource::Microphone,
            format!("Failed to get input config: {}", e),
        )
    })?;
    let config: cpal::StreamConfig = supported.into();

    let spec = WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let writer = WavWriter::create(output, spec).map_err(|e| {
        unavailable(
            CaptureSource::Microphone,
            format!("Failed to create output file: {}", e),
        )
    })?;

    info!(
        device = device.name().unwrap_or_else(|_| "unknown".into()),
        sample_rate = config.sample_rate,
        channels = config.channels,
        "Microphone capture prepared"
    );

    Ok((device, config, Arc::new(Mutex::new(Some(writer)))))
}

fn start_stream(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    writer: SharedWriter,
    shutdown: Arc<AtomicBool>,
    max_samples: u64,
) -> CoreResult<cpal::Stream> {
    let written = AtomicU64::new(0);

    let stream = device
        .build_input_stream(
            config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if shutdown.load(Ordering::Acquire) {
                    return;
                }

                // Duration safety cap, enforced here in the capture layer.
                let previous = written.fetch_add(data.len() as u64, Ordering::Relaxed);
                if previous >= max_samples {
                    shutdown.store(true, Ordering::Release);
                    return;
                }
                if previous + data.len() as u64 >= max_samples {
                    warn!("Capture duration cap reached, stopping writes");
                    shutdown.store(true, Ordering::Release);
                }

                // Recover from lock poison rather than silently dropping
                // audio; the writer itself is still valid.
                let mut guard = writer.lock().unwrap_or_else(|e| {
                    error!("Writer lock poisoned, recovering: {}", e);
                    e.into_inner()
                });
                if let Some(w) = guard.as_mut() {
                    for &sample in data {
                        if w.write_sample(sample).is_err() {
                            error!("Failed to write capture sample");
                            shutdown.store(true, Ordering::Release);
                            break;
                        }
                    }
                }
            },
            |err| {
                error!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| {
            unavailable(
                CaptureSource::Microphone,
                format!("Failed to build stream: {}", e),
            )
        })?;

    stream.play().map_err(|e| {
        unavailable(
            CaptureSource::Microphone,
            format!("Failed to start stream: {}", e),
        )
    })?;

    Ok(stream)
}

fn finalize_writer(writer: &SharedWriter) -> CoreResult<()> {
    let taken = writer
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .take();

    match taken {
        Some(w) => w
            .finalize()
            .map_err(|e| stop_failed(format!("Failed to finalize output: {}", e))),
        None => Ok(()),
    }
}

fn discard_partial(writer: &SharedWriter, output: &Path) {
    let _ = writer.lock().unwrap_or_else(|e| e.into_inner()).take();
    let _ = fs::remove_file(output);
}
