//! Frame Difference CLI
//!
//! Runs the temporal frame difference engine over a synthetic image
//! sequence and reports per-frame change statistics and throughput.

use clap::{Parser, ValueEnum};
use frame_difference::{
    analysis::{MaskStatistics, RunReport},
    capture::{FileConfig, FrameSource, SyntheticSource},
    difference::{FrameDifferenceModel, ThresholdMode},
    metrics::{MetricsRegistry, MetricsSnapshot},
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Number of frames to process, including the seed frame
    #[arg(short, long)]
    frames: Option<u32>,

    /// Configured frame difference threshold
    #[arg(short, long)]
    threshold: Option<u32>,

    /// Threshold the mask is computed against
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Noise seed for the synthetic sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Per-channel noise amplitude
    #[arg(long)]
    noise: Option<u8>,

    /// Run until interrupted
    #[arg(long)]
    continuous: bool,

    /// Metrics server port (0 to disable)
    #[arg(long)]
    metrics_port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Adaptive,
    Configured,
}

impl From<ModeArg> for ThresholdMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Adaptive => ThresholdMode::Adaptive,
            ModeArg::Configured => ThresholdMode::Configured,
        }
    }
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    info!("Frame Difference v{}", frame_difference::VERSION);

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    if let Err(e) = ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst)) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }

    let registry = match MetricsRegistry::new() {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to create metrics registry: {}", e);
            std::process::exit(1);
        }
    };
    let exporter = Exporter::start(registry, config.output.metrics_port);

    match run(&config, &running, &exporter) {
        Ok(report) => {
            info!(
                started_at = %report.started_at(),
                frames = report.frames(),
                masks = report.computed(),
                changed_pixels = report.changed_pixels(),
                degenerate = report.degenerate(),
                "Sequence processed"
            );
            println!("\n{}\n", report);
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn load_config(args: &Args) -> Result<FileConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    if let Some(width) = args.width {
        config.sequence.width = width;
    }
    if let Some(height) = args.height {
        config.sequence.height = height;
    }
    if args.width.is_some() || args.height.is_some() {
        let side = config.sequence.width.min(config.sequence.height);
        config.sequence.object_size = config.sequence.object_size.min(side);
    }
    if let Some(frames) = args.frames {
        config.sequence.frame_count = frames;
    }
    if let Some(seed) = args.seed {
        config.sequence.seed = seed;
    }
    if let Some(noise) = args.noise {
        config.sequence.noise = noise;
    }
    if let Some(threshold) = args.threshold {
        config.model.frame_difference_threshold = threshold;
    }
    if let Some(mode) = args.mode {
        config.model.mode = mode.into();
    }
    if let Some(port) = args.metrics_port {
        config.output.metrics_port = port;
    }
    config.output.continuous |= args.continuous;

    config.validate()?;
    Ok(config)
}

fn run(
    config: &FileConfig,
    running: &AtomicBool,
    exporter: &Exporter,
) -> Result<RunReport, Box<dyn std::error::Error>> {
    let mut source = SyntheticSource::new();
    source.open(&config.sequence)?;

    let mut model = FrameDifferenceModel::with_config(config.model.clone());
    let background = config.model.background_label;
    let mut report = RunReport::start();
    let mut processed = 0u64;

    info!(
        mode = ?config.model.mode,
        configured_threshold = config.model.frame_difference_threshold,
        "Processing frames..."
    );

    while running.load(Ordering::SeqCst)
        && (config.output.continuous || processed < config.sequence.frame_count as u64)
    {
        let frame = match source.next_frame() {
            Ok(f) => f,
            Err(e) => {
                warn!("Frame source stopped: {}", e);
                break;
            }
        };
        processed += 1;

        if !model.is_initialized() {
            model.initialize(frame.pixels(), frame.width(), frame.height())?;
            report.record_frame();
            continue;
        }

        if let Err(e) = model.ingest(frame.pixels()) {
            warn!("Frame {}: skipped: {}", frame.sequence(), e);
            continue;
        }
        report.record_frame();

        let masks = match model.compute_masks() {
            Ok(m) => m,
            Err(e) => {
                warn!("Frame {}: mask computation failed: {}", frame.sequence(), e);
                continue;
            }
        };

        let stats = MaskStatistics::analyze(&masks, background);
        report.record_masks(&stats);

        if stats.degenerate {
            debug!("Frame {}: single-cluster frame", frame.sequence());
        }
        info!(
            frame = frame.sequence(),
            changed = stats.changed,
            ratio = stats.changed_ratio().unwrap_or(0.0),
            refined = stats.refined_threshold,
            applied = stats.applied_threshold,
            "Mask computed"
        );

        exporter.publish(&MetricsSnapshot::from_components(
            &model,
            &report,
            Some(&stats),
        ));
    }

    source.close();
    report.finish();
    Ok(report)
}

/// Metrics sink: an HTTP exporter with the `metrics` feature, otherwise a
/// local registry dumped at debug level on shutdown.
struct Exporter {
    #[cfg(feature = "metrics")]
    shared: frame_difference::metrics::SharedRegistry,
    #[cfg(feature = "metrics")]
    _runtime: Option<tokio::runtime::Runtime>,
    #[cfg(not(feature = "metrics"))]
    registry: MetricsRegistry,
}

impl Exporter {
    #[cfg(feature = "metrics")]
    fn start(registry: MetricsRegistry, port: u16) -> Self {
        use frame_difference::metrics::{MetricsServer, MetricsServerConfig};

        let server = MetricsServer::new(MetricsServerConfig::with_port(port), registry);
        let shared = server.registry();
        if port == 0 {
            return Self {
                shared,
                _runtime: None,
            };
        }

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                warn!("Metrics server disabled: {}", e);
                return Self {
                    shared,
                    _runtime: None,
                };
            }
        };
        runtime.spawn(async move {
            if let Err(e) = server.run().await {
                warn!("Metrics server stopped: {}", e);
            }
        });

        Self {
            shared,
            _runtime: Some(runtime),
        }
    }

    #[cfg(not(feature = "metrics"))]
    fn start(registry: MetricsRegistry, port: u16) -> Self {
        if port != 0 {
            debug!(port, "Built without the metrics feature; exporter disabled");
        }
        Self { registry }
    }

    #[cfg(feature = "metrics")]
    fn publish(&self, snapshot: &MetricsSnapshot) {
        self.shared.blocking_read().update(snapshot);
    }

    #[cfg(not(feature = "metrics"))]
    fn publish(&self, snapshot: &MetricsSnapshot) {
        self.registry.update(snapshot);
    }
}

#[cfg(not(feature = "metrics"))]
impl Drop for Exporter {
    fn drop(&mut self) {
        if let Ok(text) = self.registry.encode() {
            debug!("Final metrics:\n{}", text);
        }
    }
}
