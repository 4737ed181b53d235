use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use handcue::config::{EstimatorConfig, InjectorConfig};
use handcue::gesture::VOCABULARY;
use handcue::{
    CommandInjector, Config, Controller, FrameSource, KeyInjector, LogInjector, MediaKey,
    MirroredEstimator, PoseEstimator, RecordedFrame, RecordedPoseEstimator, ReplayDevice,
};

/// handcue - control media playback with hand gestures
#[derive(Parser)]
#[command(name = "handcue", version, about)]
struct Cli {
    /// Config file (defaults to ~/.config/handcue/config.toml)
    #[arg(short, long, env = "HANDCUE_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log commands instead of injecting keys
    #[arg(long)]
    dry_run: bool,

    /// Landmark recording to replay
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Restart the recording when it ends
    #[arg(long)]
    loop_replay: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the gesture vocabulary
    Gestures,
    /// Tap every media key once through the configured injector
    TestKeys {
        /// Delay between taps in milliseconds
        #[arg(short, long, default_value = "1500")]
        delay_ms: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,handcue=info",
        1 => "info,handcue=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;

    if cli.replay.is_some() {
        config.capture.replay = cli.replay;
    }
    config.capture.loop_replay |= cli.loop_replay;
    config.injector.dry_run |= cli.dry_run;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Some(Command::Gestures) => {
            print_vocabulary();
            Ok(())
        }
        Some(Command::TestKeys { delay_ms }) => test_keys(&config.injector, delay_ms).await,
        None => run_controller(config).await,
    }
}

async fn run_controller(config: Config) -> anyhow::Result<()> {
    // No camera means no tracking: this is the one fatal startup check
    let source = FrameSource::start::<ReplayDevice>(&config.capture)?;

    let estimator = build_estimator(&config.estimator);
    let injector = build_injector(&config.injector);
    let mut controller = Controller::new(&config, estimator, injector);

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown requested");
                shutdown.store(true, Ordering::Release);
            }
        });
    }

    print_vocabulary();
    tracing::info!("handcue ready - press Ctrl-C to quit");

    let (stats, failures) = tokio::task::spawn_blocking(move || {
        let stats = controller.run(&source, &shutdown);
        source.stop();
        (stats, controller.dispatch_failures())
    })
    .await?;

    tracing::info!(
        frames = stats.frames_processed,
        unavailable = stats.frames_unavailable,
        no_hand = stats.frames_without_hand,
        rejected = stats.frames_rejected,
        volume_up = stats.volume_up,
        volume_down = stats.volume_down,
        play = stats.play,
        pause = stats.pause,
        mute = stats.mute,
        dispatch_failures = failures,
        "session finished"
    );

    Ok(())
}

fn build_estimator(config: &EstimatorConfig) -> Box<dyn PoseEstimator<RecordedFrame> + Send> {
    let estimator = RecordedPoseEstimator::new(config);
    if config.mirror {
        Box::new(MirroredEstimator::new(estimator))
    } else {
        Box::new(estimator)
    }
}

/// Pick the key injector; a missing injector program degrades to dry run
fn build_injector(config: &InjectorConfig) -> Box<dyn KeyInjector + Send> {
    if config.dry_run {
        tracing::info!("dry run: keys will be logged, not injected");
        return Box::new(LogInjector);
    }

    match CommandInjector::new(config) {
        Ok(injector) => Box::new(injector),
        Err(e) => {
            tracing::warn!(error = %e, "key injector unavailable, falling back to dry run");
            Box::new(LogInjector)
        }
    }
}

fn print_vocabulary() {
    let line = VOCABULARY
        .iter()
        .map(|(gesture, action)| format!("{gesture} = {action}"))
        .collect::<Vec<_>>()
        .join(" | ");
    println!("{line}");
}

/// Tap each media key once
async fn test_keys(config: &InjectorConfig, delay_ms: u64) -> anyhow::Result<()> {
    let mut injector: Box<dyn KeyInjector + Send> = if config.dry_run {
        Box::new(LogInjector)
    } else {
        Box::new(CommandInjector::new(config)?)
    };

    for key in MediaKey::ALL {
        println!("Tapping {}...", key.name());
        if let Err(e) = injector.tap(key) {
            println!("  failed: {e}");
        }
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    println!("Done.");
    Ok(())
}
