use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};

use stepline::runtime::{Player, PlayerHandle, PlayerOptions};
use stepline::{
    build_step_sequence, config, render, util, Config, EffectSink, Engine, Mode,
    PlaybackSnapshot, Transcript,
};

const HELP: &str = "commands: s = start stepped, c = start continuous, p/enter = pause/resume, \
b = back one checkpoint, r = reset, q = quit";

#[derive(Parser)]
#[command(name = "stepline", version, about = "Step-timeline playback with checkpoint rewind")]
struct Cli {
    /// Config file (defaults to <data-dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (defaults to ~/.stepline)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play the demo to the end without interaction
    Run {
        #[command(flatten)]
        playback: PlaybackArgs,

        /// Print the final snapshot as JSON instead of the answer
        #[arg(long)]
        json: bool,
    },
    /// Interactive playback driven by line commands on stdin
    Play(PlaybackArgs),
    /// Print the shape of the configured step sequence
    Plan,
}

#[derive(Args, Default)]
struct PlaybackArgs {
    /// Playback mode (overrides the config file)
    #[arg(long, value_enum)]
    mode: Option<CliMode>,

    /// Playback rate multiplier, 0 to skip waiting (overrides the config file)
    #[arg(long, value_parser = parse_speed)]
    speed: Option<f64>,
}

fn parse_speed(value: &str) -> Result<f64, String> {
    let speed: f64 = value.parse().map_err(|e| format!("{e}"))?;
    config::validate_speed(speed).map_err(|e| e.to_string())
}

#[derive(Clone, Copy, ValueEnum)]
enum CliMode {
    Continuous,
    Stepped,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Continuous => Mode::Continuous,
            CliMode::Stepped => Mode::Stepped,
        }
    }
}

impl PlaybackArgs {
    fn apply(&self, config: Config) -> Config {
        let config = match self.mode {
            Some(mode) => config.with_mode(mode.into()),
            None => config,
        };
        match self.speed {
            Some(speed) => config.with_speed(speed),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir.clone());

    // Initialize logging to file (~/.stepline/logs/stepline.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    let config_path = cli.config.clone().unwrap_or_else(util::config_path);
    let config = Config::load(&config_path);

    match cli.command {
        Some(Command::Run { playback, json }) => run(&playback.apply(config), json).await,
        Some(Command::Play(playback)) => play(&playback.apply(config)).await,
        Some(Command::Plan) => print_plan(&config),
        None => play(&config).await,
    }
}

fn spawn_player(config: &Config, effects: EffectSink) -> Result<PlayerHandle<Transcript>> {
    let plan = config.demo_plan().context("invalid demo configuration")?;
    let sequence = build_step_sequence(&plan, effects)?;
    let options = PlayerOptions::default().with_speed(config.speed);
    Ok(Player::spawn(Engine::new(sequence), options))
}

async fn run(config: &Config, json: bool) -> Result<()> {
    let handle = spawn_player(config, EffectSink::discard())?;
    handle.start(config.mode);

    // Stepped runs continue past each boundary on their own
    let mut last_cursor = 0;
    let done = loop {
        let snapshot = handle
            .wait_until(|s| s.finished || (s.paused && s.cursor > last_cursor))
            .await
            .context("player stopped before finishing")?;
        if snapshot.finished {
            break snapshot;
        }
        last_cursor = snapshot.cursor;
        handle.resume();
    };
    handle.shutdown();

    if json {
        println!("{}", serde_json::to_string_pretty(&done)?);
    } else {
        println!("{}", done.accumulated.answer);
    }
    Ok(())
}

/// Key that changes only when something worth reprinting happened
fn view_key(snapshot: &PlaybackSnapshot<Transcript>) -> (String, bool, bool, bool, bool) {
    (
        snapshot.accumulated.answer.clone(),
        snapshot.accumulated.prompt.is_some(),
        snapshot.running,
        snapshot.paused,
        snapshot.finished,
    )
}

async fn play(config: &Config) -> Result<()> {
    let (effects, mut visuals) = EffectSink::channel();
    let handle = spawn_player(config, effects)?;
    let mut updates = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_key = view_key(&handle.snapshot());

    println!("{HELP}");
    handle.start(config.mode);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "s" => { handle.start(Mode::Stepped); }
                    "c" => { handle.start(Mode::Continuous); }
                    "p" | "" => { handle.toggle_pause(); }
                    "b" => { handle.rewind(); }
                    "r" => { handle.reset(); }
                    "q" => break,
                    "h" | "?" => println!("{HELP}"),
                    other => println!("unknown command: {other}"),
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                let key = view_key(&snapshot);
                if key != last_key {
                    println!("{}", render::render_transcript(&snapshot.accumulated));
                    println!("{}\n", render::status_line(&snapshot));
                    last_key = key;
                }
            }
            Some(visual) = visuals.recv() => {
                if let Some(line) = render::visual_line(&visual) {
                    println!("{line}");
                }
            }
        }
    }

    handle.shutdown();
    Ok(())
}

fn print_plan(config: &Config) -> Result<()> {
    let plan = config.demo_plan().context("invalid demo configuration")?;
    let sequence = build_step_sequence(&plan, EffectSink::discard())?;
    println!("prompt: {}", plan.prompt);
    println!("steps: {}", sequence.len());
    println!("boundaries: {}", sequence.boundary_count());
    println!("duration: {:.1}s", sequence.total_duration().as_secs_f64());
    Ok(())
}
