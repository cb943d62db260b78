mod audio;

use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AppServices, AudioOutput, ClientConfig, MemoryOutput, PlaybackCoordinator, QuizApi, StatsApi,
    TaskScheduler,
};
use ui::{App, UiApp, build_app_context};

use crate::audio::RodioOutput;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBackendUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBackendUrl { raw } => write!(f, "invalid --backend value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn playback(&self) -> PlaybackCoordinator {
        self.services.playback()
    }

    fn quiz_api(&self) -> Arc<dyn QuizApi> {
        self.services.backend()
    }

    fn stats_api(&self) -> Arc<dyn StatsApi> {
        self.services.backend()
    }

    fn scheduler(&self) -> TaskScheduler {
        self.services.scheduler()
    }

    fn is_signed_in(&self) -> bool {
        self.services.auth().token().is_signed_in()
    }
}

#[derive(Debug)]
struct Args {
    config: ClientConfig,
    mute: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui    [--backend <url>] [--token <token>] [--mute]");
    eprintln!("  cargo run -p app -- login [--backend <url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --backend {}", ClientConfig::DEFAULT_BACKEND_URL);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BACKEND_URL, QUIZ_API_TOKEN, QUIZ_API_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Login,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "login" => Some(Self::Login),
            _ => None,
        }
    }
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        base: ClientConfig,
    ) -> Result<Self, ArgsError> {
        let mut config = base;
        let mut mute = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--backend" => {
                    let value = require_value(args, "--backend")?;
                    let trimmed = value.trim();
                    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                        return Err(ArgsError::InvalidBackendUrl { raw: value });
                    }
                    config = config.with_backend_url(trimmed.trim_end_matches('/'));
                }
                "--token" => {
                    let value = require_value(args, "--token")?;
                    config = config.with_token(Some(value));
                }
                "--mute" => mute = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { config, mute })
    }
}

/// The rodio device when available, otherwise a silent output.
fn audio_output(mute: bool) -> Arc<dyn AudioOutput> {
    if mute {
        return Arc::new(MemoryOutput::new());
    }
    match RodioOutput::open() {
        Ok(output) => Arc::new(output),
        Err(err) => {
            log::warn!("{err}; previews will be silent");
            Arc::new(MemoryOutput::new())
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Launch the UI when no subcommand is given.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter, ClientConfig::from_env()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let scheduler = TaskScheduler::current();

    match cmd {
        Command::Ui => {
            let services = AppServices::new(parsed.config, audio_output(parsed.mute), scheduler)?;

            if services.auth().token().is_signed_in() {
                match services.auth().current_user().await {
                    Ok(user) => log::info!("signed in as {}", user.name()),
                    Err(err) => log::warn!("could not restore session: {err}"),
                }
            }

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app);

            // Dioxus/tao can default to an always-on-top window on macOS.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Music Quiz")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Login => {
            let services =
                AppServices::new(parsed.config, Arc::new(MemoryOutput::new()), scheduler)?;
            login(&services).await
        }
    }
}

async fn login(services: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let auth = services.auth();
    let url = auth.login_url().await?;
    println!("Open this URL and approve access:");
    println!("  {url}");
    print!("Paste the `code` parameter from the redirect: ");
    io::stdout().flush()?;

    let mut code = String::new();
    io::stdin().lock().read_line(&mut code)?;
    let user = auth.exchange_code(&code).await?;

    println!("Signed in as {}.", user.name());
    if let Some(token) = auth.token().get() {
        println!("Start the app with:");
        println!("  QUIZ_API_TOKEN={token} cargo run -p app -- ui");
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
