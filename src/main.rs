use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use flappycow::core::geometry::Vec2;
use flappycow::core::GameConfig;
use flappycow::logging;
use flappycow::session::{
    blink_interval, lock_session, share, spawn_revive, GameSession, GameSummary, Services,
    SharedSession, SurfaceGate, TickDriver, TouchAction,
};
use flappycow::spawn::RngSource;
use flappycow::ui::{fits, map_key, map_mouse, play_area, Banner, GameInput, TerminalTarget};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

/// Command-line options for the terminal game.
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    log: Option<PathBuf>,
    seed: Option<u64>,
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'flappycow --help' for usage.");
            std::process::exit(1);
        }
    };

    if let Some(path) = &options.log {
        logging::init_file(path)?;
    }
    let mut config = GameConfig::load(options.config.as_deref())?;
    if options.seed.is_some() {
        config.seed = options.seed;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;

    let result = run(&config);

    // Cleanup terminal
    disable_raw_mode()?;
    stdout.execute(DisableMouseCapture)?;
    stdout.execute(LeaveAlternateScreen)?;

    if let Some(summary) = result? {
        println!(
            "Score {}  Coins {}  Revives {}",
            summary.score, summary.coins, summary.revives
        );
    }
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                let path = args.get(i + 1).ok_or("--config needs a path")?;
                options.config = Some(PathBuf::from(path));
                i += 1;
            }
            "--log" => {
                let path = args.get(i + 1).ok_or("--log needs a path")?;
                options.log = Some(PathBuf::from(path));
                i += 1;
            }
            "--seed" | "-s" => {
                let raw = args.get(i + 1).ok_or("--seed needs a number")?;
                options.seed = Some(raw.parse().map_err(|_| format!("bad seed: {}", raw))?);
                i += 1;
            }
            "--version" | "-v" => {
                println!("flappycow {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }
    Ok(options)
}

fn print_help() {
    println!("Flappy Cow - terminal edition\n");
    println!("Usage: flappycow [options]\n");
    println!("Options:");
    println!("  -c, --config <path>  Load settings from a JSON file");
    println!("      --log <path>     Write logs to a file (filter with RUST_LOG)");
    println!("  -s, --seed <n>       Seed the obstacle and power-up rolls");
    println!("  -v, --version        Show version information");
    println!("  -h, --help           Show this help message");
    println!();
    println!("Environment: FLAPPYCOW_SEED, FLAPPYCOW_TICK_MS, FLAPPYCOW_WIDTH, FLAPPYCOW_HEIGHT");
}

/// Play until the user quits. Returns the last finished life, if any.
fn run(config: &GameConfig) -> io::Result<Option<GameSummary>> {
    let viewport = config.viewport();
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let (cols, rows) = crossterm::terminal::size()?;

    let gate = if fits(cols, rows) {
        SurfaceGate::new()
    } else {
        SurfaceGate::suspended()
    };
    let banner = Banner::default();
    let (tx, rx) = mpsc::channel();

    let random = RngSource::from_seed_option(config.seed);
    let services = Services::headless(viewport, Box::new(random))
        .with_target(TerminalTarget::new(
            terminal,
            viewport,
            gate.clone(),
            banner.clone(),
        ))
        .with_game_over(tx);
    let session = share(GameSession::new(viewport, services));

    // The tutorial is drawn as soon as there is room for it.
    let mut tutorial_pending = true;
    if gate.is_ready() {
        lock_session(&session).show_tutorial();
        tutorial_pending = false;
    } else {
        lock_session(&session).pause();
    }

    let mut driver = TickDriver::spawn(Arc::clone(&session), config.tick_interval())?;
    let outcome = input_loop(
        &session,
        config,
        &gate,
        &banner,
        &rx,
        (cols, rows),
        tutorial_pending,
    );

    // Wake a render blocked on the gate before joining the tick thread.
    gate.close();
    driver.stop();
    outcome
}

fn input_loop(
    session: &SharedSession,
    config: &GameConfig,
    gate: &SurfaceGate,
    banner: &Banner,
    game_over: &Receiver<GameSummary>,
    mut size: (u16, u16),
    mut tutorial_pending: bool,
) -> io::Result<Option<GameSummary>> {
    let viewport = config.viewport();
    let mut last_summary = None;

    loop {
        while let Ok(summary) = game_over.try_recv() {
            banner.set(format!(
                "Game Over\nScore {}  Coins {}\n\n[R] Revive  [Q] Quit",
                summary.score, summary.coins
            ));
            if gate.is_ready() {
                lock_session(session).redraw();
            }
            last_summary = Some(summary);
        }

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        let input = match event::read()? {
            Event::Key(key) => map_key(key),
            Event::Mouse(mouse) => map_mouse(mouse, play_area(size.0, size.1), viewport),
            Event::Resize(cols, rows) => {
                size = (cols, rows);
                if fits(cols, rows) {
                    gate.open();
                    let mut s = lock_session(session);
                    if tutorial_pending {
                        s.show_tutorial();
                        tutorial_pending = false;
                    } else {
                        s.redraw();
                    }
                } else {
                    gate.suspend();
                }
                continue;
            }
            _ => continue,
        };

        if input == GameInput::Quit {
            return Ok(last_summary);
        }
        // A render waiting on the gate holds the session lock.
        if !gate.is_ready() {
            continue;
        }

        if input == GameInput::Revive {
            if lock_session(session).is_over() {
                banner.clear();
                spawn_revive(session, blink_interval(config.tick_interval()))?;
            }
            continue;
        }

        let mut s = lock_session(session);
        let action = match input {
            GameInput::Flap => s.touch(Vec2::new(viewport.width / 2.0, viewport.height / 2.0)),
            GameInput::Touch(point) => s.touch(point),
            GameInput::TogglePause => {
                let button = s.scenery().pause_rect();
                s.touch(Vec2::new(
                    button.x + button.width / 2.0,
                    button.y + button.height / 2.0,
                ))
            }
            _ => TouchAction::Ignored,
        };
        match action {
            TouchAction::Paused => {
                banner.set("Paused\n\n[P] Resume");
                s.redraw();
            }
            TouchAction::Resumed => banner.clear(),
            _ => {}
        }
    }
}
