//! Hotkey Stopwatch - terminal stopwatch driven by global shortcuts

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use std::{
    fs::{self, File, OpenOptions},
    io::{self, stdout, Write},
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use hotkey_stopwatch::{
    config::{Config, LoggingConfig},
    keyboard::{self, KeyboardSource},
    ui::{App, AppState, HelpPanel, StatusBar, ThemeColors, TimerPanel},
};

fn main() -> Result<()> {
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(&config.logging);
    if let Some(e) = config_error {
        log::warn!("Ignoring config file: {}", e);
    }

    // Signals stand in for closing the window
    let quit_requested = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&quit_requested);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .context("failed to install signal handler")?;
    }

    let mut keyboard = keyboard::acquire_source(&config.input).map_err(|e| {
        log::error!("Keyboard unavailable: {}", e);
        e
    })?;
    log::info!(
        "Using {} backend, {:?} ticks",
        keyboard.name(),
        config.tick_interval()
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle(&config.timer.title))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let result = run(&mut terminal, &mut app, &mut *keyboard, &quit_requested);

    // Cleanup terminal
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen, SetTitle(""));
    let _ = terminal.show_cursor();
    drop(keyboard);

    if let Err(e) = result {
        log::error!("Fatal: {:#}", e);
        return Err(e);
    }

    println!("Stopwatch closed at {}", app.stopwatch().formatted());
    Ok(())
}

/// Tick loop: drain, update, retitle and redraw every interval until quit
fn run<B, S>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    keyboard: &mut S,
    quit_requested: &AtomicBool,
) -> Result<()>
where
    B: Backend + Write,
    S: KeyboardSource + ?Sized,
{
    let tick_interval = app.config.tick_interval();
    let colors = ThemeColors::from_theme(app.config.ui.theme);
    let backend_name = keyboard.name();
    let mut next_tick = Instant::now();

    loop {
        let now = Instant::now();
        if now >= next_tick {
            app.on_tick(keyboard, now)
                .context("keyboard device failed")?;

            execute!(terminal.backend_mut(), SetTitle(app.caption()))?;
            draw(terminal, app, colors, backend_name)?;

            // Reschedule from now so a stall never causes a burst of ticks
            next_tick = now + tick_interval;
        }

        if quit_requested.load(Ordering::SeqCst) {
            app.quit();
        }
        if app.state == AppState::Quitting {
            break;
        }

        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_local_key(app, key),
                Event::Resize(..) => draw(terminal, app, colors, backend_name)?,
                _ => {}
            }
        }
    }

    Ok(())
}

/// Keys typed into the focused terminal
fn handle_local_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char(' ') => app.toggle(Instant::now()),
        KeyCode::Char('r') => app.reset(),
        _ => {}
    }
}

fn draw<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &App,
    colors: ThemeColors,
    backend_name: &str,
) -> io::Result<()> {
    let caption = app.caption();
    let running = app.stopwatch().is_running();

    terminal.draw(|frame| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Timer
                Constraint::Length(6), // Keys
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());

        frame.render_widget(TimerPanel::new(&caption, running, colors), chunks[0]);
        frame.render_widget(HelpPanel::new(colors), chunks[1]);

        let state = if running { "RUNNING" } else { "STOPPED" };
        let status = StatusBar::new(state, backend_name, app.total_events, colors)
            .overflows(app.overflow_count)
            .message(app.get_status());
        frame.render_widget(status, chunks[2]);
    })?;

    Ok(())
}

/// Route log output to a file; the terminal belongs to the UI
fn init_logging(logging: &LoggingConfig) {
    let env = env_logger::Env::default().default_filter_or(logging.level.as_str());
    let mut builder = env_logger::Builder::from_env(env);
    builder.write_style(env_logger::WriteStyle::Never);

    match logging.log_path().map(|path| open_log_file(&path)) {
        Some(Ok(file)) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        _ => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }

    let _ = builder.try_init();
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
