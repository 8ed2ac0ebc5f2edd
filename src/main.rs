//! KeyDeck - terminal keyboard tester and typing speed test

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use log::{info, warn};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::border,
    widgets::{Block, Borders, Clear},
    Frame, Terminal,
};
use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::time::{Duration, Instant};

use keydeck::{
    config::{self, Config},
    feedback::BellFeedback,
    ui::{
        App, AppState, AppView, HelpPanel, HistoryPanel, InfoPanel, KeyboardVisual, ResultsPanel,
        SpeedTestPanel, StatusBar, TabBar,
    },
};

/// Log to a file when RUST_LOG is set; the terminal belongs to the UI
fn init_logging() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let path = config::log_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn restore_terminal(enhanced: bool) -> io::Result<()> {
    if enhanced {
        execute!(stdout(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)
}

fn main() -> Result<()> {
    init_logging()?;

    let config = Config::load().unwrap_or_else(|e| {
        warn!("config not loaded, using defaults: {e}");
        Config::default()
    });
    let tick_rate = config.refresh_interval();

    let mut app = App::new(config);
    match config::config_path() {
        Ok(path) => app = app.with_config_path(path),
        Err(e) => warn!("theme will not be saved: {e}"),
    }
    app.set_feedback(Box::new(BellFeedback::new()));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
            )
        )?;
    }
    app.set_release_events(enhanced);
    info!("terminal ready (key release events: {enhanced})");

    ctrlc::set_handler(move || {
        let _ = restore_terminal(enhanced);
        std::process::exit(130);
    })
    .context("installing signal handler")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, tick_rate);

    restore_terminal(enhanced)?;
    terminal.show_cursor()?;
    result?;

    println!("\nKeyDeck session complete ({}).", app.elapsed_formatted());
    if let Some(best) = app.results.best_wpm() {
        println!("Tests finished: {}, best {} WPM", app.results.len(), best);
    }

    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        let now = Instant::now();
        app.poll(now);
        terminal.draw(|frame| draw(frame, app, now))?;

        if event::poll(tick_rate)? {
            loop {
                if let Event::Key(key) = event::read()? {
                    app.handle_key(&key, Instant::now());
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if app.state == AppState::Quitting {
            return Ok(());
        }
    }
}

fn draw(frame: &mut Frame, app: &App, now: Instant) {
    let colors = app.colors();
    let size = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(colors.bg)), size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(10),   // View
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    let tab_names: Vec<&str> = AppView::all().iter().map(|v| v.name()).collect();
    frame.render_widget(TabBar::new(&tab_names, app.view.index(), colors), chunks[0]);

    match app.view {
        AppView::Tester => draw_tester(frame, app, now, chunks[1]),
        AppView::SpeedTest => draw_speed_test(frame, app, chunks[1]),
    }

    if app.show_help {
        let area = centered(chunks[1], 66, 11);
        frame.render_widget(Clear, area);
        frame.render_widget(HelpPanel::new(colors), area);
    }

    let settings = format!(
        "{} | {} | {}{}",
        app.config.keyboard.sound_profile,
        app.config.ui.theme,
        app.elapsed_formatted(),
        if app.config.ui.rgb_mode { " | RGB" } else { "" }
    );
    let status = StatusBar::new(app.view.name(), app.layout.id.name(), settings, colors)
        .message(app.get_status());
    frame.render_widget(status, chunks[2]);
}

fn draw_tester(frame: &mut Frame, app: &App, now: Instant, area: Rect) {
    let colors = app.colors();
    let kb_height = app.layout.height().ceil() as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(kb_height),
            Constraint::Length(5),
            Constraint::Min(3),
        ])
        .split(area);

    let kb_block = Block::default()
        .title(format!(" ⌨ {} ", app.layout.id.name()))
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(colors.dim));
    let kb_inner = kb_block.inner(chunks[0]);
    frame.render_widget(kb_block, chunks[0]);
    let visual =
        KeyboardVisual::new(&app.layout, &app.tracker, colors).rgb(app.rgb_phase(now));
    frame.render_widget(visual, kb_inner);

    frame.render_widget(InfoPanel::new(&app.tracker, now, colors), chunks[1]);
    frame.render_widget(HistoryPanel::new(&app.tracker, colors), chunks[2]);
}

fn draw_speed_test(frame: &mut Frame, app: &App, area: Rect) {
    let colors = app.colors();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(12)])
        .split(area);

    frame.render_widget(SpeedTestPanel::new(&app.engine, colors), chunks[0]);
    frame.render_widget(ResultsPanel::new(&app.results, colors), chunks[1]);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
