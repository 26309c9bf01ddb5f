//! A terminal page with a scroll-driven card stack.
//!
//! Run the binary to scroll through the page interactively.
//! Run with `--simulate <steps>` to drive the stack headlessly and print
//! what each frame computed.

use std::fs::File;
use std::io::{self, stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scroll_stack::app::{
    demo::demo_deck,
    event::{spawn_event_reader, AppEvent, FRAME_INTERVAL},
    handler,
    simulate::{print_report, simulate},
    state::{ActiveView, AppState},
};
use scroll_stack::config::AppConfig;
use scroll_stack::core::card::CardDeck;
use scroll_stack::core::tokens::{parse_duration, SizeToken};
use scroll_stack::ui::{layout::AppLayout, page::PageView, popup::SettingsPopup, theme::Theme};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Scroll-driven card stack")]
struct Cli {
    /// Card file to display (defaults to a built-in deck).
    #[arg(long)]
    cards: Option<PathBuf>,

    /// Section height in viewport heights.
    #[arg(long)]
    multiplier: Option<f64>,

    /// Card height, e.g. `60vh` or `300px`.
    #[arg(long = "card-height")]
    card_height: Option<SizeToken>,

    /// Card transition length, e.g. `0.5s` or `500ms`.
    #[arg(long, value_parser = parse_duration)]
    duration: Option<Duration>,

    /// Visible share of the section that counts as "in view".
    #[arg(long)]
    threshold: Option<f64>,

    /// Recompute on every frame, even while the section is out of view.
    #[arg(long = "always-listen")]
    always_listen: bool,

    /// Run headlessly for this many scroll steps and print a report.
    #[arg(long, value_name = "STEPS")]
    simulate: Option<usize>,

    /// Viewport height used by `--simulate`.
    #[arg(long, default_value_t = 800.0)]
    viewport: f64,

    /// Scroll events sent per simulated step.
    #[arg(long, default_value_t = 3)]
    burst: usize,

    /// Write logs to this file instead of stderr.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Headline shown above the stack.
    #[arg(long, default_value = "Portfolio")]
    title: String,
}

impl Cli {
    /// Command-line values win over the config file.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(m) = self.multiplier {
            config.section_height_multiplier = m;
        }
        if let Some(h) = self.card_height {
            config.card_height = h;
        }
        if let Some(d) = self.duration {
            config.animation_duration = d;
        }
        if let Some(t) = self.threshold {
            config.intersection_threshold = t;
        }
        if self.always_listen {
            config.gate_on_visibility = false;
        }
    }
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr) // never pollute stdout
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let mut config = AppConfig::load();
    cli.apply(&mut config);

    let deck = match &cli.cards {
        Some(path) => CardDeck::load(path)
            .with_context(|| format!("cannot load cards from {}", path.display()))?,
        None => demo_deck(),
    };
    info!(cards = deck.len(), "deck ready");

    // ── headless mode ─────────────────────────────────────────
    if let Some(steps) = cli.simulate {
        let records = simulate(
            deck,
            config.controller_options()?,
            config.intersection_threshold,
            cli.viewport,
            steps,
            cli.burst,
        )?;
        print_report(&records, &mut io::stdout().lock())?;
        return Ok(());
    }

    // Anything that can reject bad options runs before raw mode.
    let (width, height) = crossterm::terminal::size()?;
    let mut state = AppState::new(config, deck, Rect::new(0, 0, width, height), cli.title.clone())?;
    state.persist_config = true;

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(FRAME_INTERVAL);
    let mut last_frame = Instant::now();

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area());
            let transforms = state.drawn_transforms();

            frame.render_widget(
                PageView {
                    page: &state.page,
                    deck: state.deck(),
                    transforms: &transforms,
                    card_height: state.config.card_height,
                    title: &state.title,
                },
                layout.page_area,
            );

            let hint = state.config.status_bar_hint();
            let status_text = match state.active_view {
                ActiveView::Page => state.status_message.as_deref().unwrap_or(&hint),
                ActiveView::SettingsMenu => "",
            };
            let status = Paragraph::new(Line::from(vec![
                Span::styled(format!(" {} ", state.stack_summary()), Theme::progress_style()),
                Span::raw(" "),
                Span::raw(status_text),
            ]))
            .style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);

            if state.active_view == ActiveView::SettingsMenu {
                frame.render_widget(
                    SettingsPopup {
                        state: &state,
                        selected: state.settings_selected,
                    },
                    frame.area(),
                );
            }
        })?;

        let Some(event) = events.recv().await else {
            break;
        };
        match event {
            AppEvent::Key(k) => handler::handle_key(&mut state, k),
            AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
            AppEvent::Resize(w, h) => state.resize(w, h),
            AppEvent::Tick => {
                let now = Instant::now();
                state.frame(now - last_frame);
                last_frame = now;
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    // Unmount before leaving so every listener is released.
    state.section = None;
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
