//! A stack of swipeable cards in the terminal.
//!
//! Drag the front card with the mouse and fling it left or right, or use the
//! arrow keys.  Undo brings the last card back.  The deck position is saved
//! on quit and restored on the next run.

mod app;
mod config;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing::{debug, trace, warn};

use swipe_deck::core::{CardStack, ItemProvider};
use swipe_deck::ui::{card_stack::CardStackWidget, layout::AppLayout, theme::Theme};

use crate::app::{
    cards::{self, Card},
    event::{report_swipe, spawn_event_reader, AppEvent, SwipeReport},
    handler,
    state::{AppState, Deck},
};
use crate::config::AppConfig;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Swipe through a stack of cards")]
struct Cli {
    /// Deck file, one card per line as `caption | detail`.
    #[arg(long)]
    items: Option<PathBuf>,

    /// Wrap around to the first card after the last.
    #[arg(long)]
    endless: bool,

    /// Cards shown behind the front one.
    #[arg(long)]
    visible: Option<usize>,

    /// Fraction of the deck width that counts as a full swipe.
    #[arg(long)]
    threshold: Option<f32>,

    /// Ratio at release that forces a swipe.
    #[arg(long = "min-ratio")]
    min_ratio: Option<f32>,

    /// Start at the first card instead of where the last run stopped.
    #[arg(long)]
    fresh: bool,
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    // ── configuration ─────────────────────────────────────────
    let mut user_config = AppConfig::load();
    if !AppConfig::exists_on_disk() {
        if let Err(e) = user_config.save() {
            warn!("could not write default config: {e}");
        }
    }
    let deck_settings = &mut user_config.deck;
    deck_settings.endless |= cli.endless;
    if let Some(visible) = cli.visible {
        deck_settings.visible_items = visible;
    }
    if let Some(threshold) = cli.threshold {
        deck_settings.swipe_threshold = threshold;
    }
    if let Some(min_ratio) = cli.min_ratio {
        deck_settings.min_ratio_bound = min_ratio;
    }
    let swipe_config = deck_settings.swipe_config();
    let frame_interval = Duration::from_millis(deck_settings.frame_ms);

    // ── deck ──────────────────────────────────────────────────
    let cards = match &cli.items {
        Some(path) => cards::load_deck(path)?,
        None => cards::sample_deck(),
    };
    let (swiped_tx, mut swiped_rx) = tokio::sync::mpsc::unbounded_channel::<SwipeReport>();
    let deck = Deck::new(cards)
        .on_swiped(move |card: &Card, direction| {
            report_swipe(&swiped_tx, &card.caption, direction);
        })
        .on_swiping(|offset, ratio, direction| {
            trace!("swiping {} offset={offset:.1} ratio={ratio:.2}", direction.label());
        });

    let saved = if cli.fresh {
        None
    } else {
        config::load_session()
    };
    let stack = match saved {
        Some(saved) if swipe_config.endless || saved.selected_index < deck.count() => {
            CardStack::restore(swipe_config, saved)?
        }
        Some(saved) => {
            debug!("saved index {} is past the deck, starting over", saved.selected_index);
            CardStack::new(swipe_config)?
        }
        None => CardStack::new(swipe_config)?,
    };
    let mut state = AppState::new(stack, deck, user_config);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(frame_interval);

    // ── event loop ────────────────────────────────────────────
    loop {
        handler::advance_frame(&mut state, Instant::now());
        terminal.draw(|frame| draw(frame, &mut state))?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m, at) => handler::handle_mouse(&mut state, m, at),
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick => {}
                }
            }

            Some((caption, direction)) = swiped_rx.recv() => {
                state.record_swipe(caption, direction);
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = config::save_session(&state.stack.save()) {
        warn!("could not save deck position: {e}");
    }

    Ok(())
}

fn draw(frame: &mut Frame, state: &mut AppState) {
    let layout = AppLayout::from_area(frame.area());
    state.deck_area = layout.deck_area;

    let deck_block = Block::default()
        .title(" swipe-deck ")
        .title_style(Theme::title_style())
        .title_bottom(Line::styled(
            format!(" {} ", state.config.status_bar_hint()),
            Theme::hint_style(),
        ))
        .borders(Borders::ALL)
        .border_style(Theme::border_style());

    let widget = CardStackWidget::new(&state.deck).block(deck_block);
    frame.render_stateful_widget(widget, layout.deck_area, &mut state.stack);

    let summary = state.deck_summary();
    let status_text = state.status_message.as_deref().unwrap_or(&summary);
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);
}
