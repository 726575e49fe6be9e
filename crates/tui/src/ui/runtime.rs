//! Runtime: the event loop and terminal lifecycle.
//!
//! - A dedicated input task polls `crossterm` and forwards events over a
//!   channel.
//! - Ticks run fast (100 ms) while backend work is in flight and slow (5 s)
//!   when idle.
//! - Backend tasks produced by [`cmd::run_from_effects`] are spawned on
//!   Tokio; their outcomes come back through a `FuturesUnordered` and are
//!   applied to the controller on this loop, so all state mutation stays
//!   single-threaded.
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use formwork_engine::{Outcome, Task};
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::app::{App, Effect, Msg};
use crate::cmd;
use crate::ui::main_component::MainView;

type Pending = FuturesUnordered<JoinHandle<Outcome>>;

const FAST_TICK: Duration = Duration::from_millis(100);
const IDLE_TICK: Duration = Duration::from_millis(5000);

/// Forward terminal input over a channel. Mouse moves are throttled to one
/// per 16 ms.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    tokio::spawn(async move {
        let frame = Duration::from_millis(16);
        let mut last_mouse_move = Instant::now();
        loop {
            match event::poll(frame) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(error) => {
                    warn!(%error, "failed to poll terminal input");
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    let is_mouse_move = event.as_mouse_event().is_some_and(|mouse| mouse.kind == MouseEventKind::Moved);
                    if is_mouse_move {
                        if last_mouse_move.elapsed() < frame {
                            continue;
                        }
                        last_mouse_move = Instant::now();
                    }
                    if sender.send(event).await.is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!(%error, "failed to read terminal input");
                    break;
                }
            }
        }
    });
    receiver
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| {
        let area = frame.area();
        main_view.render(frame, area, app);
    })?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Open and close dialogs; these never reach [`cmd::run_from_effects`].
fn handle_navigation_effects(app: &mut App, main_view: &mut MainView, effects: &mut Vec<Effect>) {
    let navigation = effects
        .extract_if(.., |effect| matches!(effect, Effect::ShowModal(_) | Effect::CloseModal))
        .collect::<Vec<_>>();
    for effect in navigation {
        match effect {
            Effect::ShowModal(modal) => main_view.set_open_modal_kind(app, Some(modal)),
            Effect::CloseModal => main_view.set_open_modal_kind(app, None),
            _ => {}
        }
    }
}

fn spawn_tasks(app: &mut App, pending: &mut Pending, tasks: Vec<Task>) {
    if tasks.is_empty() {
        return;
    }
    debug!(count = tasks.len(), "spawning backend tasks");
    pending.extend(tasks.into_iter().map(tokio::spawn));
    app.in_flight = pending.len();
}

/// Drain `effects` until no component asks for more.
fn process_effects(app: &mut App, main_view: &mut MainView, pending: &mut Pending, effects: &mut Vec<Effect>) {
    while !effects.is_empty() {
        let mut batch = std::mem::take(effects);
        handle_navigation_effects(app, main_view, &mut batch);
        let tasks = cmd::run_from_effects(app, batch);
        spawn_tasks(app, pending, tasks);
        main_view.close_stale_modal(app);
    }
}

/// Set up the terminal, run the event loop until the user quits, and
/// restore the terminal on the way out.
pub async fn run_app(mut app: App, initial: Vec<Effect>) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::new();
    let mut terminal = setup_terminal()?;

    let mut pending: Pending = FuturesUnordered::new();
    let mut effects = initial;
    process_effects(&mut app, &mut main_view, &mut pending, &mut effects);

    let mut current_interval = IDLE_TICK;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;

    let result = loop {
        let target_interval = if app.is_busy() || !app.toasts.is_empty() { FAST_TICK } else { IDLE_TICK };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = false;
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    break Ok(());
                };
                if let Event::Key(key_event) = event
                    && key_event.code == KeyCode::Char('c')
                    && key_event.modifiers.contains(KeyModifiers::CONTROL)
                {
                    break Ok(());
                }
                effects.extend(handle_input_event(&mut app, &mut main_view, event));
                needs_render = true;
            }

            _ = ticker.tick() => {
                let before = app.toasts.len();
                effects.extend(main_view.handle_message(&mut app, Msg::Tick));
                needs_render = app.is_busy() || before != app.toasts.len() || !effects.is_empty();
            }

            Some(joined) = pending.next(), if !pending.is_empty() => {
                app.in_flight = pending.len();
                match joined {
                    Ok(outcome) => {
                        let follow_ups = app.apply_outcome(outcome);
                        spawn_tasks(&mut app, &mut pending, follow_ups);
                    }
                    Err(error) => warn!(%error, "backend task failed to complete"),
                }
                effects.extend(main_view.handle_message(&mut app, Msg::TaskFinished));
                needs_render = true;
            }

            _ = signal::ctrl_c() => break Ok(()),
        }

        process_effects(&mut app, &mut main_view, &mut pending, &mut effects);
        if app.should_quit {
            break Ok(());
        }
        if needs_render && let Err(error) = render(&mut terminal, &mut app, &mut main_view) {
            break Err(error);
        }
    };

    for handle in pending.iter() {
        handle.abort();
    }
    cleanup_terminal(&mut terminal)?;
    result
}
