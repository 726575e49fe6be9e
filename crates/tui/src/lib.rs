//! # Formwork TUI
//!
//! A terminal front-end for browsing and editing the records of one object
//! through its configured layout. The list view, detail panel, edit form and
//! delete confirmation are all driven by the engine's `Controller`; this
//! crate only draws them with Ratatui and translates keys and clicks into
//! controller calls.
//!
//! ## Architecture
//!
//! Components implement a small `Component` trait and report side effects
//! as `Effect`s. The runtime turns effects into backend tasks, spawns them on
//! Tokio, and feeds each finished task back into the controller on the UI
//! loop.

mod app;
mod cmd;
pub mod logging;
mod ui;

use anyhow::Result;
use formwork_engine::Controller;

pub use logging::{LogLine, LogRing, LogRingLayer};

/// Run the TUI until the user quits.
///
/// `object_id` is opened first; `objects` lists the objects the user can
/// cycle through. `logs` should be the same ring whose layer is installed in
/// the tracing subscriber, so the logs dialog shows this session's events.
///
/// # Errors
///
/// Fails when the terminal cannot be put into (or restored from) raw mode or
/// a frame cannot be drawn.
pub async fn run(controller: Controller, object_id: String, objects: Vec<String>, logs: LogRing) -> Result<()> {
    let app = app::App::new(controller, objects, logs);
    ui::runtime::run_app(app, vec![app::Effect::LoadObject(object_id)]).await
}
