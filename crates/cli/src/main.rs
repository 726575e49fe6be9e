use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use formwork_api::{Fixture, FormworkClient, InMemoryBackend, ObjectBackend};
use formwork_engine::{Controller, ListView, NO_RECORDS_MESSAGE, ViewStatus, no_layout_message, render_page};
use formwork_tui::LogRing;
use formwork_types::{LayoutStage, RecordId, Severity};
use formwork_util::Settings;
use formwork_util::config::default_log_path;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Layout-driven record views for custom objects.
#[derive(Debug, Parser)]
#[command(name = "formwork", version, about)]
struct Cli {
    /// Base URL of the Formwork API (overrides config and FORMWORK_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Layout revision to render
    #[arg(long, global = true, value_name = "draft|published")]
    mode: Option<LayoutStage>,

    /// Serve objects from a JSON or YAML fixture instead of the API
    #[arg(long, global = true, value_name = "FILE")]
    fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Browse and edit records interactively
    Tui {
        object: String,
    },
    /// Render an object's record view as an HTML page
    Render(RenderArgs),
    /// Print the list view as tab-separated text
    List {
        object: String,
    },
}

#[derive(Debug, Args)]
struct RenderArgs {
    object: String,
    /// Show this record in the detail panel
    #[arg(long)]
    record: Option<String>,
    /// Active section when the layout uses tabs
    #[arg(long)]
    tab: Option<String>,
    #[arg(long)]
    search: Option<String>,
    /// Field to sort the list by
    #[arg(long)]
    sort: Option<String>,
    /// Write the page here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_ring = init_tracing(matches!(cli.command, Command::Tui { .. }))?;

    let mut settings = Settings::load().context("failed to load settings")?;
    if let Some(api_base) = cli.api_base.clone() {
        settings.api_base = api_base;
    }
    if let Some(stage) = cli.mode {
        settings.layout_stage = stage;
    }
    let (backend, objects) = build_backend(cli.fixture.as_deref(), &settings)?;

    match cli.command {
        Command::Tui { object } => {
            let controller = Controller::new(backend, settings.layout_stage);
            let objects = if objects.contains(&object) { objects } else { vec![object.clone()] };
            info!(%object, stage = %settings.layout_stage, "starting tui");
            formwork_tui::run(controller, object, objects, log_ring.unwrap_or_default()).await
        }
        Command::Render(args) => {
            let controller = load(backend, settings.layout_stage, &args.object).await?;
            let page = render_html(controller, &args)?;
            match &args.output {
                Some(path) => {
                    fs::write(path, page).with_context(|| format!("failed to write {}", path.display()))?;
                    info!(path = %path.display(), "wrote page");
                }
                None => print!("{page}"),
            }
            Ok(())
        }
        Command::List { object } => {
            let controller = load(backend, settings.layout_stage, &object).await?;
            let view = controller.list_view().context("object has no schema")?;
            for line in list_lines(&view, controller.stage()) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

/// Install the global subscriber. The TUI owns the terminal, so in TUI mode
/// events go to the log file and the in-app ring instead of stderr.
fn init_tracing(tui: bool) -> Result<Option<LogRing>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !tui {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .context("failed to install tracing subscriber")?;
        return Ok(None);
    }

    let log_path = default_log_path();
    let ring = LogRing::default();
    let log_file = open_log_file(&log_path);
    let file_missing = log_file.is_none();
    let file_layer = log_file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .boxed()
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(ring.layer())
        .try_init()
        .context("failed to install tracing subscriber")?;
    if file_missing {
        warn!(path = %log_path.display(), "log file unavailable; logging to the in-app view only");
    }
    Ok(Some(ring))
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    File::options().create(true).append(true).open(path).ok()
}

/// The backend plus the object ids the TUI can cycle through.
fn build_backend(fixture: Option<&Path>, settings: &Settings) -> Result<(Arc<dyn ObjectBackend>, Vec<String>)> {
    match fixture {
        Some(path) => {
            let fixture = Fixture::from_file(path).with_context(|| format!("failed to load fixture {}", path.display()))?;
            let backend = InMemoryBackend::with_fixture(fixture);
            let objects = backend.object_ids();
            info!(path = %path.display(), objects = ?objects, "serving fixture");
            Ok((Arc::new(backend), objects))
        }
        None => {
            let client = FormworkClient::new(&settings.api_base, settings.request_timeout)
                .with_context(|| format!("invalid API base URL {}", settings.api_base))?;
            Ok((Arc::new(client), Vec::new()))
        }
    }
}

/// Enter `object_id` and wait for it to load.
async fn load(backend: Arc<dyn ObjectBackend>, stage: LayoutStage, object_id: &str) -> Result<Controller> {
    let mut controller = Controller::new(backend, stage);
    let task = controller.enter(object_id);
    controller.drive(task).await;
    for notification in controller.drain_notifications() {
        match notification.severity {
            Severity::Warning | Severity::Error => warn!("{}", notification.message),
            Severity::Info | Severity::Success => info!("{}", notification.message),
        }
    }
    match controller.status() {
        ViewStatus::Ready => Ok(controller),
        ViewStatus::Missing => bail!("object '{object_id}' not found"),
        ViewStatus::Failed(message) => bail!("failed to load '{object_id}': {message}"),
        ViewStatus::Idle | ViewStatus::Loading => bail!("'{object_id}' did not finish loading"),
    }
}

fn render_html(mut controller: Controller, args: &RenderArgs) -> Result<String> {
    if let Some(search) = &args.search {
        controller.set_search_text(search.as_str());
    }
    if let Some(sort) = &args.sort {
        controller.set_sort_field(Some(sort.clone()));
    }
    if let Some(record) = &args.record
        && !controller.select_record(&RecordId::new(record.as_str()))
    {
        bail!("record '{record}' not found in '{}'", args.object);
    }
    if let Some(tab) = &args.tab
        && !controller.activate_section(tab)
    {
        warn!(%tab, "no such section; showing the first one");
    }

    let list = controller.list_view().context("object has no schema")?;
    let detail = controller.detail_view();
    let title = controller
        .schema()
        .map(|schema| schema.display_label().to_string())
        .unwrap_or_else(|| args.object.clone());
    Ok(render_page(&title, controller.stage(), &list, detail.as_ref()))
}

fn list_lines(view: &ListView, stage: LayoutStage) -> Vec<String> {
    match view {
        ListView::NoLayout => vec![no_layout_message(stage)],
        ListView::NoRecords { columns } => vec![
            columns.iter().map(|column| column.label.as_str()).collect::<Vec<_>>().join("\t"),
            NO_RECORDS_MESSAGE.to_string(),
        ],
        ListView::Rows { columns, rows } => {
            let mut lines = Vec::with_capacity(rows.len() + 1);
            lines.push(
                std::iter::once("id")
                    .chain(columns.iter().map(|column| column.label.as_str()))
                    .collect::<Vec<_>>()
                    .join("\t"),
            );
            for row in rows {
                lines.push(
                    std::iter::once(row.record_id.as_str())
                        .chain(row.cells.iter().map(|cell| cell.text.as_str()))
                        .collect::<Vec<_>>()
                        .join("\t"),
                );
            }
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
schema:
  name: invoice
  fields:
    - { name: title, type: text }
    - { name: amount, type: number }
    - { name: paid, type: boolean }
layouts:
  published:
    layoutMode: tabs
    sections:
      - { id: main, title: Main, columns: [ { blocks: [ { type: field, fieldName: title } ] } ] }
      - { id: money, title: Money, columns: [ { blocks: [ { type: field, fieldName: amount } ] } ] }
    listConfig: { columns: [title, amount, paid] }
records:
  - { id: a, title: Rent, amount: 1200.5, paid: true }
  - { id: b, title: Coffee, amount: 4 }
"#;

    fn fixture_backend(dir: &tempfile::TempDir) -> Arc<dyn ObjectBackend> {
        let path = dir.path().join("invoice.yaml");
        fs::write(&path, FIXTURE).expect("write fixture");
        let (backend, objects) = build_backend(Some(&path), &Settings::default()).expect("backend");
        assert_eq!(objects, vec!["invoice".to_string()]);
        backend
    }

    fn render_args(record: Option<&str>, tab: Option<&str>) -> RenderArgs {
        RenderArgs {
            object: "invoice".into(),
            record: record.map(str::to_string),
            tab: tab.map(str::to_string),
            search: None,
            sort: None,
            output: None,
        }
    }

    #[test]
    fn cli_parses_global_flags_after_the_subcommand() {
        let cli = Cli::try_parse_from(["formwork", "render", "invoice", "--record", "a", "--mode", "draft"]).expect("parse");
        assert_eq!(cli.mode, Some(LayoutStage::Draft));
        match cli.command {
            Command::Render(args) => assert_eq!(args.record.as_deref(), Some("a")),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["formwork", "list", "invoice", "--mode", "final"]).is_err());
    }

    #[tokio::test]
    async fn list_prints_formatted_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let controller = load(fixture_backend(&dir), LayoutStage::Published, "invoice").await.expect("load");
        let view = controller.list_view().expect("view");
        let lines = list_lines(&view, controller.stage());
        assert_eq!(lines[0], "id\ttitle\tamount\tpaid");
        assert_eq!(lines[1], "a\tRent\t1,200.5\tYes");
        assert_eq!(lines.len(), 3);
    }

    #[tokio::test]
    async fn draft_without_layout_prints_the_no_layout_message() {
        let dir = tempfile::tempdir().expect("tempdir");
        let controller = load(fixture_backend(&dir), LayoutStage::Draft, "invoice").await.expect("load");
        let view = controller.list_view().expect("view");
        assert_eq!(list_lines(&view, LayoutStage::Draft), vec![no_layout_message(LayoutStage::Draft)]);
    }

    #[tokio::test]
    async fn render_includes_the_selected_record_and_tab() {
        let dir = tempfile::tempdir().expect("tempdir");
        let controller = load(fixture_backend(&dir), LayoutStage::Published, "invoice").await.expect("load");
        let page = render_html(controller, &render_args(Some("a"), Some("money"))).expect("render");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(r#"data-record-id="a""#));
        assert!(page.contains("1,200.5"));
    }

    #[tokio::test]
    async fn unknown_record_or_object_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = fixture_backend(&dir);
        let controller = load(Arc::clone(&backend), LayoutStage::Published, "invoice").await.expect("load");
        assert!(render_html(controller, &render_args(Some("zzz"), None)).is_err());
        let missing = load(backend, LayoutStage::Published, "payment").await;
        assert!(missing.is_err());
    }
}
