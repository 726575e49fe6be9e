//! HTML markup for list and detail views.
//!
//! Every piece of record data and authored text is escaped before it reaches
//! the output. The markup is structural only; styling is left to whoever
//! embeds it.

use std::borrow::Cow;
use std::fmt::Write;

use formwork_types::LayoutStage;

use crate::detail::{BlockView, DetailBody, DetailView, SectionView};
use crate::format::Tone;
use crate::list::{ListCell, ListView, NO_RECORDS_MESSAGE, no_layout_message};
use crate::menu::RowAction;

/// Escape text for use in element content and double-quoted attributes.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut escaped = String::with_capacity(input.len() + 16);
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            ch => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Markup for the list area.
pub fn render_list_html(view: &ListView, stage: LayoutStage) -> String {
    let mut out = String::new();
    match view {
        ListView::NoLayout => {
            let _ = write!(
                out,
                r#"<div class="list-empty no-layout">{}</div>"#,
                escape_html(&no_layout_message(stage))
            );
        }
        ListView::NoRecords { columns } => {
            out.push_str(r#"<table class="record-list">"#);
            write_header(&mut out, columns.iter().map(|column| column.label.as_str()));
            let _ = write!(
                out,
                r#"<tbody><tr class="empty"><td colspan="{}">{}</td></tr></tbody></table>"#,
                columns.len() + 1,
                escape_html(NO_RECORDS_MESSAGE)
            );
        }
        ListView::Rows { columns, rows } => {
            out.push_str(r#"<table class="record-list">"#);
            write_header(&mut out, columns.iter().map(|column| column.label.as_str()));
            out.push_str("<tbody>");
            for row in rows {
                let id = escape_html(row.record_id.as_str());
                let _ = write!(
                    out,
                    r#"<tr data-record-id="{id}"{}>"#,
                    if row.selected { r#" class="selected""# } else { "" }
                );
                for cell in &row.cells {
                    write_cell(&mut out, cell);
                }
                let _ = write!(
                    out,
                    r#"<td class="row-actions"><button type="button" class="menu-trigger" aria-haspopup="menu" aria-expanded="{}" data-record-id="{id}">⋯</button>"#,
                    row.menu_open
                );
                let _ = write!(
                    out,
                    r#"<div class="row-menu" role="menu" data-record-id="{id}"{}>"#,
                    if row.menu_open { "" } else { " hidden" }
                );
                for action in RowAction::ALL {
                    let _ = write!(
                        out,
                        r#"<button type="button" role="menuitem" data-action="{}"{}>{}</button>"#,
                        action.key(),
                        if action.is_destructive() { r#" class="destructive""# } else { "" },
                        escape_html(action.label())
                    );
                }
                out.push_str("</div></td></tr>");
            }
            out.push_str("</tbody></table>");
        }
    }
    out
}

fn write_header<'a>(out: &mut String, labels: impl Iterator<Item = &'a str>) {
    out.push_str("<thead><tr>");
    for label in labels {
        let _ = write!(out, "<th>{}</th>", escape_html(label));
    }
    out.push_str(r#"<th class="row-actions"></th></tr></thead>"#);
}

fn write_cell(out: &mut String, cell: &ListCell) {
    match (cell.tone, cell.tone.glyph()) {
        (_, Some(glyph)) => {
            let class = if cell.tone == Tone::Affirmative { "yes" } else { "no" };
            let _ = write!(
                out,
                r#"<td class="boolean {class}"><span class="glyph" aria-hidden="true">{glyph}</span> {}</td>"#,
                escape_html(&cell.text)
            );
        }
        (Tone::Placeholder, None) => {
            let _ = write!(out, r#"<td class="placeholder">{}</td>"#, escape_html(&cell.text));
        }
        _ => {
            let _ = write!(out, "<td>{}</td>", escape_html(&cell.text));
        }
    }
}

/// Markup for the detail panel.
pub fn render_detail_html(view: &DetailView) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<article class="record-detail" data-record-id="{}"><h2 class="detail-title">{}</h2>"#,
        escape_html(view.record_id.as_str()),
        escape_html(&view.title)
    );
    match &view.body {
        DetailBody::Stacked(sections) => {
            for section in sections {
                write_section(&mut out, section);
            }
        }
        DetailBody::Tabbed { tabs, active } => {
            out.push_str(r#"<nav class="tabs" role="tablist">"#);
            for tab in tabs {
                let _ = write!(
                    out,
                    r#"<button type="button" role="tab" data-section-id="{}" aria-selected="{}">{}</button>"#,
                    escape_html(&tab.section_id),
                    tab.active,
                    escape_html(&tab.title)
                );
            }
            out.push_str("</nav>");
            write_section(&mut out, active);
        }
    }
    out.push_str("</article>");
    out
}

fn write_section(out: &mut String, section: &SectionView) {
    let _ = write!(
        out,
        r#"<section class="layout-section" data-section-id="{}"><h3>{}</h3><div class="section-grid" style="grid-template-columns: repeat({}, minmax(0, 1fr))">"#,
        escape_html(&section.id),
        escape_html(&section.title),
        section.columns.len().max(1)
    );
    for column in &section.columns {
        out.push_str(r#"<div class="section-column">"#);
        for block in &column.blocks {
            write_block(out, block);
        }
        out.push_str("</div>");
    }
    out.push_str("</div></section>");
}

fn write_block(out: &mut String, block: &BlockView) {
    match block {
        BlockView::Field {
            name,
            label,
            value,
            tone,
        } => {
            let _ = write!(
                out,
                r#"<div class="field-block" data-field="{}"><span class="field-label">{}</span><span class="field-value{}">{}</span></div>"#,
                escape_html(name),
                escape_html(label),
                if *tone == Tone::Placeholder { " placeholder" } else { "" },
                escape_html(value)
            );
        }
        BlockView::Header { label } => {
            let _ = write!(out, r#"<h4 class="block-header">{}</h4>"#, escape_html(label));
        }
        BlockView::Divider => out.push_str(r#"<hr class="block-divider">"#),
        BlockView::Button { label } => {
            let _ = write!(out, r#"<button type="button" class="block-button">{}</button>"#, escape_html(label));
        }
        BlockView::Placeholder(kind) => {
            let _ = write!(
                out,
                r#"<div class="block-placeholder">{} (not yet implemented)</div>"#,
                escape_html(kind.label())
            );
        }
    }
}

/// A standalone HTML document holding the list and, when present, the
/// detail panel.
pub fn render_page(title: &str, stage: LayoutStage, list: &ListView, detail: Option<&DetailView>) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title></head><body data-layout-stage=\"{}\"><main class=\"record-view\">",
        escape_html(title),
        stage
    );
    let _ = write!(out, r#"<div class="list-pane">{}</div>"#, render_list_html(list, stage));
    if let Some(detail) = detail {
        let _ = write!(out, r#"<aside class="detail-pane">{}</aside>"#, render_detail_html(detail));
    }
    out.push_str("</main></body></html>\n");
    out
}
