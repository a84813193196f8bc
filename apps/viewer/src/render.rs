//! Plain-text rendering of controller snapshots.

use std::fmt::Write as _;

use client_core::{EntityDetail, TablePage, TableQuery, ViewSnapshot, ViewState};

const COLUMNS: [&str; 3] = ["Name", "Owner", "Tags"];

pub fn render_snapshot(snapshot: &ViewSnapshot, query: &TableQuery) -> String {
    match &snapshot.view_state {
        ViewState::Loading => "Loading workflows...\n".to_string(),
        ViewState::Failed(err) => format!("Error loading workflows: {}\n", err.message()),
        ViewState::Empty => "No workflows found\n".to_string(),
        ViewState::Loaded(entities) => {
            let mut out = String::new();
            let _ = writeln!(out, "Workflows");
            let _ = writeln!(out);
            let _ = writeln!(out, "workflows found: {}", entities.len());
            out.push_str(&render_table(&TablePage::build(entities, query)));
            if let Some(entity) = snapshot.selected_entity() {
                out.push('\n');
                out.push_str(&render_detail(&EntityDetail::from_entity(entity)));
            }
            out
        }
    }
}

pub fn render_table(page: &TablePage) -> String {
    let mut widths = COLUMNS.map(|column| column.chars().count());
    for row in &page.rows {
        widths[0] = widths[0].max(row.name.chars().count());
        widths[1] = widths[1].max(row.owner.chars().count());
        widths[2] = widths[2].max(row.tags.chars().count());
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<w0$}  {:<w1$}  {}",
        COLUMNS[0],
        COLUMNS[1],
        COLUMNS[2],
        w0 = widths[0],
        w1 = widths[1]
    );
    let _ = writeln!(
        out,
        "{}  {}  {}",
        "-".repeat(widths[0]),
        "-".repeat(widths[1]),
        "-".repeat(widths[2])
    );
    if page.rows.is_empty() {
        let _ = writeln!(out, "(no matching workflows)");
    }
    for row in &page.rows {
        let line = format!(
            "{:<w0$}  {:<w1$}  {}",
            row.name,
            row.owner,
            row.tags,
            w0 = widths[0],
            w1 = widths[1]
        );
        let _ = writeln!(out, "{}", line.trim_end());
    }
    let _ = writeln!(
        out,
        "page {}/{} ({} matching)",
        page.page + 1,
        page.page_count,
        page.total_matches
    );
    out
}

pub fn render_detail(detail: &EntityDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", detail.name);
    if !detail.description.is_empty() {
        let _ = writeln!(out, "{}", detail.description);
    }
    let _ = writeln!(out, "Owner: {}", detail.owner);
    if !detail.lifecycle.is_empty() {
        let _ = writeln!(out, "Lifecycle: {}", detail.lifecycle);
    }
    if !detail.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", detail.tags.join(", "));
    }
    if !detail.links.is_empty() {
        let _ = writeln!(out, "Links:");
        for link in &detail.links {
            if link.label() == link.url {
                let _ = writeln!(out, "  - {}", link.url);
            } else {
                let _ = writeln!(out, "  - {}: {}", link.label(), link.url);
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
