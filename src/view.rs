use crate::api::{CANCEL_TASK_ENDPOINT, CANCEL_TASK_FIELD};
use crate::models::{BackupStateRecord, BackupTaskRecord};
use chrono::{DateTime, Local};
use std::fmt::Write;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRow {
    pub cells: [String; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelAction {
    pub action: &'static str,
    pub field: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: String,
    pub cells: [String; 3],
    pub error: bool,
    pub interrupted: bool,
    pub cancel: CancelAction,
}

pub fn state_rows(records: &[BackupStateRecord]) -> Vec<StateRow> {
    records
        .iter()
        .map(|record| StateRow {
            cells: [record.kind.clone(), record.state.clone(), record.time.clone()],
        })
        .collect()
}

pub fn task_rows(records: &[BackupTaskRecord]) -> Vec<TaskRow> {
    records
        .iter()
        .map(|record| TaskRow {
            id: record.id.clone(),
            cells: [record.kind.clone(), record.state.clone(), record.time.clone()],
            error: record.error,
            interrupted: record.interrupted,
            cancel: CancelAction {
                action: CANCEL_TASK_ENDPOINT,
                field: CANCEL_TASK_FIELD,
                value: record.id.clone(),
            },
        })
        .collect()
}

/// Markup shape for task rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskTemplate {
    /// Status cells followed by a cell holding the cancel form.
    #[default]
    CancelForm,
    /// Task metadata on the row's data attributes with the cancel form inline.
    InlineAttributes,
}

impl FromStr for TaskTemplate {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "cancel-form" => Ok(Self::CancelForm),
            "inline" => Ok(Self::InlineAttributes),
            other => Err(format!("unknown task template '{other}'")),
        }
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn push_cells(out: &mut String, cells: &[String]) {
    for cell in cells {
        let _ = write!(out, "<td>{}</td>", escape(cell));
    }
}

fn cancel_form(cancel: &CancelAction) -> String {
    format!(
        r#"<form method="post" action="{}"><input type="hidden" name="{}" value="{}"/><button type="submit" class="btn btn-danger btn-sm">Cancel</button></form>"#,
        cancel.action,
        cancel.field,
        escape(&cancel.value)
    )
}

pub fn render_state_rows(rows: &[StateRow]) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str("<tr>");
        push_cells(&mut out, &row.cells);
        out.push_str("</tr>");
    }
    out
}

pub fn render_task_rows(rows: &[TaskRow], template: TaskTemplate) -> String {
    let mut out = String::new();
    for row in rows {
        match template {
            TaskTemplate::CancelForm => {
                out.push_str("<tr>");
                let _ = write!(out, "<td>{}</td>", escape(&row.id));
                push_cells(&mut out, &row.cells);
                let _ = write!(
                    out,
                    "<td>{}</td><td>{}</td><td>{}</td>",
                    row.error,
                    row.interrupted,
                    cancel_form(&row.cancel)
                );
                out.push_str("</tr>");
            }
            TaskTemplate::InlineAttributes => {
                let _ = write!(
                    out,
                    r#"<tr data-task-id="{}" data-error="{}" data-interrupted="{}">"#,
                    escape(&row.id),
                    row.error,
                    row.interrupted
                );
                push_cells(&mut out, &row.cells);
                let _ = write!(out, "<td>{}</td></tr>", cancel_form(&row.cancel));
            }
        }
    }
    out
}

/// A table body that is only ever replaced wholesale, and never by empty markup.
#[derive(Debug, Clone, Default)]
pub struct TableBody {
    markup: String,
    refreshed_at: Option<DateTime<Local>>,
}

impl TableBody {
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.refreshed_at
    }

    /// Returns whether the contents changed hands.
    pub fn replace(&mut self, markup: String) -> bool {
        if markup.is_empty() {
            return false;
        }
        self.markup = markup;
        self.refreshed_at = Some(Local::now());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(kind: &str, state: &str, time: &str) -> BackupStateRecord {
        BackupStateRecord {
            kind: kind.to_string(),
            state: state.to_string(),
            time: time.to_string(),
        }
    }

    fn task(id: &str) -> BackupTaskRecord {
        BackupTaskRecord {
            id: id.to_string(),
            kind: "CREATE BACKUP".to_string(),
            state: "UPLOADING".to_string(),
            error: false,
            interrupted: true,
            time: "t2".to_string(),
        }
    }

    #[test]
    fn single_state_renders_one_row_with_three_cells() {
        let rows = state_rows(&[state("FULL", "DONE", "t1")]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cells, ["FULL", "DONE", "t1"].map(String::from));

        let markup = render_state_rows(&rows);
        assert_eq!(markup, "<tr><td>FULL</td><td>DONE</td><td>t1</td></tr>");
    }

    #[test]
    fn rows_keep_server_order() {
        let rows = state_rows(&[state("B", "x", "1"), state("A", "y", "2")]);
        assert_eq!(rows[0].cells[0], "B");
        assert_eq!(rows[1].cells[0], "A");
    }

    #[test]
    fn cancel_form_carries_task_id() {
        let rows = task_rows(&[task("42")]);
        assert_eq!(rows[0].cancel.value, "42");

        for template in [TaskTemplate::CancelForm, TaskTemplate::InlineAttributes] {
            let markup = render_task_rows(&rows, template);
            assert!(markup.contains(r#"action="/cancel-task""#));
            assert!(markup.contains(r#"<input type="hidden" name="taskId" value="42"/>"#));
            assert_eq!(markup.matches("<tr").count(), 1);
        }
    }

    #[test]
    fn inline_template_puts_flags_on_row() {
        let markup = render_task_rows(&task_rows(&[task("7")]), TaskTemplate::InlineAttributes);
        assert!(markup.starts_with(
            r#"<tr data-task-id="7" data-error="false" data-interrupted="true">"#
        ));
    }

    #[test]
    fn cell_text_is_escaped_not_altered() {
        let markup = render_state_rows(&state_rows(&[state("<b>", "a&b", "t")]));
        assert!(markup.contains("<td>&lt;b&gt;</td>"));
        assert!(markup.contains("<td>a&amp;b</td>"));
    }

    #[test]
    fn empty_markup_leaves_table_unchanged() {
        let mut body = TableBody::default();
        assert!(body.replace("<tr><td>old</td></tr>".to_string()));
        let refreshed = body.refreshed_at();

        assert!(!body.replace(render_state_rows(&state_rows(&[]))));
        assert_eq!(body.markup(), "<tr><td>old</td></tr>");
        assert_eq!(body.refreshed_at(), refreshed);
    }

    #[test]
    fn template_names_parse() {
        assert_eq!("inline".parse::<TaskTemplate>(), Ok(TaskTemplate::InlineAttributes));
        assert_eq!("cancel-form".parse::<TaskTemplate>(), Ok(TaskTemplate::CancelForm));
        assert!("table".parse::<TaskTemplate>().is_err());
    }
}
