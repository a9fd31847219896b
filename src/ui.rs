use crate::commands::Command;
use crate::deletion::ResourceKind;
use crate::toggle::{
    ContentPanel, ContentToggle, GROUP_CLASS, PanelElement, TypeSelector, database_selector,
    storage_selector,
};
use crate::view::{TableBody, escape};
use std::fmt::Write;

pub const DEFAULT_TAB: &str = "#states";

const TABS: [(&str, &str); 4] = [
    ("#states", "Backup states"),
    ("#tasks", "Tasks"),
    ("#databases", "Databases"),
    ("#storages", "Storages"),
];

struct Field {
    name: &'static str,
    label: &'static str,
    input: &'static str,
}

const fn field(name: &'static str, label: &'static str, input: &'static str) -> Field {
    Field { name, label, input }
}

struct FieldGroup {
    class: &'static str,
    fields: &'static [Field],
}

const COMMON_FIELDS: &[Field] = &[field("settingsName", "Settings name", "text")];

const DATABASE_GROUPS: &[FieldGroup] = &[FieldGroup {
    class: "postgres",
    fields: &[
        field("host", "Host", "text"),
        field("port", "Port", "number"),
        field("name", "Database name", "text"),
        field("login", "Login", "text"),
        field("password", "Password", "password"),
    ],
}];

const STORAGE_GROUPS: &[FieldGroup] = &[
    FieldGroup {
        class: "dropbox",
        fields: &[field("dropboxSettings.accessToken", "Access token", "text")],
    },
    FieldGroup {
        class: "localFileSystem",
        fields: &[field("localFileSystemSettings.backupPath", "Backup path", "text")],
    },
];

struct CommandForm {
    command: Command,
    id: &'static str,
    title: &'static str,
    fields: &'static [Field],
}

const BACKUP_FORMS: &[CommandForm] = &[
    CommandForm {
        command: Command::CreateBackup,
        id: "createBackupForm",
        title: "Create backup",
        fields: &[
            field("databaseSettingsName", "Database settings name", "text"),
            field("storageSettingsName", "Storage settings name", "text"),
            field("processors", "Processor", "text"),
        ],
    },
    CommandForm {
        command: Command::RestoreBackup,
        id: "restoreBackupForm",
        title: "Restore backup",
        fields: &[
            field("backupId", "Backup id", "number"),
            field("databaseSettingsName", "Database settings name", "text"),
            field("storageSettingsName", "Storage settings name", "text"),
        ],
    },
    CommandForm {
        command: Command::DeleteBackup,
        id: "deleteBackupForm",
        title: "Delete backup",
        fields: &[field("backupId", "Backup id", "number")],
    },
    CommandForm {
        command: Command::AddPlannedTask,
        id: "addPlannedTaskForm",
        title: "Add planned task",
        fields: &[
            field("taskType", "Task type", "text"),
            field("databaseSettingsName", "Database settings name", "text"),
            field("storageSettingsNameList", "Storage settings name", "text"),
            field("processors", "Processor", "text"),
            field("interval", "Interval", "text"),
        ],
    },
];

/// Maps a requested tab onto a known one; stale identifiers fall back to the default.
pub fn resolve_tab(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|href| TABS.iter().find(|(tab, _)| *tab == href))
        .map(|(tab, _)| *tab)
        .unwrap_or(DEFAULT_TAB)
}

pub struct DashboardView<'a> {
    pub login: Option<&'a str>,
    pub active_tab: Option<&'a str>,
    pub notice: Option<&'a str>,
    pub states: &'a TableBody,
    pub tasks: &'a TableBody,
    pub database_type: Option<&'a str>,
    pub storage_type: Option<&'a str>,
}

pub fn render_login(alert: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(message) = alert {
        let _ = write!(body, r#"<div class="alert" role="alert">{}</div>"#, escape(message));
    }
    body.push_str(
        r#"<form id="signInForm" method="post" action="/login">
      <label for="inputLogin">Login</label>
      <input id="inputLogin" name="login" type="text" />
      <label for="inputPassword">Password</label>
      <input id="inputPassword" name="password" type="password" />
      <button id="signInButton" class="btn" type="submit">Sign in</button>
    </form>"#,
    );
    page("Sign in", &body)
}

pub fn render_dashboard(view: &DashboardView<'_>) -> String {
    let active = resolve_tab(view.active_tab);
    let mut body = String::new();

    let greeting = view.login.map(escape).unwrap_or_else(|| "guest".to_string());
    let _ = write!(body, r#"<p class="subtitle">Signed in as {greeting}</p>"#);
    if let Some(message) = view.notice {
        let _ = write!(body, r#"<div class="alert" role="alert">{}</div>"#, escape(message));
    }

    body.push_str(r#"<nav id="barTabs" class="tabs">"#);
    for (href, label) in TABS {
        let class = if href == active { "tab active" } else { "tab" };
        let _ = write!(
            body,
            r#"<a class="{class}" href="/dashboard?tab=%23{}">{label}</a>"#,
            &href[1..]
        );
    }
    body.push_str("</nav>");

    let states = table(
        "backupStatesTableBody",
        &["Type", "State", "Time"],
        view.states,
        "/fragments/states",
    );
    section(&mut body, "#states", active, &states);

    let mut tasks = table(
        "backupTasksTableBody",
        &["Id", "Type", "State", "Time", "Error", "Interrupted", ""],
        view.tasks,
        "/fragments/tasks",
    );
    for form in BACKUP_FORMS {
        command_form(&mut tasks, form);
    }
    section(&mut body, "#tasks", active, &tasks);

    let mut databases = database_selector();
    databases.select(view.database_type);
    let databases = settings_panel(
        ResourceKind::Database,
        "#databases",
        &databases,
        DATABASE_GROUPS,
    );
    section(&mut body, "#databases", active, &databases);

    let mut storages = storage_selector();
    storages.select(view.storage_type);
    let storages = settings_panel(
        ResourceKind::Storage,
        "#storages",
        &storages,
        STORAGE_GROUPS,
    );
    section(&mut body, "#storages", active, &storages);

    page("Backup dashboard", &body)
}

fn section(body: &mut String, href: &str, active: &str, content: &str) {
    let hidden = if href == active { "" } else { " hidden" };
    let _ = write!(
        body,
        r#"<section id="{}" class="tab-pane"{hidden}>{content}</section>"#,
        &href[1..]
    );
}

fn table(body_id: &str, headers: &[&str], rows: &TableBody, fragment: &str) -> String {
    let mut out = String::from("<table><thead><tr>");
    for header in headers {
        let _ = write!(out, "<th>{header}</th>");
    }
    let _ = write!(
        out,
        r#"</tr></thead><tbody id="{body_id}" data-source="{fragment}">{}</tbody></table>"#,
        rows.markup()
    );
    match rows.refreshed_at() {
        Some(at) => {
            let _ = write!(out, r#"<p class="hint">Refreshed at {}</p>"#, at.format("%H:%M:%S"));
        }
        None => out.push_str(r#"<p class="hint">Waiting for the first refresh.</p>"#),
    }
    out
}

fn inputs(out: &mut String, fields: &[Field]) {
    for field in fields {
        let _ = write!(
            out,
            r#"<label>{}<input name="{}" type="{}" /></label>"#,
            field.label, field.name, field.input
        );
    }
}

fn command_form(out: &mut String, form: &CommandForm) {
    let _ = write!(
        out,
        r#"<form id="{}" method="post" action="{}"><h2>{}</h2>"#,
        form.id,
        form.command.route(),
        form.title
    );
    inputs(out, form.fields);
    let _ = write!(
        out,
        r#"<button class="btn" type="submit">{}</button></form>"#,
        form.title
    );
}

fn add_command(kind: ResourceKind) -> Command {
    match kind {
        ResourceKind::Database => Command::AddDatabase,
        ResourceKind::Storage => Command::AddStorage,
    }
}

fn capitalized(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Database => "Database",
        ResourceKind::Storage => "Storage",
    }
}

fn settings_panel(
    kind: ResourceKind,
    tab: &str,
    selector: &TypeSelector,
    groups: &[FieldGroup],
) -> String {
    let noun = capitalized(kind);
    let mut panel = ContentPanel {
        elements: groups
            .iter()
            .map(|group| PanelElement::new(&[GROUP_CLASS, group.class]))
            .collect(),
        common_fields_visible: true,
    };
    ContentToggle::new(true).on_change(selector, &mut panel);

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<form id="configure{noun}Form" method="get" action="/dashboard"><input type="hidden" name="tab" value="{tab}" /><select name="{}">"#,
        selector.name
    );
    for (index, option) in selector.options.iter().enumerate() {
        let selected = if selector.selected == Some(index) { " selected" } else { "" };
        match &option.id {
            Some(id) => {
                let _ = write!(
                    out,
                    r#"<option id="{id}" value="{id}"{selected}>{}</option>"#,
                    option.label
                );
            }
            None => {
                let _ = write!(out, r#"<option value=""{selected}>{}</option>"#, option.label);
            }
        }
    }
    out.push_str(r#"</select><button class="btn" type="submit">Show fields</button></form>"#);

    let _ = write!(
        out,
        r#"<form method="post" action="{}"><input type="hidden" name="{}" value="{}" />"#,
        add_command(kind).route(),
        selector.name,
        selector.selected_id().unwrap_or_default()
    );
    let common_hidden = if panel.common_fields_visible { "" } else { " hidden" };
    let _ = write!(out, r#"<div id="common{noun}InputFields"{common_hidden}>"#);
    inputs(&mut out, COMMON_FIELDS);
    let _ = write!(out, r#"</div><div id="select{noun}Content">"#);
    for (group, element) in groups.iter().zip(&panel.elements) {
        let hidden = if element.visible { "" } else { " hidden" };
        let _ = write!(out, r#"<div class="{GROUP_CLASS} {}"{hidden}>"#, group.class);
        inputs(&mut out, group.fields);
        out.push_str("</div>");
    }
    let _ = write!(
        out,
        r#"</div><button class="btn" type="submit">Add {}</button></form>"#,
        noun.to_lowercase()
    );

    let _ = write!(
        out,
        r#"<form class="{}" method="post" action="{}/delete"><label>Id<input name="id" type="text" /></label><select name="{}">"#,
        kind.row_class(),
        kind.endpoint(),
        kind.type_param()
    );
    for option in &selector.options {
        if let Some(id) = &option.id {
            let _ = write!(out, r#"<option value="{id}">{}</option>"#, option.label);
        }
    }
    let _ = write!(
        out,
        r#"</select><button class="btn btn-danger" type="submit">Remove {}</button></form>"#,
        noun.to_lowercase()
    );
    out
}

fn page(title: &str, body: &str) -> String {
    PAGE_HTML.replace("{{TITLE}}", title).replace("{{BODY}}", body)
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --ink: #2b2a28;
      --accent: #2f4858;
      --danger: #c63b2b;
      --card: #ffffff;
    }

    body {
      margin: 0;
      padding: 32px 18px;
      background: #f4f1ea;
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
    }

    main {
      width: min(960px, 100%);
      margin: 0 auto;
      background: var(--card);
      border-radius: 18px;
      padding: 28px;
      display: grid;
      gap: 18px;
    }

    .tabs {
      display: flex;
      gap: 6px;
    }

    .tab {
      padding: 8px 14px;
      border-radius: 999px;
      color: var(--accent);
      text-decoration: none;
    }

    .tab.active {
      background: var(--accent);
      color: white;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: left;
      padding: 6px 8px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.12);
    }

    form {
      display: grid;
      gap: 8px;
      margin: 12px 0;
    }

    .btn {
      border: none;
      border-radius: 999px;
      padding: 8px 16px;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    .btn-danger {
      background: var(--danger);
    }

    .alert {
      padding: 12px;
      border-radius: 12px;
      background: rgba(198, 59, 43, 0.1);
      color: var(--danger);
    }

    .hint, .subtitle {
      color: #6f6a65;
      font-size: 0.9rem;
    }
  </style>
</head>
<body>
  <main>
    <h1>{{TITLE}}</h1>
    {{BODY}}
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn view<'a>(states: &'a TableBody, tasks: &'a TableBody) -> DashboardView<'a> {
        DashboardView {
            login: Some("admin"),
            active_tab: None,
            notice: None,
            states,
            tasks,
            database_type: None,
            storage_type: None,
        }
    }

    #[test]
    fn stale_tab_falls_back_to_default() {
        assert_eq!(resolve_tab(Some("#tasks")), "#tasks");
        assert_eq!(resolve_tab(Some("#gone")), DEFAULT_TAB);
        assert_eq!(resolve_tab(None), DEFAULT_TAB);
    }

    #[test]
    fn only_the_active_tab_is_visible() {
        let (states, tasks) = (TableBody::default(), TableBody::default());
        let mut view = view(&states, &tasks);
        view.active_tab = Some("#tasks");
        let html = render_dashboard(&view);
        assert!(html.contains(r#"<section id="tasks" class="tab-pane">"#));
        assert!(html.contains(r#"<section id="states" class="tab-pane" hidden>"#));
        assert!(html.contains(r#"<a class="tab active" href="/dashboard?tab=%23tasks">"#));
    }

    #[test]
    fn storage_type_selects_its_field_group() {
        let (states, tasks) = (TableBody::default(), TableBody::default());
        let mut view = view(&states, &tasks);
        view.storage_type = Some("dropbox");
        let html = render_dashboard(&view);
        assert!(html.contains(r#"<div class="box dropbox">"#));
        assert!(html.contains(r#"<div class="box localFileSystem" hidden>"#));
        assert!(html.contains(r#"<div id="commonStorageInputFields">"#));
        assert!(html.contains(r#"<div id="commonDatabaseInputFields" hidden>"#));
        assert!(html.contains(r#"<option id="dropbox" value="dropbox" selected>"#));
    }

    #[test]
    fn notice_and_login_are_escaped() {
        let (states, tasks) = (TableBody::default(), TableBody::default());
        let mut view = view(&states, &tasks);
        view.notice = Some("Storage deletion error");
        view.login = Some("<admin>");
        let html = render_dashboard(&view);
        assert!(html.contains(r#"<div class="alert" role="alert">Storage deletion error</div>"#));
        assert!(html.contains("Signed in as &lt;admin&gt;"));
    }

    #[test]
    fn login_page_shows_alert() {
        let html = render_login(Some("bad credentials"));
        assert!(html.contains(">bad credentials</div>"));
        assert!(html.contains(r#"action="/login""#));
    }

    #[test]
    fn add_forms_post_backend_field_names_through_the_dashboard() {
        let (states, tasks) = (TableBody::default(), TableBody::default());
        let html = render_dashboard(&view(&states, &tasks));
        assert!(html.contains(r#"<form method="post" action="/storage/add">"#));
        assert!(html.contains(r#"<form method="post" action="/database/add">"#));
        assert!(html.contains(r#"name="dropboxSettings.accessToken""#));
        assert!(html.contains(r#"name="localFileSystemSettings.backupPath""#));
        assert!(html.contains(r#"<input name="name" type="text" />"#));
        assert!(!html.contains("databaseName"));
        assert!(html.contains(r#"<label>Id<input name="id" type="text" /></label>"#));
    }

    #[test]
    fn backup_commands_have_forms_on_the_tasks_tab() {
        let (states, tasks) = (TableBody::default(), TableBody::default());
        let html = render_dashboard(&view(&states, &tasks));
        for action in ["/create-backup", "/restore-backup", "/delete-backup", "/planned-task"] {
            assert!(html.contains(&format!(r#"method="post" action="{action}""#)), "{action}");
        }
    }
}
