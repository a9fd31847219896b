use crate::api::BackupApi;
use crate::commands::{Command, CommandHandler, FormFields};
use crate::deletion::{DeletionHandler, ID_ATTRIBUTE, ResourceKind, RowContainer};
use crate::effects::Effects;
use crate::errors::AppError;
use crate::login::{DASHBOARD_ROUTE, LoginHandler};
use crate::models::{Credentials, SessionResponse};
use crate::session::CLIENT_COOKIE;
use crate::state::AppState;
use crate::ui::{DashboardView, render_dashboard, render_login};
use axum::{
    Form, Json,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub tab: Option<String>,
    #[serde(rename = "databaseType")]
    pub database_type: Option<String>,
    #[serde(rename = "storageType")]
    pub storage_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CancelTaskForm {
    #[serde(rename = "taskId", default)]
    pub task_id: String,
}

/// Identifies the browser by its client cookie, issuing a fresh one when it is
/// missing or not a UUID.
fn client(jar: CookieJar) -> (CookieJar, String) {
    if let Some(cookie) = jar.get(CLIENT_COOKIE) {
        if Uuid::parse_str(cookie.value()).is_ok() {
            let id = cookie.value().to_string();
            return (jar, id);
        }
    }
    let id = Uuid::new_v4().to_string();
    let cookie = Cookie::build((CLIENT_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), id)
}

pub async fn index() -> Redirect {
    Redirect::to(DASHBOARD_ROUTE)
}

pub async fn login_page() -> Html<String> {
    Html(render_login(None))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(credentials): Form<Credentials>,
) -> Result<Response, AppError> {
    let (jar, client) = client(jar);
    let handler = LoginHandler::new(Arc::clone(&state.api), state.session(&client));
    let effects = handler.submit(credentials).await?;
    if let Some(path) = effects.navigation() {
        return Ok((jar, Redirect::to(path)).into_response());
    }
    Ok((jar, Html(render_login(effects.alerts().next()))).into_response())
}

/// An explicit `tab` counts as the tab being shown; without one the remembered tab is
/// restored.
pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<DashboardQuery>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, client) = client(jar);
    let session = state.session(&client);
    let active_tab = match query.tab.filter(|tab| !tab.is_empty()) {
        Some(tab) => {
            session.tab_shown(&tab).await?;
            Some(tab)
        }
        None => session.restore_tab().await,
    };
    let login = session.login().await;
    let notice = state.take_notice(&client).await;
    let states = state.states.lock().await.clone();
    let tasks = state.tasks.lock().await.clone();

    let page = render_dashboard(&DashboardView {
        login: login.as_deref(),
        active_tab: active_tab.as_deref(),
        notice: notice.as_deref(),
        states: &states,
        tasks: &tasks,
        database_type: query.database_type.as_deref(),
        storage_type: query.storage_type.as_deref(),
    });
    Ok((jar, Html(page)))
}

pub async fn states_fragment(State(state): State<AppState>) -> Html<String> {
    Html(state.states.lock().await.markup().to_string())
}

pub async fn tasks_fragment(State(state): State<AppState>) -> Html<String> {
    Html(state.tasks.lock().await.markup().to_string())
}

pub async fn delete_database(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(fields): Form<HashMap<String, String>>,
) -> (CookieJar, Redirect) {
    remove(&state, jar, ResourceKind::Database, fields).await
}

pub async fn delete_storage(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(fields): Form<HashMap<String, String>>,
) -> (CookieJar, Redirect) {
    remove(&state, jar, ResourceKind::Storage, fields).await
}

/// The submitted form stands in for the row container: `id` becomes `data-id` and the
/// type parameter becomes the kind's type attribute.
async fn remove(
    state: &AppState,
    jar: CookieJar,
    kind: ResourceKind,
    fields: HashMap<String, String>,
) -> (CookieJar, Redirect) {
    let mut row = RowContainer::default().with("class", kind.row_class());
    if let Some(id) = fields.get("id") {
        row = row.with(ID_ATTRIBUTE, id.as_str());
    }
    if let Some(type_value) = fields.get(kind.type_param()) {
        row = row.with(kind.type_attribute(), type_value.as_str());
    }

    let effects = DeletionHandler::new(Arc::clone(&state.api), kind)
        .remove(&row)
        .await;
    settle(state, jar, &effects).await
}

pub async fn add_database(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(fields): Form<FormFields>,
) -> (CookieJar, Redirect) {
    forward(&state, jar, Command::AddDatabase, fields).await
}

pub async fn add_storage(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(fields): Form<FormFields>,
) -> (CookieJar, Redirect) {
    forward(&state, jar, Command::AddStorage, fields).await
}

pub async fn create_backup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(fields): Form<FormFields>,
) -> (CookieJar, Redirect) {
    forward(&state, jar, Command::CreateBackup, fields).await
}

pub async fn restore_backup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(fields): Form<FormFields>,
) -> (CookieJar, Redirect) {
    forward(&state, jar, Command::RestoreBackup, fields).await
}

pub async fn delete_backup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(fields): Form<FormFields>,
) -> (CookieJar, Redirect) {
    forward(&state, jar, Command::DeleteBackup, fields).await
}

pub async fn add_planned_task(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(fields): Form<FormFields>,
) -> (CookieJar, Redirect) {
    forward(&state, jar, Command::AddPlannedTask, fields).await
}

async fn forward(
    state: &AppState,
    jar: CookieJar,
    command: Command,
    fields: FormFields,
) -> (CookieJar, Redirect) {
    let effects = CommandHandler::new(Arc::clone(&state.api), command)
        .submit(fields)
        .await;
    settle(state, jar, &effects).await
}

/// Surfaces the alert on the browser's next render and reloads the dashboard.
async fn settle(state: &AppState, jar: CookieJar, effects: &Effects) -> (CookieJar, Redirect) {
    let (jar, client) = client(jar);
    if let Some(message) = effects.alerts().last() {
        state.post_notice(&client, message).await;
    }
    (jar, Redirect::to(DASHBOARD_ROUTE))
}

pub async fn cancel_task(
    State(state): State<AppState>,
    Form(form): Form<CancelTaskForm>,
) -> Result<Redirect, AppError> {
    state.api.cancel_task(&form.task_id).await?;
    Ok(Redirect::to(DASHBOARD_ROUTE))
}

pub async fn session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionResponse>) {
    let (jar, client) = client(jar);
    let snapshot = state.session(&client).snapshot().await;
    (jar, Json(snapshot))
}
