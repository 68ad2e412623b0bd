//! Documentation site and prototype API.
//!
//! Serves the companion's documentation pages (markdown rendered behind
//! fixed per-section allow-lists, 404 for anything else), the decorative
//! memory visualization, documentation search, the settings-derived theme
//! stylesheet, and the JSON surface that drives the prototype engines.

pub mod markdown;
pub mod search;

use anyhow::Result;
use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use crate::bus::AppEvent;
use crate::config::KindredConfig;
use crate::memory::layout::Viewport;
use crate::rituals::catalog;
use crate::shell::Shell;

/// The documented sections and their page allow-lists.
pub const SECTIONS: &[(&str, &[&str])] = &[
    (
        "architecture",
        &["overview", "duality-model", "supporting-systems", "data-architecture"],
    ),
    (
        "user-interaction",
        &["overview", "interfaces", "haptic-feedback", "voice-communication", "user-flows"],
    ),
    ("ethics", &["overview", "principles", "implementation", "guardrails"]),
    ("analysis", &["comprehensive", "improvements", "validation"]),
];

#[derive(Clone)]
pub struct AppState {
    pub shell: Arc<Shell>,
    pub docs_dir: PathBuf,
}

/// Build the full site router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/visualizations", get(visualizations))
        .route("/search", get(search_page))
        .route("/theme.css", get(theme_css))
        .route("/api/conversation", get(api_history).post(api_submit))
        .route("/api/conversation/reset", post(api_conversation_reset))
        .route("/api/rituals", get(api_rituals))
        .route("/api/rituals/session", get(api_ritual_session))
        .route("/api/rituals/navigate", post(api_ritual_navigate))
        .route("/api/rituals/complete", post(api_ritual_complete))
        .route("/api/rituals/close", post(api_ritual_close))
        .route("/api/rituals/{id}/start", post(api_ritual_start))
        .route("/api/memory", get(api_memory))
        .route("/api/memory.svg", get(api_memory_svg))
        .route("/api/settings", get(api_settings_get).put(api_settings_put))
        .route("/api/settings/reset", post(api_settings_reset))
        .route("/api/pixel", get(api_pixel))
        .route("/api/pixel/activate", post(api_pixel_activate))
        .route("/api/section/{fragment}", post(api_section))
        .route("/{section}/{page}", get(doc_page))
        .fallback(not_found)
        .with_state(state)
}

/// Start the documentation server with graceful shutdown.
pub async fn serve(config: &KindredConfig, shell: Arc<Shell>) -> Result<()> {
    let state = AppState {
        shell,
        docs_dir: config.resolved_docs_dir(),
    };
    let app = router(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "documentation site listening at http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to listen for ctrl-c");
            tracing::info!("shutting down documentation site");
        })
        .await?;

    Ok(())
}

// ---- documentation pages ----

async fn index(State(state): State<AppState>) -> Html<String> {
    let body = match tokio::fs::read_to_string(state.docs_dir.join("index.md")).await {
        Ok(source) => markdown::render(&source).html,
        Err(_) => {
            "<h1>Kindred</h1><p>Documentation for the Kindred AI companion. \
             Choose a section above to start reading.</p>"
                .to_string()
        }
    };
    Html(layout("Kindred Documentation", "home", &body))
}

async fn doc_page(
    State(state): State<AppState>,
    UrlPath((section, page)): UrlPath<(String, String)>,
) -> Response {
    let allowed = SECTIONS
        .iter()
        .find(|(s, _)| *s == section)
        .map(|(_, pages)| pages.contains(&page.as_str()))
        .unwrap_or(false);
    if !allowed {
        return not_found().await.into_response();
    }

    let title = title_case(&page);
    let path = state.docs_dir.join(&section).join(format!("{page}.md"));
    let body = match tokio::fs::read_to_string(&path).await {
        Ok(source) => {
            let rendered = markdown::render(&source);
            format!("{}{}", markdown::toc_html(&rendered.toc), rendered.html)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "page content unreadable");
            "<div class=\"alert\">This content is unavailable right now. \
             Please try again later.</div>"
                .to_string()
        }
    };

    Html(layout(&title, &section, &body)).into_response()
}

async fn visualizations(State(state): State<AppState>) -> Html<String> {
    let svg = state.shell.memory.render_svg(Viewport::default());
    let body = format!(
        "<h1>Visualizations</h1>\
         <p>The shared-history graph, one node per remembered moment.</p>\
         <div class=\"visualization\">{svg}</div>"
    );
    Html(layout("Visualizations", "visualizations", &body))
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let hits = search::search_docs(&state.docs_dir, &params.q);

    let mut body = format!("<h1>Search Results</h1><p>Query: <em>{}</em></p>", escape_html(&params.q));
    if hits.is_empty() {
        body.push_str("<p>No matching pages.</p>");
    } else {
        body.push_str("<ul class=\"search-results\">");
        for hit in &hits {
            body.push_str(&format!(
                "<li><a href=\"/{}/{}\">{}</a><p>{}</p></li>",
                hit.section,
                hit.page,
                escape_html(&hit.title),
                escape_html(&hit.snippet),
            ));
        }
        body.push_str("</ul>");
    }

    Html(layout("Search Results", "search", &body))
}

async fn theme_css(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        state.shell.settings.css_custom_properties(),
    )
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Html(layout(
            "Page Not Found",
            "",
            "<h1>Page Not Found</h1><p>The requested page does not exist.</p>",
        )),
    )
}

// ---- prototype API ----

#[derive(Deserialize)]
struct SubmitBody {
    text: String,
}

async fn api_submit(
    State(state): State<AppState>,
    Json(body): Json<SubmitBody>,
) -> Json<serde_json::Value> {
    let accepted = state.shell.conversation.submit(&body.text).is_some();
    Json(json!({ "accepted": accepted }))
}

async fn api_history(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "turns": state.shell.conversation.history(),
        "processing": state.shell.conversation.is_processing(),
        "pixel": state.shell.pixel.state(),
    }))
}

async fn api_conversation_reset(State(state): State<AppState>) -> StatusCode {
    state.shell.conversation.reset();
    StatusCode::NO_CONTENT
}

async fn api_rituals() -> Json<serde_json::Value> {
    let rituals: Vec<_> = catalog::RITUALS
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "title": r.title,
                "description": r.description,
                "steps": r.steps.len(),
            })
        })
        .collect();
    Json(json!({ "rituals": rituals }))
}

async fn api_ritual_start(
    State(state): State<AppState>,
    UrlPath(id): UrlPath<String>,
) -> Json<serde_json::Value> {
    state
        .shell
        .bus
        .publish(&AppEvent::RitualSelected { ritual_id: id });
    Json(session_json(&state.shell))
}

#[derive(Deserialize)]
struct NavigateBody {
    direction: i32,
}

async fn api_ritual_navigate(
    State(state): State<AppState>,
    Json(body): Json<NavigateBody>,
) -> Json<serde_json::Value> {
    state.shell.rituals.navigate(body.direction);
    Json(session_json(&state.shell))
}

async fn api_ritual_complete(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.shell.rituals.complete();
    Json(session_json(&state.shell))
}

async fn api_ritual_close(State(state): State<AppState>) -> StatusCode {
    state.shell.rituals.close();
    StatusCode::NO_CONTENT
}

async fn api_ritual_session(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(session_json(&state.shell))
}

fn session_json(shell: &Shell) -> serde_json::Value {
    match (shell.rituals.current(), shell.rituals.affordances()) {
        (Some(view), Some(nav)) => json!({
            "ritualId": view.ritual_id,
            "ritualTitle": view.ritual_title,
            "stepIndex": view.step_index,
            "stepCount": view.step_count,
            "stepTitle": view.step.title,
            "stepContent": view.step.content,
            "prevEnabled": nav.prev_enabled,
            "nextLabel": nav.next_label,
        }),
        _ => serde_json::Value::Null,
    }
}

async fn api_memory(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!(state.shell.memory.graph()))
}

#[derive(Deserialize)]
struct VizParams {
    width: Option<f64>,
    height: Option<f64>,
}

async fn api_memory_svg(
    State(state): State<AppState>,
    Query(params): Query<VizParams>,
) -> impl IntoResponse {
    let default = Viewport::default();
    let viewport = Viewport {
        width: params.width.unwrap_or(default.width),
        height: params.height.unwrap_or(default.height),
    };
    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        state.shell.memory.render_svg(viewport),
    )
}

async fn api_settings_get(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!(state.shell.settings.snapshot()))
}

async fn api_settings_put(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Map<String, serde_json::Value>>,
) -> Json<serde_json::Value> {
    for (key, value) in &body {
        state.shell.settings.update(key, value);
    }
    Json(json!(state.shell.settings.snapshot()))
}

async fn api_settings_reset(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.shell.settings.reset();
    Json(json!(state.shell.settings.snapshot()))
}

async fn api_pixel(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "state": state.shell.pixel.state() }))
}

async fn api_pixel_activate(State(state): State<AppState>) -> StatusCode {
    state.shell.pixel.activate();
    StatusCode::NO_CONTENT
}

async fn api_section(
    State(state): State<AppState>,
    UrlPath(fragment): UrlPath<String>,
) -> Json<serde_json::Value> {
    state.shell.switch_section(&fragment);
    Json(json!({ "section": state.shell.section() }))
}

// ---- shared page chrome ----

/// Wrap rendered content in the site chrome: nav, theme link, footer.
fn layout(title: &str, active_section: &str, body: &str) -> String {
    let mut nav = String::new();
    for (section, pages) in SECTIONS {
        let class = if *section == active_section { " class=\"active\"" } else { "" };
        nav.push_str(&format!(
            "<a href=\"/{section}/{}\"{class}>{}</a> ",
            pages[0],
            title_case(section)
        ));
    }
    nav.push_str("<a href=\"/visualizations\">Visualizations</a> ");
    nav.push_str("<a href=\"/search\">Search</a>");

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} - Kindred AI Companion</title>\n\
         <link rel=\"stylesheet\" href=\"/theme.css\">\n</head>\n<body>\n\
         <header><a href=\"/\">Kindred</a><nav>{nav}</nav></header>\n\
         <main>{body}</main>\n\
         <footer>Kindred AI Companion documentation</footer>\n</body>\n</html>\n"
    )
}

/// kebab-case slug → Title Case label.
pub(crate) fn title_case(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
