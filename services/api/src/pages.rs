use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use vitrine_db::company::models::CompanyCard;
use vitrine_db::company::repositories::CompanyRepository;

use crate::error::PageError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/robots.txt", get(robots))
}

pub async fn home(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let cards = state.companies.list_accepted().await?;
    Ok(Html(render_index(&cards)))
}

pub async fn about() -> Html<String> {
    Html(render_about())
}

pub async fn robots() -> &'static str {
    "User-agent: *\nDisallow:\n"
}

/// Search-engine ownership proof. The route itself carries the token; the
/// body repeats it in the format the verifier expects.
pub async fn site_verification(State(state): State<AppState>) -> String {
    format!("google-site-verification: google{}.html", state.google_site_token)
}

pub async fn fallback() -> (StatusCode, Html<String>) {
    error_page(StatusCode::NOT_FOUND)
}

// ── Rendering ───────────────────────────────────────────────────

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn page_shell(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

fn render_index(cards: &[CompanyCard]) -> String {
    let mut items = String::new();
    for card in cards {
        let name = escape(card.name.as_deref().unwrap_or(""));
        let entry = match card.url.as_deref() {
            Some(url) => format!("<a href=\"{}\">{}</a>", escape(url), name),
            None => name,
        };
        let logo = match card.logo.as_deref() {
            Some(logo) => format!("<img src=\"{}\" alt=\"\"> ", escape(logo)),
            None => String::new(),
        };
        items.push_str(&format!("<li>{logo}{entry}</li>\n"));
    }
    let body = format!("<h1>Company directory</h1>\n<ul>\n{items}</ul>");
    page_shell("Company directory", &body)
}

fn render_about() -> String {
    let body = "<h1>About</h1>\n\
                <p>A directory of companies, collected from survey submissions\n\
                and curated by hand.</p>";
    page_shell("About", body)
}

pub fn error_page(status: StatusCode) -> (StatusCode, Html<String>) {
    let (title, message) = match status {
        StatusCode::UNAUTHORIZED => ("401 Unauthorized", "You need to sign in to see this page."),
        StatusCode::FORBIDDEN => ("403 Forbidden", "You are not allowed to see this page."),
        StatusCode::NOT_FOUND => ("404 Not Found", "This page does not exist."),
        StatusCode::GONE => ("410 Gone", "This page has been removed."),
        _ => ("500 Internal Server Error", "Something went wrong on our side."),
    };
    let body = format!("<h1>{title}</h1>\n<p>{message}</p>");
    (status, Html(page_shell(title, &body)))
}
