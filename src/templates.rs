use askama::Template;
use axum::response::Html;

/// Renders into HTML, logging instead of failing the request on template errors.
pub fn render<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Failed to render template: {}", e);
        "Template render error".to_string()
    }))
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub message: String,
}

pub async fn home_handler() -> Html<String> {
    let template = HomeTemplate {
        title: "Garage Admin".to_string(),
        message: "Manage users and the cars they own.".to_string(),
    };

    render(&template)
}
