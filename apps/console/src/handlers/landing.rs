use axum::response::Html;

use crate::render;

pub async fn landing_handler() -> Html<String> {
    Html(render::landing_page())
}
