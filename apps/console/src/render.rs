//! Server-rendered HTML pages.

mod roles;
mod users;

pub use roles::role_page;
pub use users::user_page;

const STYLE: &str = "body{font-family:system-ui,sans-serif;background:#111827;color:#f3f4f6;margin:0;padding:2rem}\
main{max-width:60rem;margin:0 auto}\
table{width:100%;border-collapse:collapse;margin-top:1rem}\
th,td{padding:.5rem;border-bottom:1px solid #374151;text-align:left}\
input,select,button{padding:.4rem;margin:.2rem 0}\
.error{color:#f87171;margin:.2rem 0}\
.modal{border:1px solid #4b5563;background:#1f2937;padding:1rem;margin:1rem 0;border-radius:.5rem}\
.busy{color:#93c5fd}\
a{color:#60a5fa}";

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<main>\n{body}</main>\n</body>\n</html>\n",
        title = escape(title),
    )
}

fn field_error(message: Option<&String>) -> String {
    message
        .map(|message| format!("<p class=\"error\">{}</p>\n", escape(message)))
        .unwrap_or_default()
}

pub fn landing_page() -> String {
    layout(
        "Role-Based Access Control System",
        "<h1>Role-Based Access Control System</h1>\n\
         <p>Manage users and roles efficiently with our intuitive interface.</p>\n\
         <nav>\n<a href=\"/roles\">Manage Roles</a>\n<a href=\"/users\">Manage Users</a>\n</nav>\n",
    )
}

pub fn error_page(message: &str) -> String {
    layout(
        "Error",
        &format!(
            "<h1>Something went wrong</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/\">Home</a></p>\n",
            escape(message)
        ),
    )
}
