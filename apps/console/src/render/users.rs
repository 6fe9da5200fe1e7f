use rbac_console_application::{Freshness, UserModal, UserWorkflowState};
use rbac_console_domain::{Role, RoleId, User, UserStatus};

use super::{escape, field_error, layout};

/// Renders the user management page.
pub fn user_page(state: &UserWorkflowState) -> String {
    let mut body = String::from("<h1>User Management</h1>\n<p><a href=\"/\">Home</a></p>\n");

    if state.is_busy() {
        body.push_str("<p class=\"busy\">Saving...</p>\n");
    }

    body.push_str(&add_user_form(state));
    body.push_str(&modal(state));

    body.push_str("<h2>Users</h2>\n");
    if state.users().freshness() == Freshness::Loading {
        body.push_str("<p class=\"busy\">Loading users...</p>\n");
    }

    if state.users().is_empty() {
        body.push_str("<p>No users available.</p>\n");
    } else {
        body.push_str(
            "<table>\n<thead><tr><th>Name</th><th>Email</th><th>Role</th><th>Status</th><th>Actions</th></tr></thead>\n<tbody>\n",
        );
        for user in state.users().items() {
            body.push_str(&user_row(state, user));
        }
        body.push_str("</tbody>\n</table>\n");
    }

    layout("User Management", &body)
}

fn add_user_form(state: &UserWorkflowState) -> String {
    let form = state.form();
    let errors = state.errors();
    let disabled = if state.is_busy() { " disabled" } else { "" };

    format!(
        "<h2>Add New User</h2>\n<form method=\"post\" action=\"/users\">\n\
         <input type=\"text\" name=\"name\" placeholder=\"Name\" value=\"{name}\">\n{name_error}\
         <input type=\"email\" name=\"email\" placeholder=\"Email\" value=\"{email}\">\n{email_error}\
         <select name=\"role\">\n{role_options}</select>\n{role_error}\
         <button type=\"submit\"{disabled}>Add User</button>\n</form>\n",
        name = escape(&form.name),
        name_error = field_error(errors.name.as_ref()),
        email = escape(&form.email),
        email_error = field_error(errors.email.as_ref()),
        role_options = role_options(state.roles().items(), Some(form.role.as_str())),
        role_error = field_error(errors.role.as_ref()),
    )
}

fn role_options(roles: &[Role], selected: Option<&str>) -> String {
    let mut options = String::from("<option value=\"\">Select Role</option>\n");
    for role in roles {
        let id = role.id().as_str();
        let marker = if selected == Some(id) { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{id}\"{marker}>{name}</option>\n",
            id = escape(id),
            name = escape(role.name()),
        ));
    }

    options
}

fn status_options(current: UserStatus) -> String {
    UserStatus::all()
        .iter()
        .map(|status| {
            let marker = if *status == current { " selected" } else { "" };
            format!("<option value=\"{status}\"{marker}>{status}</option>")
        })
        .collect()
}

/// Resolves the role label, falling back to the role list when the service
/// returned only an id.
fn role_label<'a>(state: &'a UserWorkflowState, user: &'a User) -> &'a str {
    let Some(role) = user.role() else {
        return "";
    };

    role.name
        .as_deref()
        .or_else(|| state.roles().get(&role.id).map(Role::name))
        .unwrap_or("")
}

fn user_row(state: &UserWorkflowState, user: &User) -> String {
    let id = escape(user.id().as_str());
    format!(
        "<tr><td>{name}</td><td>{email}</td><td>{role}</td><td>\
         <form method=\"post\" action=\"/users/{id}/status\">\
         <select name=\"status\" onchange=\"this.form.submit()\">{statuses}</select>\
         <noscript><button type=\"submit\">Apply</button></noscript></form>\
         </td><td>\
         <form method=\"post\" action=\"/users/{id}/role\"><button type=\"submit\">Edit Role</button></form>\
         <form method=\"post\" action=\"/users/{id}/delete\"><button type=\"submit\">Delete</button></form>\
         </td></tr>\n",
        name = escape(user.name()),
        email = escape(user.email()),
        role = escape(role_label(state, user)),
        statuses = status_options(user.status()),
    )
}

fn modal(state: &UserWorkflowState) -> String {
    match state.modal() {
        UserModal::Closed => String::new(),
        UserModal::ConfirmingDelete(user_id) => format!(
            "<section class=\"modal\">\n\
             <h3>Are you sure you want to delete this user?</h3>\n\
             <form method=\"post\" action=\"/users/delete/confirm\">\
             <input type=\"hidden\" name=\"user_id\" value=\"{id}\">\
             <button type=\"submit\">Delete</button></form>\n\
             <form method=\"post\" action=\"/users/delete/cancel\"><button type=\"submit\">Cancel</button></form>\n\
             </section>\n",
            id = escape(user_id.as_str()),
        ),
        UserModal::ChangingRole {
            user_id,
            selected_role,
        } => format!(
            "<section class=\"modal\">\n<h3>Change User Role</h3>\n\
             <form method=\"post\" action=\"/users/role\">\n\
             <input type=\"hidden\" name=\"user_id\" value=\"{id}\">\n\
             <select name=\"role\">\n{options}</select>\n\
             <button type=\"submit\">Save</button>\n</form>\n\
             <form method=\"post\" action=\"/users/role/cancel\"><button type=\"submit\">Cancel</button></form>\n\
             </section>\n",
            id = escape(user_id.as_str()),
            options = role_options(
                state.roles().items(),
                selected_role.as_ref().map(RoleId::as_str)
            ),
        ),
    }
}
