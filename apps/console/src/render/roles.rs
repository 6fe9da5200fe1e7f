use rbac_console_application::{Freshness, RoleModal, RoleWorkflowState};
use rbac_console_domain::Role;

use super::{escape, field_error, layout};

/// Renders the role management page.
pub fn role_page(state: &RoleWorkflowState) -> String {
    let mut body = String::from("<h1>Role Management</h1>\n<p><a href=\"/\">Home</a></p>\n");

    body.push_str(&add_role_form(state));
    body.push_str(&modal(state));

    body.push_str("<h2>Roles List</h2>\n");
    match state.roles().freshness() {
        Freshness::Loading => body.push_str("<p class=\"busy\">Loading roles...</p>\n"),
        Freshness::Refetching => body.push_str("<p class=\"busy\">Refreshing...</p>\n"),
        _ => {}
    }

    if state.roles().is_empty() {
        body.push_str("<p>No roles available.</p>\n");
    } else {
        body.push_str(
            "<table>\n<thead><tr><th>Role</th><th>Permissions</th><th>Actions</th></tr></thead>\n<tbody>\n",
        );
        for role in state.roles().items() {
            body.push_str(&role_row(role));
        }
        body.push_str("</tbody>\n</table>\n");
    }

    layout("Role Management", &body)
}

fn add_role_form(state: &RoleWorkflowState) -> String {
    let form = state.form();
    let errors = state.errors();

    format!(
        "<h2>Add New Role</h2>\n<form method=\"post\" action=\"/roles\">\n\
         <input type=\"text\" name=\"name\" placeholder=\"Role Name\" value=\"{name}\">\n{name_error}\
         <input type=\"text\" name=\"permissions\" placeholder=\"Permissions (comma-separated)\" value=\"{permissions}\">\n{permissions_error}\
         <button type=\"submit\">Add Role</button>\n</form>\n",
        name = escape(&form.name),
        name_error = field_error(errors.name.as_ref()),
        permissions = escape(&form.permissions),
        permissions_error = field_error(errors.permissions.as_ref()),
    )
}

fn role_row(role: &Role) -> String {
    let id = escape(role.id().as_str());
    format!(
        "<tr><td>{name}</td><td>{permissions}</td><td>\
         <form method=\"post\" action=\"/roles/{id}/permissions\"><button type=\"submit\">Edit</button></form>\
         <form method=\"post\" action=\"/roles/{id}/delete\"><button type=\"submit\">Delete</button></form>\
         </td></tr>\n",
        name = escape(role.name()),
        permissions = escape(&role.permissions_label()),
    )
}

fn modal(state: &RoleWorkflowState) -> String {
    match state.modal() {
        RoleModal::Closed => String::new(),
        RoleModal::ConfirmingDelete(role_id) => {
            let name = state
                .roles()
                .get(role_id)
                .map(Role::name)
                .unwrap_or(role_id.as_str());
            format!(
                "<section class=\"modal\">\n<h3>Are you sure you want to delete the role {name}?</h3>\n\
                 <form method=\"post\" action=\"/roles/delete/confirm\">\
                 <input type=\"hidden\" name=\"role_id\" value=\"{id}\">\
                 <button type=\"submit\">Delete</button></form>\n\
                 <form method=\"post\" action=\"/roles/delete/cancel\"><button type=\"submit\">Cancel</button></form>\n\
                 </section>\n",
                name = escape(name),
                id = escape(role_id.as_str()),
            )
        }
        RoleModal::EditingPermissions {
            role_id,
            draft,
            error,
        } => format!(
            "<section class=\"modal\">\n<h3>Edit Permissions</h3>\n\
             <form method=\"post\" action=\"/roles/permissions\">\n\
             <input type=\"hidden\" name=\"role_id\" value=\"{id}\">\n\
             <input type=\"text\" name=\"permissions\" placeholder=\"Permissions (comma-separated)\" value=\"{draft}\">\n{error}\
             <button type=\"submit\">Save</button>\n</form>\n\
             <form method=\"post\" action=\"/roles/permissions/cancel\"><button type=\"submit\">Cancel</button></form>\n\
             </section>\n",
            id = escape(role_id.as_str()),
            draft = escape(draft),
            error = field_error(error.as_ref()),
        ),
    }
}
