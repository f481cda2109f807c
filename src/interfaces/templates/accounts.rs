use crate::{interfaces::templates::layout::Page, utils::markdown::escape};

pub fn login_page(page: &Page, username: &str, next: &str, failed: bool) -> String {
    let error = if failed {
        r#"<div class="alert alert-danger" id="login-error">Please enter a correct username and password. Note that both fields may be case-sensitive.</div>"#
    } else {
        ""
    };

    page.render(&format!(
        r#"<div class="login">
<h2>Log in</h2>
{error}
<form method="POST" action="/accounts/login/">
<div class="form-group">
<label for="id_username">Username:</label>
<input type="text" name="username" id="id_username" class="form-control" autofocus value="{username}">
</div>
<div class="form-group">
<label for="id_password">Password:</label>
<input type="password" name="password" id="id_password" class="form-control">
</div>
<input type="hidden" name="next" value="{next}">
<button type="submit" class="btn btn-secondary" id="login-button">Log in</button>
</form>
</div>"#,
        username = escape(username),
        next = escape(next),
    ))
}
