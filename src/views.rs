//! Inline HTML views. Rendering is a collaborator concern; these pages are
//! deliberately minimal and carry no client-side logic.

use crate::models::User;

const STYLE: &str = r#"
        body {
            background-color: #f4f4f5;
            color: #18181b;
            font-family: sans-serif;
            max-width: 480px;
            margin: 60px auto;
            padding: 0 16px;
        }
        h1 { color: #4338ca; }
        form { display: flex; flex-direction: column; gap: 8px; }
        input, textarea, button { padding: 8px; font-size: 14px; }
        button { background: #4338ca; color: white; border: none; cursor: pointer; }
        a { color: #4338ca; }
        img.avatar { max-width: 120px; border-radius: 8px; }
"#;

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
{body}
</body>
</html>"#
    )
}

/// Escape untrusted text for interpolation into HTML bodies and
/// attribute values.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn index() -> String {
    page(
        "Welcome",
        r#"    <h1>Welcome</h1>
    <p>Create an account or log in to set up your profile.</p>
    <form action="/create" method="post">
        <input name="username" placeholder="Username" required>
        <input name="email" type="email" placeholder="Email" required>
        <input name="password" type="password" placeholder="Password" required>
        <input name="age" type="number" placeholder="Age" required>
        <button type="submit">Create account</button>
    </form>
    <p><a href="/login">Log in</a> &middot; <a href="/find-account">Find my account</a></p>"#,
    )
}

pub fn login() -> String {
    page(
        "Log in",
        r#"    <h1>Log in</h1>
    <form action="/login" method="post">
        <input name="email" type="email" placeholder="Email" required>
        <input name="password" type="password" placeholder="Password" required>
        <button type="submit">Log in</button>
    </form>
    <p><a href="/forgot-password">Forgot password?</a></p>"#,
    )
}

pub fn recovery() -> String {
    page(
        "Account recovery",
        r#"    <h1>Account recovery</h1>
    <form action="/recovery" method="post">
        <input name="email" type="email" placeholder="Email" required>
        <button type="submit">Recover account</button>
    </form>"#,
    )
}

pub fn forgot_password() -> String {
    page(
        "Forgot password",
        r#"    <h1>Forgot password</h1>
    <form action="/forgot-password" method="post">
        <input name="email" type="email" placeholder="Email" required>
        <button type="submit">Request reset</button>
    </form>"#,
    )
}

pub fn find_account() -> String {
    page(
        "Find account",
        r#"    <h1>Find your account</h1>
    <form action="/find-account" method="post">
        <input name="identifier" placeholder="Username or email" required>
        <button type="submit">Find account</button>
    </form>"#,
    )
}

pub fn reset_password(token: Option<&str>) -> String {
    let token = escape(token.unwrap_or(""));
    page(
        "Reset password",
        &format!(
            r#"    <h1>Reset password</h1>
    <form action="/reset-password" method="post">
        <input name="token" type="hidden" value="{token}">
        <input name="newPassword" type="password" placeholder="New password" required>
        <input name="confirmNewPassword" type="password" placeholder="Confirm new password" required>
        <button type="submit">Reset password</button>
    </form>"#
        ),
    )
}

pub fn profile_setup() -> String {
    page(
        "Profile setup",
        r#"    <h1>Set up your profile</h1>
    <form action="/profile-setup" method="post" enctype="multipart/form-data">
        <textarea name="bio" placeholder="Tell us about yourself"></textarea>
        <input name="profilePicture" type="file" accept="image/*">
        <button type="submit">Save profile</button>
    </form>"#,
    )
}

pub fn profile(user: &User) -> String {
    let picture = user
        .profile_picture
        .as_deref()
        .map(|p| format!(r#"    <img class="avatar" src="{}" alt="profile picture">"#, escape(p)))
        .unwrap_or_default();
    let bio = escape(user.bio.as_deref().unwrap_or("No bio yet."));

    page(
        "Profile",
        &format!(
            r#"    <h1>{username}</h1>
{picture}
    <p>{bio}</p>
    <p>Email: {email} &middot; Age: {age}</p>
    <p><a href="/profile-setup">Edit profile</a> &middot; <a href="/logout">Log out</a></p>"#,
            username = escape(&user.username),
            email = escape(&user.email),
            age = user.age,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_escapes_user_content() {
        let user = User {
            username: "<script>alert(1)</script>".to_string(),
            email: "a@b.com".to_string(),
            password_hash: "h".to_string(),
            age: 20,
            bio: Some("b & c".to_string()),
            profile_picture: None,
        };
        let html = profile(&user);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("b &amp; c"));
    }

    #[test]
    fn reset_form_embeds_escaped_token() {
        let html = reset_password(Some(r#"abc"def"#));
        assert!(html.contains("abc&quot;def"));
        assert!(!html.contains(r#"value="abc"def""#));
    }
}
