//! Static pages. Everything else the server returns is JSON or plain text.

const ERROR_SLOT: &str = "<!-- error -->";

const LOGIN_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Admin login</title></head>
<body>
  <h1>Admin login</h1>
  <!-- error -->
  <form method="post" action="/admin">
    <label>Username <input name="username" autocomplete="username" required></label>
    <label>Password <input name="password" type="password" autocomplete="current-password" required></label>
    <button type="submit">Log in</button>
  </form>
</body>
</html>
"#;

pub const SCANNER_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Scanner</title></head>
<body>
  <h1>Scanner</h1>
  <p><a href="/">Dashboard</a> | <a href="/logout">Log out</a></p>
  <form id="scan">
    <select id="mode">
      <option value="/api/verify">Entry / exit</option>
      <option value="/api/verify_lunch">Lunch</option>
    </select>
    <input id="code" placeholder="Scanned URL or token" autofocus required>
    <button type="submit">Verify</button>
  </form>
  <p id="status"></p>
  <script>
    document.getElementById('scan').addEventListener('submit', async (e) => {
      e.preventDefault();
      const input = document.getElementById('code');
      const token = input.value.trim().split('/').pop();
      const endpoint = document.getElementById('mode').value;
      const res = await fetch(`${endpoint}?token=${encodeURIComponent(token)}`);
      const body = await res.json();
      const status = document.getElementById('status');
      status.textContent = body.message;
      status.style.color = body.status === 'success' ? 'green' : 'red';
      input.value = '';
    });
  </script>
</body>
</html>
"#;

/// The login form, optionally with an inline error line.
pub fn login_page(error: Option<&str>) -> String {
    match error {
        Some(message) => {
            LOGIN_PAGE.replace(ERROR_SLOT, &format!(r#"<p class="error">{message}</p>"#))
        }
        None => LOGIN_PAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_page_without_error_has_no_error_line() {
        assert!(!login_page(None).contains(r#"class="error""#));
    }

    #[test]
    fn login_page_renders_error_inline() {
        let page = login_page(Some("Invalid username or password"));
        assert!(page.contains(r#"<p class="error">Invalid username or password</p>"#));
        assert!(!page.contains(ERROR_SLOT));
    }
}
