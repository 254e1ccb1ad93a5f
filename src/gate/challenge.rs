//! Challenge page markup.

const ERROR_BLOCK: &str =
    r#"<div class="error-message" role="alert">Incorrect password. Please try again.</div>"#;

/// Render the password form that posts back to `target_path`.
///
/// `has_error` adds an inline error block above the form.
#[must_use]
pub fn render(title: &str, target_path: &str, has_error: bool) -> String {
    let title = escape_html(title);
    let action = escape_html(target_path);
    let error = if has_error { ERROR_BLOCK } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta name="robots" content="noindex, nofollow">
  <title>{title}</title>
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}
    body {{ font-family: system-ui, sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); min-height: 100vh; display: flex; justify-content: center; align-items: center; padding: 20px; }}
    .gate {{ background: #fff; padding: 48px 40px; border-radius: 16px; box-shadow: 0 20px 60px rgba(0,0,0,0.3); text-align: center; max-width: 440px; width: 100%; }}
    h1 {{ color: #2c3e50; font-size: 26px; margin-bottom: 8px; }}
    .subtitle {{ color: #7f8c8d; font-size: 15px; line-height: 1.6; margin-bottom: 28px; }}
    input[type="password"] {{ width: 100%; padding: 16px 18px; font-size: 16px; border: 2px solid #e0e0e0; border-radius: 10px; background: #f8f9fa; margin-bottom: 20px; }}
    input[type="password"]:focus {{ outline: none; border-color: #667eea; background: #fff; }}
    button {{ width: 100%; padding: 16px; font-size: 16px; font-weight: 600; color: #fff; border: none; border-radius: 10px; cursor: pointer; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); }}
    .error-message {{ background: #fee; color: #c33; border: 1px solid #fcc; border-radius: 10px; padding: 14px; margin-bottom: 20px; font-size: 14px; }}
    @media (max-width: 480px) {{ .gate {{ padding: 32px 24px; }} h1 {{ font-size: 22px; }} }}
  </style>
</head>
<body>
  <main class="gate">
    <h1>{title}</h1>
    <p class="subtitle">Enter the password to view these documents.<br>Access stays unlocked for 7 days.</p>
    {error}
    <form method="POST" action="{action}">
      <input type="password" name="password" placeholder="Password" aria-label="Password" required autofocus autocomplete="off">
      <button type="submit">Unlock</button>
    </form>
  </main>
</body>
</html>
"#
    )
}

fn escape_html(input: &str) -> String {
    input.chars().fold(String::with_capacity(input.len()), |mut acc, ch| {
        match ch {
            '&' => acc.push_str("&amp;"),
            '<' => acc.push_str("&lt;"),
            '>' => acc.push_str("&gt;"),
            '"' => acc.push_str("&quot;"),
            '\'' => acc.push_str("&#x27;"),
            _ => acc.push(ch),
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_posts_back_to_target() {
        let page = render("Docs", "/docs/page.html", false);
        assert!(page.contains(r#"<form method="POST" action="/docs/page.html">"#));
        assert!(page.contains(r#"name="password""#));
        assert!(page.contains("<title>Docs</title>"));
    }

    #[test]
    fn error_block_only_when_flagged() {
        assert!(!render("Docs", "/", false).contains("error-message\" role"));
        assert!(render("Docs", "/", true).contains(ERROR_BLOCK));
    }

    #[test]
    fn target_and_title_are_escaped() {
        let page = render("<b>Docs</b>", r#"/"><script>alert(1)</script>"#, false);
        assert!(!page.contains("<script>"));
        assert!(page.contains("&quot;&gt;&lt;script&gt;"));
        assert!(page.contains("&lt;b&gt;Docs&lt;/b&gt;"));
    }

    #[test]
    fn escape_html_passthrough() {
        assert_eq!(escape_html("/docs/guide"), "/docs/guide");
        assert_eq!(escape_html("a&b"), "a&amp;b");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }
}
