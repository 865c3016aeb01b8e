//! Shared page chrome and HTML helpers

/// Escape user-supplied text for inclusion in HTML content or attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

const PAGE_STYLE: &str = r#"
body {
    font-family: system-ui, -apple-system, sans-serif;
    max-width: 1200px;
    margin: 0 auto;
    padding: 20px;
    display: flex;
    gap: 20px;
}
nav {
    min-width: 200px;
    padding: 20px;
    background: #f5f5f5;
    border-radius: 8px;
}
nav ul { list-style: none; padding: 0; }
nav li { margin: 10px 0; }
nav a { text-decoration: none; color: #0066cc; }
nav a:hover { text-decoration: underline; }
main { flex: 1; }
.card {
    border: 1px solid #ddd;
    padding: 15px;
    margin: 10px 0;
    border-radius: 8px;
    background: white;
}
.card:hover { background: #f9f9f9; }
form { display: flex; flex-direction: column; gap: 15px; max-width: 600px; }
label { font-weight: bold; }
input, textarea, select {
    padding: 8px;
    border: 1px solid #ddd;
    border-radius: 4px;
    font-size: 14px;
}
textarea { min-height: 150px; font-family: inherit; }
button {
    padding: 10px 20px;
    background: #0066cc;
    color: white;
    border: none;
    border-radius: 4px;
    cursor: pointer;
    font-size: 14px;
}
button:hover { background: #0052a3; }
a { color: inherit; text-decoration: none; }
"#;

/// Wrap page content in the site layout (left navigation plus main pane).
pub fn page_layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<title>{}</title>
<style>{PAGE_STYLE}</style>
</head>
<body>
<nav>
<h3>Reflection App</h3>
<ul>
<li><a href="/reflections">All Reflections</a></li>
<li><a href="/reflections/new">Add Reflection</a></li>
</ul>
</nav>
<main>
{content}
</main>
</body>
</html>"#,
        escape(title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape(r#"<b onclick="x('y')">&"#),
            "&lt;b onclick=&quot;x(&#39;y&#39;)&quot;&gt;&amp;"
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(escape("Morning run"), "Morning run");
    }

    #[test]
    fn layout_escapes_title() {
        let page = page_layout("<script>", "body");
        assert!(page.contains("<title>&lt;script&gt;</title>"));
        assert!(page.contains("Reflection App"));
    }
}
