//! Page scaffolding shared by every service

use barehttp_core::html::escape;

/// Base stylesheet: layout variables, typography, cards and buttons
pub const BASE_STYLES: &str = ":root{--gap:18px;--radius:14px;--border:#e5e7eb;--muted:#6b7280}\n\
*{box-sizing:border-box}\n\
body{font-family:system-ui,-apple-system,\"Segoe UI\",Roboto,Arial,sans-serif;line-height:1.5;margin:24px}\n\
.card{border:1px solid var(--border);border-radius:var(--radius);padding:16px;background:#fff}\n\
.btn{appearance:none;border:1px solid var(--border);background:#f8fafc;padding:8px 12px;border-radius:10px;text-decoration:none;color:inherit;display:inline-flex;align-items:center;justify-content:center;cursor:pointer}\n\
input,select{font:inherit;border:1px solid var(--border);border-radius:10px;padding:8px 10px}\n\
pre{white-space:pre-wrap;margin:0;font-family:ui-monospace,SFMono-Regular,Menlo,Consolas,monospace}\n\
small,.small{color:var(--muted)}\n\
h1{margin:0 0 10px 0}\n";

/// Full HTML document around `body`. `title` is escaped, `extra_styles` and
/// `body` are inserted as-is.
pub fn document(title: &str, extra_styles: &str, body: &str) -> String {
    let mut html = String::with_capacity(BASE_STYLES.len() + extra_styles.len() + body.len() + 256);
    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(title)));
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<style>\n",
    );
    html.push_str(BASE_STYLES);
    html.push_str(extra_styles);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(body);
    html.push_str("</body>\n</html>\n");
    html
}

/// `<a class="btn">` with an escaped href and label
pub fn button_link(href: &str, label: &str) -> String {
    format!("<a class=\"btn\" href=\"{}\">{}</a>", escape(href), escape(label))
}
