//! HTML escaping and the shared error document

/// Escape text for inclusion in HTML element content or quoted attributes
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Minimal error page used for every non-200 answer the server writes itself
pub fn error_page(status: u16, message: &str) -> String {
    format!(
        "<html><head><meta charset=\"utf-8\"><title>Error {status}</title></head>\
         <body style=\"font-family: system-ui, -apple-system, Segoe UI, Roboto, sans-serif;\">\
         <h1>Error {status}</h1><p>{}</p></body></html>",
        escape(message)
    )
}
