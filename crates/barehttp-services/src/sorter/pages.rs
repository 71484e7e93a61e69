//! Sorter pages

use crate::pages::{button_link, document};
use barehttp_core::html::escape;

const STYLES: &str = ".row{display:flex;gap:10px;align-items:center;flex-wrap:wrap}\n\
.row input{flex:1;min-width:240px}\n\
.samples{margin-top:14px;display:flex;gap:10px;flex-wrap:wrap}\n\
dt{font-weight:600;margin-top:10px}\n\
dd{margin:4px 0 0 0}\n";

const SAMPLES: [&str; 2] = ["5,1,9,2,7,3", "10,9,8,7,6,5,4,3,2,1"];

/// Input form plus sample links
pub fn home(base_url: &str) -> String {
    let mut body = String::from(
        "<h1>Sorter</h1>\n<div class=\"card\">\n\
         <form action=\"/sort\" method=\"get\" class=\"row\">\n\
         <input name=\"array\" type=\"text\" placeholder=\"5,1,9,2,7,3\" autofocus>\n\
         <button class=\"btn\" type=\"submit\">Sort</button>\n\
         </form>\n<div class=\"samples\">\n",
    );
    for sample in SAMPLES {
        body.push_str(&button_link(&format!("{}sort?array={}", base_url, sample), sample));
        body.push('\n');
    }
    body.push_str(
        "</div>\n<p class=\"small\">Comma-separated integers, \
         sorted ascending with a stable merge sort.</p>\n</div>\n",
    );
    document("Sorter", STYLES, &body)
}

/// Raw input next to the sorted numbers
pub fn result(input: &str, sorted: &str, count: usize) -> String {
    let body = format!(
        "<h1>Sorted {count} numbers</h1>\n<div class=\"card\">\n<dl>\n\
         <dt>Input</dt><dd><pre>{}</pre></dd>\n\
         <dt>Output</dt><dd><pre>{}</pre></dd>\n\
         </dl>\n</div>\n<p><a class=\"btn\" href=\"/\">Back</a></p>\n",
        escape(input),
        escape(sorted)
    );
    document("Sorter - result", STYLES, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home() {
        let html = home("http://localhost:8082/");
        assert!(html.contains("action=\"/sort\""));
        assert!(html.contains("href=\"http://localhost:8082/sort?array=5,1,9,2,7,3\""));
        assert!(html.contains("href=\"http://localhost:8082/sort?array=10,9,8,7,6,5,4,3,2,1\""));
    }

    #[test]
    fn test_result_escapes_input() {
        let html = result("3,<b>1</b>", "1, 3", 2);
        assert!(html.contains("<pre>3,&lt;b&gt;1&lt;/b&gt;</pre>"));
        assert!(html.contains("<pre>1, 3</pre>"));
        assert!(html.contains("Sorted 2 numbers"));
    }
}
