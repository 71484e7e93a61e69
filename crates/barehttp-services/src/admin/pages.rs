//! Admin panel HTML

use crate::pages::{button_link, document};
use barehttp_core::html::escape;
use barehttp_core::shell::{CommandOutput, Rejection, ShellCommand};

const STYLES: &str = ".grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(220px,1fr));gap:12px}\n\
label{display:flex;gap:8px;align-items:center}\n\
.badge{display:inline-block;border:1px solid var(--border);border-radius:999px;padding:4px 10px;margin-right:8px}\n\
.row{display:grid;grid-template-columns:1fr;gap:12px}\n";

/// Home page: quick-run buttons, an `ls` form and the shell form
pub fn home(base_url: &str, keys: &[&str], vocabulary: &[&str]) -> String {
    let mut sorted: Vec<&str> = keys.iter().copied().filter(|k| *k != "ls").collect();
    sorted.sort_unstable();

    let mut body = String::from("<h1>AdminPanel</h1>\n");
    body.push_str(&format!(
        "<p><small>Diagnostic commands: {}.</small></p>\n",
        escape(&keys.join(", "))
    ));

    body.push_str("<h2>Quick run</h2>\n<div class=\"grid\">\n");
    for key in sorted {
        let href = format!("{}exec?key={}", base_url, key);
        body.push_str(&format!(
            "<div class=\"card\"><div style=\"display:flex;justify-content:space-between;gap:8px;align-items:center\">\
             <strong>{}</strong>{}</div></div>\n",
            escape(key),
            button_link(&href, "Run")
        ));
    }
    body.push_str("</div>\n");

    body.push_str(
        "<h2>List a directory</h2>\n<div class=\"card\">\n<form action=\"/exec\" method=\"get\">\n\
         <input type=\"hidden\" name=\"key\" value=\"ls\">\n\
         <label>Path <input type=\"text\" name=\"path\" placeholder=\".\" value=\".\"></label>\n\
         <button class=\"btn\" type=\"submit\">Run</button>\n</form>\n\
         <p><small>Paths may contain A-Z a-z 0-9 _ - . / ~ and spaces; anything else lists the current directory.</small></p>\n\
         </div>\n",
    );

    body.push_str("<h2>Shell</h2>\n<div class=\"card\">\n");
    body.push_str(&shell_form(""));
    body.push_str(&format!(
        "<p><small>Allowed verbs: {}.</small></p>\n</div>\n",
        escape(&vocabulary.join(", "))
    ));

    document("AdminPanel", STYLES, &body)
}

/// Result of a diagnostic command
pub fn command_result(title: &str, command: &str, output: &CommandOutput) -> String {
    let mut body = String::from("<h1>Result</h1>\n<div class=\"card\">\n");
    body.push_str(&format!(
        "<div><span class=\"badge\">exit {}</span><span class=\"badge\">{} ms</span></div>\n",
        output.exit_code, output.elapsed_ms
    ));
    body.push_str(&field("Title", &escape(title)));
    body.push_str(&field("Command", &format!("<code>{}</code>", escape(command))));
    body.push_str(&output_block("Stdout", &output.stdout));
    body.push_str(&output_block("Stderr", &output.stderr));
    body.push_str(&format!("<p>{}</p>\n</div>\n", button_link("/", "Back")));
    document("Command result", STYLES, &body)
}

/// What the shell page shows under its form
pub enum ShellView<'a> {
    Blank,
    Rejected(Rejection),
    Ran {
        command: &'a ShellCommand,
        output: &'a CommandOutput,
    },
}

/// Shell page: the form prefilled with `q`, then the outcome
pub fn shell(q: &str, view: ShellView<'_>) -> String {
    let mut body = String::from("<h1>Shell</h1>\n<div class=\"card\">\n");
    body.push_str(&shell_form(q));
    body.push_str(&format!("{}\n</div>\n", button_link("/", "Home")));

    match view {
        ShellView::Blank => {}
        ShellView::Rejected(rejection) => {
            body.push_str("<div class=\"card\" style=\"margin-top:12px\">\n<div class=\"row\">\n");
            body.push_str(&field("Status", &escape(&format!("Rejected: {}", rejection))));
            body.push_str(&field("Hint", &escape(rejection.hint())));
            body.push_str("</div>\n</div>\n");
        }
        ShellView::Ran { command, output } => {
            body.push_str("<div class=\"card\" style=\"margin-top:12px\">\n<div class=\"row\">\n");
            body.push_str(&field(
                "Status",
                &format!("exit {}, {} ms", output.exit_code, output.elapsed_ms),
            ));
            body.push_str(&field("Title", &escape(&command.title)));
            let code = format!("<code>{}</code>", escape(&command.command));
            body.push_str(&field("Command", &code));
            if !output.stdout.is_empty() {
                body.push_str(&output_block("Stdout", &output.stdout));
            }
            if !output.stderr.is_empty() {
                body.push_str(&output_block("Stderr", &output.stderr));
            }
            body.push_str("</div>\n</div>\n");
        }
    }

    document("Shell", STYLES, &body)
}

fn shell_form(q: &str) -> String {
    format!(
        "<form action=\"/shell\" method=\"get\">\n\
         <label>Command <input type=\"text\" name=\"q\" value=\"{}\" placeholder=\"ls .\"></label>\n\
         <label>Token <input type=\"password\" name=\"token\" placeholder=\"if ADMINPANEL_TOKEN is set\"></label>\n\
         <button class=\"btn\" type=\"submit\">Run</button>\n</form>\n",
        escape(q)
    )
}

/// Labelled block; `html` must already be escaped
fn field(label: &str, html: &str) -> String {
    format!("<div><strong>{}</strong><div>{}</div></div>\n", label, html)
}

/// Captured stream, escaped inside `<pre>`
fn output_block(label: &str, text: &str) -> String {
    format!("<div><strong>{}</strong><pre>{}</pre></div>\n", label, escape(text))
}
