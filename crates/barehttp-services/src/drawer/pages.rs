//! Drawer home page

use crate::pages::document;
use barehttp_core::html::escape;

const STYLES: &str = ".grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(320px,1fr));gap:var(--gap)}\n\
.sample{border:1px solid var(--border);border-radius:var(--radius);overflow:hidden;background:#fff;display:flex;flex-direction:column}\n\
.preview{display:flex;align-items:center;justify-content:center;background:#fafafa;padding:12px;border-bottom:1px solid var(--border);min-height:220px}\n\
.preview img{max-width:100%;max-height:260px;display:block}\n\
.sample-body{padding:14px;display:flex;flex-direction:column;gap:10px}\n\
.title{font-weight:600}\n\
.params{color:var(--muted);font-family:ui-monospace,SFMono-Regular,Menlo,Consolas,monospace;font-size:13px}\n\
.controls{display:flex;gap:10px;align-items:center}\n\
.url{flex:1;min-width:120px;font-family:ui-monospace,SFMono-Regular,Menlo,Consolas,monospace;font-size:13px}\n\
.fields{display:grid;grid-template-columns:repeat(auto-fit,minmax(160px,1fr));gap:12px;margin-bottom:12px}\n\
label{display:flex;flex-direction:column;gap:6px}\n\
h2{margin:28px 0 12px 0}\n";

/// Gallery samples: (title, query)
const SAMPLES: [(&str, &str); 4] = [
    ("Circle 200x200", "shape=1&color=1&width=200&height=200&stroke=2&padding=0"),
    ("Rectangle 240x160", "shape=2&color=4&width=240&height=160&stroke=3&padding=2"),
    ("Triangle 220x220", "shape=3&color=8&width=220&height=220&stroke=2&padding=0"),
    ("Star 260x200", "shape=4&color=2&width=260&height=200&stroke=2&padding=3"),
];

const BUILDER: &str = r##"<h2>Builder</h2>
<div class="card">
<form onsubmit="openUrl();return false">
<div class="fields">
<label>Shape
<select id="shape">
<option value="1">Circle</option>
<option value="2">Rectangle</option>
<option value="3">Triangle</option>
<option value="4">Star</option>
</select>
</label>
<label>Color
<select id="color">
<option>0</option><option>1</option><option>2</option><option>3</option>
<option>4</option><option>5</option><option>6</option><option>7</option>
<option>8</option><option>9</option><option>10</option><option>11</option>
<option>12</option><option>13</option><option>14</option><option>15</option>
</select>
</label>
<label>Width (px) <input id="w" type="number" min="1" max="2000" value="220"></label>
<label>Height (px) <input id="h" type="number" min="1" max="2000" value="180"></label>
<label>Stroke (px) <input id="st" type="number" min="0" max="64" value="2"></label>
<label>Padding (%) <input id="pad" type="number" min="0" max="30" value="2"></label>
</div>
<div class="controls">
<input id="result-url" class="url" type="text" readonly>
<a id="open" class="btn" href="#" target="_blank" rel="noopener">Open</a>
<button class="btn" type="button" onclick="copyResult()">Copy</button>
</div>
<p class="small">shape 1-4, color 0-15, width/height &gt; 0, stroke &ge; 0, padding 0-30.</p>
</form>
<div class="preview" style="margin-top:12px"><img id="preview" alt="Preview"></div>
</div>
<script>
function buildQuery(){const p=new URLSearchParams({shape:shape.value,color:color.value,width:w.value,height:h.value,stroke:st.value,padding:pad.value});return "drawer?"+p.toString()}
function update(){const u=buildQuery();document.getElementById('result-url').value=new URL(u,location.href).href;document.getElementById('open').href=u;document.getElementById('preview').src=u}
function copyResult(){const v=document.getElementById('result-url').value;navigator.clipboard&&navigator.clipboard.writeText(v)}
function openUrl(){window.open(document.getElementById('open').href,"_blank")}
document.querySelectorAll('#shape,#color,#w,#h,#st,#pad').forEach(el=>el.addEventListener('input',update));update();
</script>
"##;

fn sample(title: &str, href: &str, query: &str) -> String {
    let href = escape(href);
    let title = escape(title);
    format!(
        "<div class=\"sample\"><div class=\"preview\"><img loading=\"lazy\" src=\"{href}\" alt=\"{title}\"></div>\
         <div class=\"sample-body\"><div class=\"title\">{title}</div>\
         <div class=\"params\"><code>{}</code></div>\
         <div class=\"controls\"><input class=\"url\" type=\"text\" readonly value=\"{href}\">\
         <a class=\"btn\" href=\"{href}\" target=\"_blank\" rel=\"noopener\">Open</a></div></div></div>\n",
        escape(query)
    )
}

/// Home page with four samples and a live URL builder
pub fn home(base_url: &str) -> String {
    let mut body = String::from("<h1>Drawer</h1>\n<h2>Samples</h2>\n<div class=\"grid\">\n");
    for (title, query) in SAMPLES {
        body.push_str(&sample(title, &format!("{}drawer?{}", base_url, query), query));
    }
    body.push_str("</div>\n");
    body.push_str(BUILDER);
    document("Drawer - simple SVG shapes", STYLES, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_samples() {
        let html = home("http://localhost:8081/");
        assert_eq!(html.matches("class=\"sample\"").count(), 4);
        assert!(html.contains(
            "src=\"http://localhost:8081/drawer?shape=1&amp;color=1&amp;width=200&amp;height=200&amp;stroke=2&amp;padding=0\""
        ));
        assert!(html.contains("id=\"preview\""));
    }

    #[test]
    fn test_home_builder() {
        let html = home("http://localhost:8081/");
        assert!(html.contains("<a id=\"open\" class=\"btn\" href=\"#\" target=\"_blank\""));
        assert!(html.contains("id=\"result-url\""));
        assert!(html.contains("<option value=\"4\">Star</option>"));
        assert!(html.trim_end().ends_with("</html>"));
        assert!(html.contains("</script>\n</body>"));
    }
}
