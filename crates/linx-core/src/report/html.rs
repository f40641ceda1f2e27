//! HTML 输出：结果表格 + 前端粗分类过滤 + JSON 导出
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::error::ScanError;
use crate::types::ResultSet;

const HEAD: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{TITLE}} - linx report</title>
<style>
  body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; color: #333; max-width: 1200px; margin: 2% auto 5%; padding: 0 20px; }
  header { font-size: 1.4em; border-bottom: 1px solid #ddd; padding-bottom: 12px; margin-bottom: 24px; word-break: break-all; }
  .toolbar { display: flex; gap: 12px; align-items: center; margin-bottom: 16px; }
  table { width: 100%; table-layout: fixed; border-collapse: collapse; }
  th, td { padding: 8px 10px; text-align: left; border-bottom: 1px solid #eee; vertical-align: top; }
  th { background: #f5f5f5; }
  td.url { word-break: break-all; width: 35%; }
  td.kind { width: 80px; }
  pre { margin: 0; white-space: pre-wrap; word-wrap: break-word; font-size: 0.85em; background: #f8f9fa; padding: 6px; }
  .badge { font-size: 0.8em; padding: 2px 6px; border-radius: 4px; background: #e0e0e0; }
  .badge.api { background: #ffe0b2; } .badge.external { background: #c8e6c9; }
  .badge.static { background: #e1bee7; } .badge.relative { background: #bbdefb; }
  footer { margin-top: 40px; padding-top: 12px; border-top: 1px solid #ddd; color: #888; }
</style>
</head>
<body>
"#;

const TAIL: &str = r#"<footer>created with linx</footer>
<script>
(function () {
  var data = JSON.parse(document.getElementById('linx-data').textContent);
  function classify(url) {
    if (/\/api\/|\/v\d+\/|graphql/i.test(url)) return 'api';
    if (/^(https?:)?\/\//i.test(url)) return 'external';
    if (/\.(html?|json|xml|txt|php|aspx?|jsp|action)([?#].*)?$/i.test(url)) return 'static';
    return 'relative';
  }
  var rows = document.querySelectorAll('#results tbody tr');
  rows.forEach(function (row) {
    var kind = classify(row.getAttribute('data-url'));
    row.setAttribute('data-kind', kind);
    var badge = row.querySelector('.badge');
    badge.textContent = kind;
    badge.className = 'badge ' + kind;
  });
  document.getElementById('filter').addEventListener('change', function (e) {
    var want = e.target.value;
    var shown = 0;
    rows.forEach(function (row) {
      var visible = want === 'all' || row.getAttribute('data-kind') === want;
      row.style.display = visible ? '' : 'none';
      if (visible) shown++;
    });
    document.getElementById('count').textContent = shown;
  });
  document.getElementById('export').addEventListener('click', function () {
    var blob = new Blob([JSON.stringify(data, null, 2)], { type: 'application/json' });
    var a = document.createElement('a');
    a.href = URL.createObjectURL(blob);
    a.download = 'linx-results.json';
    a.click();
    URL.revokeObjectURL(a.href);
  });
})();
</script>
</body>
</html>
"#;

pub(super) fn render_and_save(result: &ResultSet) -> Result<(), ScanError> {
    let dest = result.output_destination.as_str();
    let page = render_page(result).map_err(|e| ScanError::render(dest, e))?;

    let file = File::create(dest).map_err(|e| ScanError::render(dest, e))?;
    let mut out = BufWriter::new(file);
    out.write_all(page.as_bytes()).map_err(|e| ScanError::render(dest, e))?;
    out.flush().map_err(|e| ScanError::render(dest, e))?;

    tracing::info!(destination = dest, "results saved");
    Ok(())
}

fn render_page(result: &ResultSet) -> Result<String, serde_json::Error> {
    let target = escape_html(&result.target);
    let mut html = HEAD.replace("{{TITLE}}", &target);

    html.push_str(&format!("<header>{}</header>\n", target));
    html.push_str("<div class=\"toolbar\">\n");
    html.push_str("  <label>Type <select id=\"filter\"><option value=\"all\">all</option><option value=\"api\">api</option><option value=\"static\">static</option><option value=\"external\">external</option><option value=\"relative\">relative</option></select></label>\n");
    html.push_str(&format!("  <span><span id=\"count\">{}</span> possible urls</span>\n", result.findings.len()));
    html.push_str("  <button id=\"export\" type=\"button\">Export JSON</button>\n</div>\n");

    html.push_str("<table id=\"results\">\n<thead><tr><th>URL</th><th>Type</th><th>Location in file</th></tr></thead>\n<tbody>\n");
    for f in &result.findings {
        let url = escape_html(&f.url);
        html.push_str(&format!(
            "<tr data-url=\"{url}\"><td class=\"url\">{url}</td><td class=\"kind\"><span class=\"badge\"></span></td><td><pre><code>{}</code></pre></td></tr>\n",
            escape_html(&f.context)
        ));
    }
    html.push_str("</tbody>\n</table>\n");

    // 导出数据内嵌为 JSON；转义 `</` 以免提前闭合 script 标签
    let data = serde_json::to_string(result)?.replace("</", "<\\/");
    html.push_str(&format!("<script id=\"linx-data\" type=\"application/json\">{}</script>\n", data));
    html.push_str(TAIL);
    Ok(html)
}

/// 转义 HTML 特殊字符
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
