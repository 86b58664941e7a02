//! HTML page rendering.
//!
//! Produces the landing page and the analysis page served by the HTTP
//! server. The analysis page doubles as the `--format html` report.

use crate::analysis::{giver_ranking, yearly_totals};
use crate::models::{format_yen, AggregateResult};

const STYLE: &str = r#"
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
        font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
        background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
        min-height: 100vh;
        padding: 20px;
    }
    .container { max-width: 1200px; margin: 0 auto; }
    .header { text-align: center; color: white; margin-bottom: 40px; padding: 20px; }
    .card {
        background: white;
        border-radius: 15px;
        padding: 30px;
        margin-bottom: 30px;
        box-shadow: 0 10px 30px rgba(0,0,0,0.2);
    }
    .stats-grid {
        display: grid;
        grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
        gap: 20px;
    }
    .stat-box {
        background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
        color: white;
        padding: 20px;
        border-radius: 10px;
        text-align: center;
    }
    .stat-box p { font-size: 2em; font-weight: bold; }
    table { width: 100%; border-collapse: collapse; margin-top: 20px; }
    th, td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }
    th { background-color: #667eea; color: white; }
    button, .button {
        background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
        color: white;
        border: none;
        padding: 15px 40px;
        font-size: 1.1em;
        border-radius: 50px;
        cursor: pointer;
        font-weight: bold;
        text-decoration: none;
        display: inline-block;
    }
    .bonus-button { background: linear-gradient(135deg, #f093fb 0%, #f5576c 100%); }
    #bonus-result { margin-top: 30px; font-size: 1.5em; font-weight: bold; color: #f5576c; }
"#;

/// Escape text for safe inclusion in HTML.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());

    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }

    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<div class=\"container\">\n{}</div>\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

/// Render the landing page with links to the analysis and the bonus draw.
pub fn render_home_page(title: &str) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "<div class=\"header\"><h1>🎍 {} 🎍</h1></div>\n",
        escape_html(title)
    ));

    body.push_str("<div class=\"card\" style=\"text-align: center;\">\n");
    body.push_str("<h2>📊 メニュー</h2><br>\n");
    body.push_str("<a class=\"button\" href=\"/analyze\">📈 データ分析を見る</a>\n");
    body.push_str("<a class=\"button\" href=\"/api/data\">💾 生データを見る (JSON)</a>\n");
    body.push_str("</div>\n");

    body.push_str("<div class=\"card\" style=\"text-align: center;\">\n");
    body.push_str("<h2>🎁 ボーナスお年玉をもらう!</h2><br>\n");
    body.push_str("<button class=\"bonus-button\" onclick=\"getBonus()\">🎊 ボーナスをもらう!</button>\n");
    body.push_str("<div id=\"bonus-result\"></div>\n");
    body.push_str("</div>\n");

    body.push_str(
        "<script>\n\
         function getBonus() {\n\
         \x20   fetch('/api/bonus')\n\
         \x20       .then(response => response.json())\n\
         \x20       .then(data => {\n\
         \x20           document.getElementById('bonus-result').textContent =\n\
         \x20               '🎉 ' + data.amount.toLocaleString() + '円のボーナスをゲット!';\n\
         \x20       });\n\
         }\n\
         </script>\n",
    );

    page(title, &body)
}

/// Render the analysis page for an aggregate.
pub fn render_analysis_page(title: &str, result: &AggregateResult) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        "<div class=\"header\"><h1>📊 {}</h1></div>\n",
        escape_html(title)
    ));

    body.push_str("<div class=\"card\">\n<h2>💰 統計サマリー</h2>\n<div class=\"stats-grid\">\n");
    let stats = [
        ("合計金額", format_yen(result.total)),
        ("平均金額", format!("¥{:.0}", result.average)),
        ("最高額", format_yen(result.max)),
        ("最低額", format_yen(result.min)),
        ("データ件数", format!("{}件", result.count)),
    ];
    for (label, value) in stats {
        body.push_str(&format!(
            "<div class=\"stat-box\"><h3>{}</h3><p>{}</p></div>\n",
            label, value
        ));
    }
    body.push_str("</div>\n</div>\n");

    body.push_str("<div class=\"card\">\n<h2>👥 贈り主別合計</h2>\n<table>\n");
    body.push_str("<thead><tr><th>贈り主</th><th>合計金額</th></tr></thead>\n<tbody>\n");
    for entry in giver_ranking(result) {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            escape_html(&entry.giver),
            format_yen(entry.total)
        ));
    }
    body.push_str("</tbody>\n</table>\n</div>\n");

    body.push_str("<div class=\"card\">\n<h2>🗓 年別合計</h2>\n<table>\n");
    body.push_str("<thead><tr><th>年</th><th>合計金額</th><th>件数</th></tr></thead>\n<tbody>\n");
    for year in yearly_totals(&result.records) {
        body.push_str(&format!(
            "<tr><td>{}年</td><td>{}</td><td>{}</td></tr>\n",
            year.year,
            format_yen(year.total),
            year.count
        ));
    }
    body.push_str("</tbody>\n</table>\n</div>\n");

    body.push_str("<div class=\"card\">\n<h2>📅 年別データ</h2>\n<table>\n");
    body.push_str("<thead><tr><th>年</th><th>金額</th><th>贈り主</th></tr></thead>\n<tbody>\n");
    for record in &result.records {
        body.push_str(&format!(
            "<tr><td>{}年</td><td>{}</td><td>{}</td></tr>\n",
            record.year,
            format_yen(record.amount),
            escape_html(&record.giver)
        ));
    }
    body.push_str("</tbody>\n</table>\n</div>\n");

    body.push_str("<div style=\"text-align: center;\"><a class=\"button\" href=\"/\">🏠 ホームに戻る</a></div>\n");

    page(title, &body)
}
