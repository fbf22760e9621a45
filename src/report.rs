//! Report rendering: the HTML email body and the console summary.

use std::fmt::Write as _;

use crate::market::MarketRow;
use crate::news::SelectedArticle;

const STYLE: &str = "
      body {
        font-family: Arial, sans-serif;
        line-height: 1.6;
      }
      table {
        border-collapse: collapse;
        width: 100%;
      }
      th, td {
        border: 1px solid #dddddd;
        text-align: left;
        padding: 8px;
      }
      tr:nth-child(even) {
        background-color: #f9f9f9;
      }
      th {
        background-color: #4CAF50;
        color: white;
      }
";

/// Render the full HTML document for the email body.
pub fn render_html(headers: &[&str], rows: &[MarketRow], articles: &[SelectedArticle]) -> String {
    format!(
        "<html>\n  <head>\n    <style>{STYLE}    </style>\n  </head>\n  <body>\n    \
         <h2>⚡ Morning Energy Market Update</h2>\n    {table}\n    <br>\n    {news}\n    \
         <p>Have a great trading day! 🚀</p>\n  </body>\n</html>\n",
        table = html_table(headers, rows),
        news = html_news(articles),
    )
}

fn html_table(headers: &[&str], rows: &[MarketRow]) -> String {
    let mut out = String::from("<table>\n<thead>\n<tr>");
    for header in headers {
        let _ = write!(out, "<th>{}</th>", escape_html(header));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row.cells() {
            let _ = write!(out, "<td>{}</td>", escape_html(cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>");
    out
}

fn html_news(articles: &[SelectedArticle]) -> String {
    let mut out = String::from("<h3>📰 Suggested Daily Reads</h3><ul>");
    for article in articles {
        let _ = write!(
            out,
            "<li><a href=\"{}\" target=\"_blank\">{}</a> — <em>{}</em></li>",
            escape_html(&article.url),
            escape_html(&article.title),
            escape_html(&article.source),
        );
    }
    out.push_str("</ul>");
    out
}

/// Minimal escaping for text and double-quoted attribute values.
pub fn escape_html(text: &str) -> String {
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

/// Box-drawn plain text table for stdout.
pub fn render_console(headers: &[&str], rows: &[MarketRow]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };
    let line = |cells: &[&str]| {
        let mut line = String::from("|");
        for (cell, width) in cells.iter().zip(&widths) {
            let pad = width - cell.chars().count();
            let _ = write!(line, " {cell}{} |", " ".repeat(pad));
        }
        line
    };

    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{}", line(headers));
    let _ = writeln!(out, "{rule}");
    for row in rows {
        let _ = writeln!(out, "{}", line(&row.cells()));
    }
    let _ = writeln!(out, "{rule}");
    out
}

/// One `- title (source)` line per article.
pub fn console_articles(articles: &[SelectedArticle]) -> String {
    articles
        .iter()
        .map(|a| format!("- {} ({})\n", a.title, a.source))
        .collect()
}
