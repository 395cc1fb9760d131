//! 生成内容的格式化
//!
//! 把模型返回的类 Markdown 文本转换成轻量 HTML，以及从 HTML 还原纯文本。

use once_cell::sync::Lazy;
use regex::Regex;

/// 换行标记
pub const LINE_BREAK: &str = "<br>";

static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
// 斜体要求非空内容，避免落单的 `**` 被吞成空 <em>
static RE_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static RE_HEADINGS: Lazy<[(Regex, &'static str); 3]> = Lazy::new(|| {
    [
        (Regex::new(r"^# (.*)$").unwrap(), "h3"),
        (Regex::new(r"^## (.*)$").unwrap(), "h4"),
        (Regex::new(r"^### (.*)$").unwrap(), "h5"),
    ]
});
static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// 转义 HTML 特殊字符
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// 格式化生成内容
///
/// 先整体转义，再逐行处理：`**粗体**`，然后 `*斜体*`，最后行首标题；
/// 行之间用 `<br>` 连接。强调不跨行，保证与标题标签正确嵌套。
/// 粗体必须先于斜体，否则 `**` 会被斜体规则拆开。
pub fn format_content(content: &str) -> String {
    escape_html(content)
        .split('\n')
        .map(format_line)
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

fn format_line(line: &str) -> String {
    let line = RE_BOLD.replace_all(line, "<strong>$1</strong>");
    let line = RE_ITALIC.replace_all(&line, "<em>$1</em>");
    format_heading(&line)
}

/// 行首的 `# `/`## `/`### ` 转为 h3/h4/h5
fn format_heading(line: &str) -> String {
    for (pattern, tag) in RE_HEADINGS.iter() {
        if let Some(caps) = pattern.captures(line) {
            return format!("<{tag}>{}</{tag}>", &caps[1]);
        }
    }
    line.to_string()
}

/// 从渲染后的 HTML 提取纯文本（用于复制）
pub fn to_plain_text(html: &str) -> String {
    let text = html.replace(LINE_BREAK, "\n");
    let text = RE_TAG.replace_all(&text, "");
    unescape_html(&text).trim().to_string()
}
