//! 按显示宽度处理字符串

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// 显示宽度
pub fn width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// 截断到不超过 `max` 列
pub fn truncate(s: &str, max: usize) -> String {
    if width(s) <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max.saturating_sub(1) {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// 右侧补空格到 `target` 列（超出则截断）
pub fn pad(s: &str, target: usize) -> String {
    let s = truncate(s, target);
    let fill = target.saturating_sub(width(&s));
    format!("{s}{}", " ".repeat(fill))
}

/// 按宽度折行，保留空行
pub fn wrap(line: &str, max: usize) -> Vec<String> {
    if max == 0 || width(line) <= max {
        return vec![line.to_string()];
    }
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut used = 0;
    for c in line.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max {
            rows.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(c);
        used += w;
    }
    rows.push(current);
    rows
}
