//! 模糊筛选选择框
//!
//! 打开时独占键盘输入；Enter 产生 `Selected(value)`，Esc 产生 `Closed`。
//!
//! ╭── Select Project ──────────────╮
//! │                                │
//! │ > bli                          │
//! │                                │
//! │ > app/blinky                   │   ← 光标行
//! │   samples/basic/blinky         │
//! │                                │
//! │ (2/14 projects)  esc:close     │
//! │                                │
//! ╰────────────────────────────────╯

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span, Text};

use super::input::TextInput;
use crate::util::text;
use crate::view::theme::Styles;

/// 最多可见行数
pub const MAX_VISIBLE_ROWS: usize = 12;

const MIN_BOX_WIDTH: usize = 30;
const MAX_BOX_WIDTH: usize = 60;
/// 标题插入上边框的位置
const TITLE_OFFSET: usize = 3;

/// 选择项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub label: String,
    pub value: String,
    pub description: String,
}

/// 选择框产生的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    Selected(String),
    Closed,
}

/// 选择框用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Project,
    Board,
}

impl PickerKind {
    fn title(self) -> &'static str {
        match self {
            PickerKind::Project => "Select Project",
            PickerKind::Board => "Select Board",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            PickerKind::Project => "projects",
            PickerKind::Board => "boards",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Loading,
    Ready,
    Failed(String),
}

/// 选择框状态
#[derive(Debug, Clone)]
pub struct Picker {
    kind: PickerKind,
    items: Vec<PickerItem>,
    /// `items` 中匹配查询的下标
    filtered: Vec<usize>,
    cursor: usize,
    /// 可见窗口首行
    offset: usize,
    query: TextInput,
    status: Status,
    width: u16,
}

/// 大小写不敏感的子序列匹配
pub fn fuzzy_match(candidate: &str, query: &str) -> bool {
    let mut haystack = candidate.chars().flat_map(char::to_lowercase);
    query
        .chars()
        .flat_map(char::to_lowercase)
        .all(|q| haystack.any(|c| c == q))
}

impl Picker {
    /// 新建一个等待数据的选择框
    pub fn new(kind: PickerKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            filtered: Vec::new(),
            cursor: 0,
            offset: 0,
            query: TextInput::new(),
            status: Status::Loading,
            width: 0,
        }
    }

    pub fn kind(&self) -> PickerKind {
        self.kind
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }

    /// 填充数据
    pub fn set_items(&mut self, items: Vec<PickerItem>) {
        self.items = items;
        self.status = Status::Ready;
        self.refilter();
    }

    /// 数据加载失败
    pub fn set_error(&mut self, message: String) {
        self.status = Status::Failed(message);
    }

    /// 可用区域宽度
    pub fn set_width(&mut self, width: u16) {
        self.width = width;
    }

    #[cfg(test)]
    pub fn query(&self) -> &str {
        self.query.value()
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[cfg(test)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 当前筛选后的条目
    #[cfg(test)]
    pub fn filtered(&self) -> impl Iterator<Item = &PickerItem> {
        self.filtered.iter().map(|&i| &self.items[i])
    }

    pub fn selected(&self) -> Option<&PickerItem> {
        self.filtered.get(self.cursor).map(|&i| &self.items[i])
    }

    /// 处理按键
    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<PickerEvent> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Some(PickerEvent::Closed),
            KeyCode::Char('c') if ctrl => Some(PickerEvent::Closed),
            KeyCode::Enter => self
                .selected()
                .map(|item| PickerEvent::Selected(item.value.clone())),
            KeyCode::Up => {
                self.move_cursor(-1);
                None
            }
            KeyCode::Char('p') if ctrl => {
                self.move_cursor(-1);
                None
            }
            KeyCode::Down => {
                self.move_cursor(1);
                None
            }
            KeyCode::Char('n') if ctrl => {
                self.move_cursor(1);
                None
            }
            _ => {
                if self.query.handle_key(key) {
                    self.refilter();
                }
                None
            }
        }
    }

    fn visible_rows(&self) -> usize {
        MAX_VISIBLE_ROWS.min(self.filtered.len())
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let last = self.filtered.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        self.scroll_to_cursor();
    }

    /// 窗口只在光标越界时滑动
    fn scroll_to_cursor(&mut self) {
        let rows = self.visible_rows();
        if rows == 0 {
            self.offset = 0;
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + rows {
            self.offset = self.cursor + 1 - rows;
        }
        self.offset = self.offset.min(self.filtered.len() - rows);
    }

    fn refilter(&mut self) {
        let query = self.query.value();
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| fuzzy_match(&item.label, query))
            .map(|(i, _)| i)
            .collect();
        self.cursor = self.cursor.min(self.filtered.len().saturating_sub(1));
        self.offset = 0;
        self.scroll_to_cursor();
    }

    /// 渲染为带圆角边框的文本块
    pub fn view(&self) -> Text<'static> {
        let box_width = usize::from(self.width)
            .saturating_sub(4)
            .clamp(MIN_BOX_WIDTH, MAX_BOX_WIDTH);
        // 边框 + 左右各一列内边距
        let inner = box_width - 4;

        let mut body: Vec<Vec<Span<'static>>> = vec![Vec::new()];

        let mut input = vec![Span::styled("> ", Styles::accent())];
        input.extend(self.query.spans(true, "type to filter..."));
        body.push(input);
        body.push(Vec::new());

        match &self.status {
            Status::Loading => body.push(vec![Span::styled("  Loading...", Styles::muted())]),
            Status::Failed(e) => {
                body.push(vec![Span::styled(
                    text::truncate(&format!("  {e}"), inner),
                    Styles::error(),
                )]);
            }
            Status::Ready if self.filtered.is_empty() => {
                body.push(vec![Span::styled("  No matches", Styles::muted())]);
            }
            Status::Ready => {
                let end = self.offset + self.visible_rows();
                for (row, &i) in self.filtered[self.offset..end].iter().enumerate() {
                    let item = &self.items[i];
                    let label = text::truncate(&item.label, inner.saturating_sub(4));
                    let mut line = if self.offset + row == self.cursor {
                        vec![Span::styled(format!("> {label}"), Styles::accent())]
                    } else {
                        vec![Span::styled(format!("  {label}"), Styles::value())]
                    };
                    let used = text::width(&label) + 2;
                    if !item.description.is_empty() && used + 2 < inner {
                        let desc = text::truncate(&item.description, inner - used - 2);
                        line.push(Span::styled(format!("  {desc}"), Styles::muted()));
                    }
                    body.push(line);
                }
            }
        }

        body.push(Vec::new());
        body.push(vec![Span::styled(
            format!(
                "({}/{} {})  esc:close",
                self.filtered.len(),
                self.items.len(),
                self.kind.noun()
            ),
            Styles::muted(),
        )]);
        body.push(Vec::new());

        let border = Styles::accent();
        let mut lines = vec![Line::from(Span::styled(
            top_border(box_width, self.kind.title()),
            border,
        ))];
        for spans in body {
            let used: usize = spans.iter().map(|s| text::width(&s.content)).sum();
            let mut line = vec![Span::styled("│ ", border)];
            line.extend(spans);
            line.push(Span::raw(" ".repeat(inner.saturating_sub(used))));
            line.push(Span::styled(" │", border));
            lines.push(Line::from(line));
        }
        lines.push(Line::from(Span::styled(
            format!("╰{}╯", "─".repeat(box_width - 2)),
            border,
        )));
        Text::from(lines)
    }
}

/// 把 ` title ` 拼进上边框
fn top_border(box_width: usize, title: &str) -> String {
    let mut chars: Vec<char> = std::iter::once('╭')
        .chain(std::iter::repeat('─').take(box_width - 2))
        .chain(std::iter::once('╮'))
        .collect();
    let title: Vec<char> = format!(" {title} ").chars().collect();
    if TITLE_OFFSET + title.len() < chars.len() {
        chars.splice(TITLE_OFFSET..TITLE_OFFSET + title.len(), title);
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(labels: &[&str]) -> Vec<PickerItem> {
        labels
            .iter()
            .map(|l| PickerItem {
                label: (*l).to_string(),
                value: format!("v:{l}"),
                description: String::new(),
            })
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_query(picker: &mut Picker, q: &str) {
        for c in q.chars() {
            picker.handle_key(&key(KeyCode::Char(c)));
        }
    }

    fn rendered(picker: &Picker) -> Vec<String> {
        picker
            .view()
            .lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_fuzzy_match_is_ordered_subsequence() {
        assert!(fuzzy_match("apple_banana", "ab"));
        assert!(fuzzy_match("a_b", "ab"));
        assert!(!fuzzy_match("abc", "ba"));
        assert!(fuzzy_match("Samples/Blinky", "sBL"));
        assert!(fuzzy_match("anything", ""));
    }

    #[test]
    fn test_filter_clamps_cursor() {
        let mut picker = Picker::new(PickerKind::Project);
        picker.set_items(items(&["alpha", "beta", "gamma", "delta"]));
        for _ in 0..3 {
            picker.handle_key(&key(KeyCode::Down));
        }
        assert_eq!(picker.cursor(), 3);

        type_query(&mut picker, "ta");
        let labels: Vec<_> = picker.filtered().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, ["beta", "delta"]);
        assert_eq!(picker.cursor(), 1);

        type_query(&mut picker, "zz");
        assert_eq!(picker.filtered().count(), 0);
        assert_eq!(picker.cursor(), 0);
        assert_eq!(picker.handle_key(&key(KeyCode::Enter)), None);
    }

    #[test]
    fn test_cursor_stops_at_both_ends() {
        let mut picker = Picker::new(PickerKind::Board);
        picker.set_items(items(&["a", "b"]));
        picker.handle_key(&key(KeyCode::Up));
        assert_eq!(picker.cursor(), 0);
        for _ in 0..5 {
            picker.handle_key(&key(KeyCode::Down));
        }
        assert_eq!(picker.cursor(), 1);
    }

    #[test]
    fn test_window_slides_minimally() {
        let labels: Vec<String> = (0..20).map(|i| format!("item{i:02}")).collect();
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let mut picker = Picker::new(PickerKind::Project);
        picker.set_items(items(&refs));

        for _ in 0..MAX_VISIBLE_ROWS {
            picker.handle_key(&key(KeyCode::Down));
        }
        assert_eq!(picker.cursor(), 12);
        assert_eq!(picker.offset(), 1);

        // Moving up inside the window keeps it where it is.
        picker.handle_key(&key(KeyCode::Up));
        assert_eq!(picker.offset(), 1);

        for _ in 0..30 {
            picker.handle_key(&key(KeyCode::Down));
        }
        assert_eq!(picker.cursor(), 19);
        assert_eq!(picker.offset(), 20 - MAX_VISIBLE_ROWS);
    }

    #[test]
    fn test_enter_and_esc_events() {
        let mut picker = Picker::new(PickerKind::Project);
        picker.set_items(items(&["app/blinky", "app/sensor"]));
        picker.handle_key(&key(KeyCode::Down));

        assert_eq!(
            picker.handle_key(&key(KeyCode::Enter)),
            Some(PickerEvent::Selected("v:app/sensor".to_string()))
        );
        assert_eq!(picker.handle_key(&key(KeyCode::Esc)), Some(PickerEvent::Closed));
    }

    #[test]
    fn test_view_layout() {
        let mut picker = Picker::new(PickerKind::Project);
        picker.set_width(80);
        assert!(rendered(&picker).iter().any(|l| l.contains("Loading...")));

        picker.set_items(items(&["app/blinky", "app/sensor"]));
        let lines = rendered(&picker);

        assert!(lines[0].starts_with("╭──"));
        assert_eq!(&lines[0][TITLE_OFFSET * 3..TITLE_OFFSET * 3 + 16], " Select Project ");
        assert!(lines.iter().any(|l| l.contains("> type to filter...")));
        assert!(lines.iter().any(|l| l.contains("> app/blinky")));
        assert!(lines.iter().any(|l| l.contains("  app/sensor")));
        assert!(lines.iter().any(|l| l.contains("(2/2 projects)  esc:close")));

        let widths: Vec<_> = lines.iter().map(|l| text::width(l)).collect();
        assert!(widths.iter().all(|w| *w == 60), "{widths:?}");
    }

    #[test]
    fn test_view_no_matches_and_errors() {
        let mut picker = Picker::new(PickerKind::Board);
        picker.set_items(items(&["qemu_x86"]));
        type_query(&mut picker, "nrf");
        assert!(rendered(&picker).iter().any(|l| l.contains("No matches")));

        picker.set_error("west boards failed".to_string());
        assert!(rendered(&picker).iter().any(|l| l.contains("west boards failed")));
    }
}
