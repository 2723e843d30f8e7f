//! 页面标识与导航顺序

/// 页面标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageId {
    #[default]
    Workspace,
    Build,
    Flash,
    Monitor,
    Test,
    Artifacts,
    West,
    Config,
    Settings,
}

/// 侧边栏顺序，上下导航按此循环
pub const PAGE_ORDER: [PageId; 9] = [
    PageId::Workspace,
    PageId::Build,
    PageId::Flash,
    PageId::Monitor,
    PageId::Test,
    PageId::Artifacts,
    PageId::West,
    PageId::Config,
    PageId::Settings,
];

impl PageId {
    /// 在 `PAGE_ORDER` 中的位置
    pub fn index(self) -> usize {
        PAGE_ORDER.iter().position(|p| *p == self).unwrap_or(0)
    }

    /// 下一个页面（末尾回到开头）
    pub fn next(self) -> Self {
        PAGE_ORDER[(self.index() + 1) % PAGE_ORDER.len()]
    }

    /// 上一个页面（开头回到末尾）
    pub fn prev(self) -> Self {
        PAGE_ORDER[(self.index() + PAGE_ORDER.len() - 1) % PAGE_ORDER.len()]
    }

    /// 按位置取页面，越界返回 None
    pub fn nth(index: usize) -> Option<Self> {
        PAGE_ORDER.get(index).copied()
    }

    pub fn icon(self) -> &'static str {
        match self {
            PageId::Workspace => "⌂",
            PageId::Build => "⚒",
            PageId::Flash => "⚡",
            PageId::Monitor => "◉",
            PageId::Test => "✓",
            PageId::Artifacts => "▤",
            PageId::West => "⇄",
            PageId::Config => "⚙",
            PageId::Settings => "☰",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_n_times_returns_to_start() {
        for start in PAGE_ORDER {
            let mut page = start;
            for _ in 0..PAGE_ORDER.len() {
                page = page.next();
            }
            assert_eq!(page, start);
        }
    }

    #[test]
    fn test_prev_from_first_is_last() {
        assert_eq!(PageId::Workspace.prev(), PageId::Settings);
        assert_eq!(PageId::Settings.next(), PageId::Workspace);
        assert_eq!(PageId::Build.prev(), PageId::Workspace);
    }

    #[test]
    fn test_order_has_no_duplicates() {
        for (i, page) in PAGE_ORDER.iter().enumerate() {
            assert_eq!(page.index(), i);
        }
        assert_eq!(PageId::nth(8), Some(PageId::Settings));
        assert_eq!(PageId::nth(9), None);
    }
}
