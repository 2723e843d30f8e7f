//! Update 层：消息路由
//!
//! 有模块结构：
//!     src/update/mod.rs
//!         mod navigation;     // 侧边栏按键（上下、数字跳转、进入内容区）
//!         mod picker;         // 选择框的打开、数据填充与选中
//!
//!         pub fn update(app: &mut App, msg: Message) -> Vec<Cmd>
//!
//! 按键按以下优先级处理，命中即停：
//!
//!     1. 选择框打开      → 全部交给选择框
//!     2. 页面占用输入    → 除 ctrl+c 外全部交给页面
//!     3. 帮助浮层        → 任意键关闭
//!     4. 全局快捷键      → q / ctrl+c / ? / tab
//!     5. 侧边栏          → p / b / 1-9 / ↑↓ / enter
//!     6. 内容区          → ← 回到侧边栏，其余交给当前页面
//!
//! 非按键消息（Tick、命令结果、加载结果、广播）投递给所有页面，
//! 与焦点无关。返回的 Cmd 由主循环调度。

mod navigation;
mod picker;

use crossterm::event::KeyEvent;

use crate::backend::Cmd;
use crate::event::keymap::DefaultKeymap;
use crate::message::Message;
use crate::model::{content_size, App, FocusArea};

/// 处理一条消息，返回需要调度的后台任务
pub fn update(app: &mut App, msg: Message) -> Vec<Cmd> {
    match msg {
        Message::Key(key) => handle_key(app, &key),
        Message::Resize(width, height) => {
            resize(app, width, height);
            Vec::new()
        }
        Message::Broadcast(ref event) => {
            app.selection.apply(event);
            dispatch(app, &msg)
        }
        Message::ProjectsLoaded(_) | Message::BoardsLoaded(_) => {
            picker::feed(app, &msg);
            dispatch(app, &msg)
        }
        Message::CommandResult(ref result) => {
            log::trace!(
                "Command result {} (exit code: {})",
                result.request_id,
                result.exit_code
            );
            dispatch(app, &msg)
        }
        _ => dispatch(app, &msg),
    }
}

/// 投递给所有页面
pub(crate) fn dispatch(app: &mut App, msg: &Message) -> Vec<Cmd> {
    app.pages
        .iter_mut()
        .filter_map(|page| page.update(msg))
        .collect()
}

fn resize(app: &mut App, width: u16, height: u16) {
    app.size = (width, height);
    let (content_width, content_height) = content_size(width, height);
    for page in app.pages.iter_mut() {
        page.set_size(content_width, content_height);
    }
    if let Some(picker) = &mut app.picker {
        picker.set_width(content_width);
    }
}

fn handle_key(app: &mut App, key: &KeyEvent) -> Vec<Cmd> {
    // 1. 选择框独占
    if app.picker.is_some() {
        return picker::handle_key(app, key);
    }

    // 2. 输入占用：只保留强制退出
    if app.focus.is_content() && app.input_captured() {
        if DefaultKeymap::FORCE_QUIT.matches(key) {
            app.should_quit = true;
            return Vec::new();
        }
        return to_active_page(app, key);
    }

    // 3. 帮助浮层
    if app.show_help {
        if DefaultKeymap::FORCE_QUIT.matches(key) {
            app.should_quit = true;
        }
        app.show_help = false;
        return Vec::new();
    }

    // 4. 全局
    if DefaultKeymap::FORCE_QUIT.matches(key) || DefaultKeymap::QUIT.matches(key) {
        app.should_quit = true;
        return Vec::new();
    }
    if DefaultKeymap::HELP.matches(key) {
        app.show_help = true;
        return Vec::new();
    }

    match app.focus {
        // 5. 侧边栏
        FocusArea::Sidebar => navigation::handle_key(app, key),
        // 6. 内容区
        FocusArea::Content => {
            if DefaultKeymap::FOCUS_SIDEBAR.matches(key) {
                app.focus = FocusArea::Sidebar;
                return Vec::new();
            }
            to_active_page(app, key)
        }
    }
}

fn to_active_page(app: &mut App, key: &KeyEvent) -> Vec<Cmd> {
    app.pages
        .get_mut(app.active)
        .update(&Message::Key(*key))
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use gust_core::{ConfigService, GustConfig};
    use ratatui::text::Text;

    use super::*;
    use crate::backend;
    use crate::message::BroadcastEvent;
    use crate::model::{PageId, PickerKind};
    use crate::pages::testing::{harness, Harness};
    use crate::pages::{InputCapture, KeyHint, Page, PageRegistry};

    /// 记录收到的消息
    #[derive(Default)]
    struct Log {
        keys: Vec<KeyCode>,
        broadcasts: Vec<BroadcastEvent>,
        ticks: usize,
        size: (u16, u16),
    }

    struct StubPage {
        log: Rc<RefCell<Log>>,
        capture: bool,
    }

    impl Page for StubPage {
        fn init(&mut self) -> Option<Cmd> {
            None
        }

        fn update(&mut self, msg: &Message) -> Option<Cmd> {
            let mut log = self.log.borrow_mut();
            match msg {
                Message::Key(key) => {
                    log.keys.push(key.code);
                    // 'i' 进入输入模式，Esc 退出
                    match key.code {
                        KeyCode::Char('i') => self.capture = true,
                        KeyCode::Esc => self.capture = false,
                        _ => {}
                    }
                }
                Message::Broadcast(event) => log.broadcasts.push(event.clone()),
                Message::Tick => log.ticks += 1,
                _ => {}
            }
            None
        }

        fn view(&self) -> Text<'static> {
            Text::default()
        }

        fn name(&self) -> &'static str {
            "Stub"
        }

        fn short_help(&self) -> Vec<KeyHint> {
            Vec::new()
        }

        fn set_size(&mut self, width: u16, height: u16) {
            self.log.borrow_mut().size = (width, height);
        }

        fn as_input_capture(&self) -> Option<&dyn InputCapture> {
            Some(self)
        }
    }

    impl InputCapture for StubPage {
        fn input_captured(&self) -> bool {
            self.capture
        }
    }

    struct Fixture {
        app: App,
        logs: Vec<Rc<RefCell<Log>>>,
        h: Harness,
    }

    impl Fixture {
        fn log(&self, id: PageId) -> std::cell::Ref<'_, Log> {
            self.logs[id.index()].borrow()
        }

        fn press(&mut self, code: KeyCode) -> Vec<Cmd> {
            update(&mut self.app, Message::Key(KeyEvent::new(code, KeyModifiers::NONE)))
        }

        fn ctrl(&mut self, c: char) -> Vec<Cmd> {
            update(
                &mut self.app,
                Message::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)),
            )
        }
    }

    fn fixture() -> Fixture {
        let h = harness(GustConfig::default());
        let mut logs = Vec::new();
        let pages = PageRegistry::from_fn(|_| -> Box<dyn Page> {
            let log = Rc::new(RefCell::new(Log::default()));
            logs.push(log.clone());
            Box::new(StubPage {
                log,
                capture: false,
            })
        });
        let app = App::with_pages(h.services.clone(), &GustConfig::default(), pages);
        Fixture { app, logs, h }
    }

    #[test]
    fn test_keys_reach_page_only_with_content_focus() {
        let mut f = fixture();
        f.press(KeyCode::Char('x'));
        assert!(f.log(PageId::Workspace).keys.is_empty());

        f.press(KeyCode::Enter);
        assert_eq!(f.app.focus, FocusArea::Content);
        f.press(KeyCode::Char('x'));
        assert_eq!(f.log(PageId::Workspace).keys, [KeyCode::Char('x')]);
        assert!(f.log(PageId::Build).keys.is_empty());
    }

    #[test]
    fn test_non_key_messages_reach_every_page() {
        let mut f = fixture();
        update(&mut f.app, Message::Tick);
        update(
            &mut f.app,
            Message::Broadcast(BroadcastEvent::ShieldSelected("nrf7002ek".to_string())),
        );

        for id in crate::model::PAGE_ORDER {
            assert_eq!(f.log(id).ticks, 1);
            assert_eq!(f.log(id).broadcasts.len(), 1);
        }
        assert_eq!(f.app.selection.shield, "nrf7002ek");
    }

    #[test]
    fn test_sidebar_navigation_wraps_and_jumps() {
        let mut f = fixture();
        f.press(KeyCode::Up);
        assert_eq!(f.app.active, PageId::Settings);
        f.press(KeyCode::Char('j'));
        assert_eq!(f.app.active, PageId::Workspace);

        f.press(KeyCode::Char('3'));
        assert_eq!(f.app.active, PageId::Flash);
        assert!(f.app.focus.is_sidebar());
        f.press(KeyCode::Char('0'));
        assert_eq!(f.app.active, PageId::Flash);
    }

    #[test]
    fn test_focus_moves_between_panels() {
        let mut f = fixture();
        f.press(KeyCode::Tab);
        assert!(f.app.focus.is_content());

        // 内容区的 Tab 属于页面
        f.press(KeyCode::Tab);
        assert!(f.app.focus.is_content());
        assert_eq!(f.log(PageId::Workspace).keys, [KeyCode::Tab]);

        f.press(KeyCode::Left);
        assert!(f.app.focus.is_sidebar());
        f.press(KeyCode::Right);
        assert!(f.app.focus.is_content());
    }

    #[test]
    fn test_input_capture_passes_globals_through() {
        let mut f = fixture();
        f.press(KeyCode::Enter);
        f.press(KeyCode::Char('i'));
        assert!(f.app.input_captured());

        f.press(KeyCode::Char('q'));
        f.press(KeyCode::Char('?'));
        f.press(KeyCode::Left);
        assert!(!f.app.should_quit);
        assert!(!f.app.show_help);
        assert!(f.app.focus.is_content());
        assert_eq!(
            f.log(PageId::Workspace).keys,
            [
                KeyCode::Char('i'),
                KeyCode::Char('q'),
                KeyCode::Char('?'),
                KeyCode::Left
            ]
        );

        f.ctrl('c');
        assert!(f.app.should_quit);
    }

    #[test]
    fn test_quit_and_help() {
        let mut f = fixture();
        f.press(KeyCode::Char('?'));
        assert!(f.app.show_help);
        f.press(KeyCode::Char('q'));
        assert!(!f.app.should_quit);
        assert!(!f.app.show_help);

        f.press(KeyCode::Char('q'));
        assert!(f.app.should_quit);
    }

    #[test]
    fn test_picker_is_exclusive() {
        let mut f = fixture();
        let cmds = f.press(KeyCode::Char('p'));
        assert_eq!(cmds.len(), 1);
        assert_eq!(f.app.picker.as_ref().map(|p| p.kind()), Some(PickerKind::Project));

        f.press(KeyCode::Char('q'));
        f.press(KeyCode::Down);
        assert!(!f.app.should_quit);
        assert_eq!(f.app.active, PageId::Workspace);
        assert_eq!(f.app.picker.as_ref().map(|p| p.query().to_string()), Some("q".to_string()));

        f.ctrl('c');
        assert!(f.app.picker.is_none());
        assert!(!f.app.should_quit);
    }

    #[test]
    fn test_picker_only_opens_from_sidebar() {
        let mut f = fixture();
        f.press(KeyCode::Enter);
        let cmds = f.press(KeyCode::Char('p'));
        assert!(cmds.is_empty());
        assert!(f.app.picker.is_none());
        assert_eq!(f.log(PageId::Workspace).keys, [KeyCode::Char('p')]);
    }

    #[test]
    fn test_project_selection_persists_and_broadcasts() {
        use gust_core::west::Project;

        let mut f = fixture();
        f.press(KeyCode::Char('p'));
        update(
            &mut f.app,
            Message::ProjectsLoaded(Ok(vec![
                Project {
                    name: "blinky".to_string(),
                    path: "samples/basic/blinky".to_string(),
                },
                Project {
                    name: "app".to_string(),
                    path: "app".to_string(),
                },
            ])),
        );
        for c in "blk".chars() {
            f.press(KeyCode::Char(c));
        }
        f.press(KeyCode::Enter);

        assert!(f.app.picker.is_none());
        assert_eq!(f.app.selection.project, "samples/basic/blinky");
        assert_eq!(f.h.config.load().unwrap().last_project, "samples/basic/blinky");
        let expected = BroadcastEvent::ProjectSelected("samples/basic/blinky".to_string());
        for id in crate::model::PAGE_ORDER {
            assert_eq!(f.log(id).broadcasts, [expected.clone()]);
        }
    }

    #[test]
    fn test_board_picker_reports_load_error() {
        let mut f = fixture();
        f.press(KeyCode::Char('b'));
        update(&mut f.app, Message::BoardsLoaded(Err("west not found".to_string())));

        let picker = f.app.picker.as_ref().unwrap();
        assert!(!picker.is_loading());
        f.press(KeyCode::Enter);
        assert!(f.app.picker.is_some());
        f.press(KeyCode::Esc);
        assert!(f.app.picker.is_none());
        assert!(f.h.config.load().unwrap().default_board.is_empty());
    }

    #[test]
    fn test_resize_reaches_every_page() {
        let mut f = fixture();
        update(&mut f.app, Message::Resize(100, 40));
        for id in crate::model::PAGE_ORDER {
            assert_eq!(f.log(id).size, (76, 36));
        }
    }

    #[test]
    fn test_emitted_broadcast_updates_selection() {
        let mut f = fixture();
        let msg = futures::executor::block_on(backend::emit(Message::Broadcast(
            BroadcastEvent::BoardSelected("qemu_x86".to_string()),
        )));
        update(&mut f.app, msg);
        assert_eq!(f.app.selection.board, "qemu_x86");
    }

    /// 执行返回的 Cmd 并把结果继续送回 update，直到没有后续任务
    fn settle(app: &mut App, cmds: Vec<Cmd>) {
        let mut pending = cmds;
        while let Some(cmd) = pending.pop() {
            let msg = futures::executor::block_on(cmd);
            pending.extend(update(app, msg));
        }
    }

    fn press(app: &mut App, code: KeyCode) -> Vec<Cmd> {
        update(app, Message::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn test_settings_save_keeps_port_chosen_on_monitor() {
        use gust_core::west::PortInfo;

        use crate::pages::testing::plain;

        let h = harness(GustConfig::default());
        let mut app = App::new(h.services.clone(), &GustConfig::default());
        update(&mut app, Message::Resize(100, 40));
        update(
            &mut app,
            Message::PortsLoaded(Ok(vec![
                PortInfo {
                    name: "/dev/ttyACM0".to_string(),
                    is_usb: false,
                },
                PortInfo {
                    name: "/dev/ttyUSB0".to_string(),
                    is_usb: true,
                },
            ])),
        );

        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.active, PageId::Monitor);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        let cmds = press(&mut app, KeyCode::Enter);
        settle(&mut app, cmds);
        assert_eq!(h.config.load().unwrap().serial_port, "/dev/ttyUSB0");
        assert!(plain(app.pages.get(PageId::Settings)).contains("/dev/ttyUSB0"));

        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.active, PageId::Settings);
        press(&mut app, KeyCode::Enter);
        let cmds = press(&mut app, KeyCode::Char('s'));
        settle(&mut app, cmds);

        assert_eq!(h.config.load().unwrap().serial_port, "/dev/ttyUSB0");
    }

    #[test]
    fn test_baud_rate_edit_reaches_monitor() {
        use crate::pages::testing::plain;

        let h = harness(GustConfig::default());
        let mut app = App::new(h.services.clone(), &GustConfig::default());
        update(&mut app, Message::Resize(100, 40));

        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Enter);
        for _ in 0..3 {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Enter);
        update(
            &mut app,
            Message::Key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)),
        );
        for c in "57600".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        let cmds = press(&mut app, KeyCode::Enter);
        settle(&mut app, cmds);

        assert_eq!(h.config.load().unwrap().serial_baud_rate, 57_600);
        assert!(plain(app.pages.get(PageId::Monitor)).contains("Baud rate: 57600"));
    }
}
