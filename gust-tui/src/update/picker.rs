//! 选择框：打开、填充、选中

use crossterm::event::KeyEvent;
use gust_core::GustConfig;

use super::dispatch;
use crate::backend::{self, Cmd};
use crate::message::{BroadcastEvent, Message};
use crate::model::{content_size, App, Picker, PickerEvent, PickerItem, PickerKind};

/// 打开选择框并发起数据加载
pub fn open(app: &mut App, kind: PickerKind) -> Vec<Cmd> {
    let mut picker = Picker::new(kind);
    picker.set_width(content_size(app.size.0, app.size.1).0);
    app.picker = Some(picker);

    let load = match kind {
        PickerKind::Project => backend::load_projects(&app.services.workspace),
        PickerKind::Board => backend::load_boards(&app.services.runner),
    };
    vec![load]
}

/// 把加载结果交给同类型的打开中的选择框
pub fn feed(app: &mut App, msg: &Message) {
    let Some(picker) = &mut app.picker else {
        return;
    };
    match (picker.kind(), msg) {
        (PickerKind::Project, Message::ProjectsLoaded(result)) => match result {
            Ok(projects) => picker.set_items(
                projects
                    .iter()
                    .map(|p| PickerItem {
                        label: p.path.clone(),
                        value: p.path.clone(),
                        description: String::new(),
                    })
                    .collect(),
            ),
            Err(e) => picker.set_error(e.clone()),
        },
        (PickerKind::Board, Message::BoardsLoaded(result)) => match result {
            Ok(boards) => picker.set_items(
                boards
                    .iter()
                    .map(|b| PickerItem {
                        label: b.name.clone(),
                        value: b.name.clone(),
                        description: b.architecture.clone(),
                    })
                    .collect(),
            ),
            Err(e) => picker.set_error(e.clone()),
        },
        _ => {}
    }
}

/// 选择框打开时的按键
pub fn handle_key(app: &mut App, key: &KeyEvent) -> Vec<Cmd> {
    let Some(picker) = &mut app.picker else {
        return Vec::new();
    };
    let kind = picker.kind();
    match picker.handle_key(key) {
        None => Vec::new(),
        Some(PickerEvent::Closed) => {
            app.picker = None;
            Vec::new()
        }
        Some(PickerEvent::Selected(value)) => {
            app.picker = None;
            select(app, kind, value)
        }
    }
}

/// 持久化选择并立即广播
fn select(app: &mut App, kind: PickerKind, value: String) -> Vec<Cmd> {
    let (saved, event) = match kind {
        PickerKind::Project => (
            app.services
                .config
                .update(&mut |c: &mut GustConfig| c.last_project.clone_from(&value)),
            BroadcastEvent::ProjectSelected(value.clone()),
        ),
        PickerKind::Board => (
            app.services
                .config
                .update(&mut |c: &mut GustConfig| c.default_board.clone_from(&value)),
            BroadcastEvent::BoardSelected(value.clone()),
        ),
    };
    if let Err(e) = saved {
        log::warn!("Failed to save selection {value}: {e}");
    }

    app.selection.apply(&event);
    dispatch(app, &Message::Broadcast(event))
}
