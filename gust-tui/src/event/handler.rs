//! 事件处理器

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use crate::message::Message;

/// 轮询事件，超时返回 None
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// 翻译终端事件；不关心的事件返回 None
pub fn handle_event(event: Event) -> Option<Message> {
    match event {
        // 只处理 Press，忽略 Release 和 Repeat
        // 避免 Windows 终端上按键重复
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(Message::Key(key)),
        Event::Resize(width, height) => Some(Message::Resize(width, height)),
        _ => None,
    }
}
