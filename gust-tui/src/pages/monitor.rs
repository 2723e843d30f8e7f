//! 串口监视页面
//!
//! 只负责端口发现与选择；选中的端口写入配置并记录一次会话

use chrono::Utc;
use crossterm::event::KeyEvent;
use gust_core::west::PortInfo;
use gust_core::{GustConfig, SerialLog, DEFAULT_BAUD_RATE};
use ratatui::text::{Line, Span, Text};

use super::{KeyHint, Page};
use crate::backend::{self, Cmd, Services};
use crate::event::keymap::{any, DefaultKeymap};
use crate::message::Message;
use crate::view::theme::Styles;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Ports {
    Loading,
    Loaded(Vec<PortInfo>),
    Failed(String),
}

pub struct MonitorPage {
    services: Services,
    ports: Ports,
    cursor: usize,
    /// 当前选中的端口
    port: String,
    baud_rate: u32,
    message: Option<String>,
}

impl MonitorPage {
    pub fn new(services: Services, config: &GustConfig) -> Self {
        Self {
            services,
            ports: Ports::Loading,
            cursor: 0,
            port: config.serial_port.clone(),
            baud_rate: baud_or_default(config.serial_baud_rate),
            message: None,
        }
    }

    fn port_count(&self) -> usize {
        match &self.ports {
            Ports::Loaded(ports) => ports.len(),
            _ => 0,
        }
    }

    /// 其他页面改了串口设置后重新读取
    fn reload_config(&mut self) {
        match self.services.config.load() {
            Ok(config) => {
                self.port = config.serial_port;
                self.baud_rate = baud_or_default(config.serial_baud_rate);
            }
            Err(e) => log::warn!("Failed to reload config: {e}"),
        }
    }

    fn select(&mut self) -> Option<Cmd> {
        let Ports::Loaded(ports) = &self.ports else {
            return None;
        };
        let Some(port) = ports.get(self.cursor) else {
            return None;
        };
        let name = port.name.clone();

        match self
            .services
            .config
            .update(&mut |c: &mut GustConfig| c.serial_port.clone_from(&name))
        {
            Ok(config) => self.baud_rate = baud_or_default(config.serial_baud_rate),
            Err(e) => {
                log::warn!("Failed to save serial port: {e}");
                self.message = Some(format!("Config save failed: {e}"));
                return None;
            }
        }

        let record = SerialLog {
            port: name.clone(),
            baud_rate: self.baud_rate,
            timestamp: Utc::now(),
        };
        if let Err(e) = self.services.store.add_serial_log(record) {
            log::warn!("Failed to record serial session: {e}");
        }
        self.message = Some(format!("Selected {name} @ {}", self.baud_rate));
        self.port = name;
        Some(backend::emit(Message::Persisted))
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Cmd> {
        if DefaultKeymap::REFRESH.matches(key) {
            self.ports = Ports::Loading;
            return Some(backend::load_ports());
        }
        if any(&DefaultKeymap::UP, key) {
            self.cursor = self.cursor.saturating_sub(1);
        } else if any(&DefaultKeymap::DOWN, key) {
            if self.cursor + 1 < self.port_count() {
                self.cursor += 1;
            }
        } else if DefaultKeymap::CONFIRM.matches(key) {
            return self.select();
        }
        None
    }
}

fn baud_or_default(baud: u32) -> u32 {
    if baud == 0 {
        DEFAULT_BAUD_RATE
    } else {
        baud
    }
}

impl Page for MonitorPage {
    fn init(&mut self) -> Option<Cmd> {
        Some(backend::load_ports())
    }

    fn update(&mut self, msg: &Message) -> Option<Cmd> {
        match msg {
            Message::PortsLoaded(Ok(ports)) => {
                self.cursor = ports
                    .iter()
                    .position(|p| p.name == self.port)
                    .unwrap_or(0);
                self.ports = Ports::Loaded(ports.clone());
            }
            Message::PortsLoaded(Err(e)) => self.ports = Ports::Failed(e.clone()),
            Message::Persisted => self.reload_config(),
            Message::Key(key) => return self.handle_key(key),
            _ => {}
        }
        None
    }

    fn view(&self) -> Text<'static> {
        let mut lines = vec![Line::styled("  Serial Ports", Styles::title())];
        match &self.ports {
            Ports::Loading => lines.push(Line::styled("  Scanning for ports...", Styles::muted())),
            Ports::Failed(e) => {
                lines.push(Line::styled(format!("  Failed to list ports: {e}"), Styles::error()));
            }
            Ports::Loaded(ports) if ports.is_empty() => {
                lines.push(Line::styled(
                    "  No serial ports found. Press r to refresh.",
                    Styles::muted(),
                ));
            }
            Ports::Loaded(ports) => {
                for (i, port) in ports.iter().enumerate() {
                    let selected = i == self.cursor;
                    let marker = if selected { "▸ " } else { "  " };
                    let style = if selected { Styles::selected() } else { Styles::value() };
                    let mut spans = vec![
                        Span::styled(marker, Styles::accent()),
                        Span::styled(port.name.clone(), style),
                    ];
                    if port.is_usb {
                        spans.push(Span::styled(" (USB)", Styles::muted()));
                    }
                    if port.name == self.port {
                        spans.push(Span::styled(" *", Styles::success()));
                    }
                    lines.push(Line::from(spans));
                }
            }
        }

        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("  Baud rate: ", Styles::label()),
            Span::styled(self.baud_rate.to_string(), Styles::value()),
        ]));
        if let Some(message) = &self.message {
            lines.push(Line::styled(format!("  {message}"), Styles::accent()));
        }
        Text::from(lines)
    }

    fn name(&self) -> &'static str {
        "Monitor"
    }

    fn short_help(&self) -> Vec<KeyHint> {
        vec![("↑/↓", "select"), ("enter", "use port"), ("r", "refresh")]
    }

    fn set_size(&mut self, _width: u16, _height: u16) {}
}
