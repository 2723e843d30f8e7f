//!
//! app.rs
//! 应用主循环
//!
//!
//! 主循环本身是同步的，只有一个线程修改状态：
//!
//! loop {
//!
//!     terminal.draw(|f| view::render(&app, f))       // 渲染 UI
//!     if app.should_quit { break }                    // 检查是否应该退出
//!     poll_event(≤ 50ms)                              // 终端输入 → Message::Key / Resize
//!     rx.try_recv()                                   // 后台任务完成 → Message
//!     每 250ms 一次 Message::Tick                     // 运行计时
//!
//!     每条消息都经过 update::update(&mut app, msg)，
//!     返回的 Cmd 被 spawn 到 tokio 运行时，
//!     完成后把产生的 Message 送回 tx
//! }
//!
//! 一次只处理一条消息，页面之间不需要任何同步。

use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::backend::Cmd;
use crate::event;
use crate::message::Message;
use crate::model::App;
use crate::update;
use crate::util::Term;
use crate::view;

/// Tick 间隔
const TICK_RATE: Duration = Duration::from_millis(250);

/// 单次输入轮询上限，保证后台结果及时上屏
const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// 把 Cmd 调度到运行时，结果送回主循环
struct Dispatcher {
    runtime: Handle,
    tx: UnboundedSender<Message>,
}

impl Dispatcher {
    fn spawn(&self, cmd: Cmd) {
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            // 主循环已退出时接收端已关闭，丢弃即可
            let _ = tx.send(cmd.await);
        });
    }

    fn apply(&self, app: &mut App, msg: Message) {
        for cmd in update::update(app, msg) {
            self.spawn(cmd);
        }
    }
}

/// 运行应用主循环
pub fn run(terminal: &mut Term, app: &mut App, runtime: Handle) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher { runtime, tx };

    // 1. 初始尺寸与各页面的初始化任务
    let size = terminal.size()?;
    dispatcher.apply(app, Message::Resize(size.width, size.height));
    for cmd in app.init() {
        dispatcher.spawn(cmd);
    }

    let mut last_tick = Instant::now();
    loop {
        // 2. 渲染 UI
        terminal.draw(|frame| view::render(app, frame))?;

        // 3. 检查是否应该退出
        if app.should_quit {
            break;
        }

        // 4. 终端输入
        let timeout = TICK_RATE
            .saturating_sub(last_tick.elapsed())
            .min(POLL_TIMEOUT);
        if let Some(msg) = event::poll_event(timeout)?.and_then(event::handle_event) {
            dispatcher.apply(app, msg);
        }

        // 5. 后台任务结果
        while let Ok(msg) = rx.try_recv() {
            dispatcher.apply(app, msg);
        }

        // 6. Tick
        if last_tick.elapsed() >= TICK_RATE {
            dispatcher.apply(app, Message::Tick);
            last_tick = Instant::now();
        }
    }

    log::info!("Exiting main loop");
    Ok(())
}
