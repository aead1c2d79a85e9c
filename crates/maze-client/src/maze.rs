//! Maze 客户端门面
//!
//! 组合链路句柄与闸门控制器：请求方法把类型化命令交给链路，
//! 事件泵线程把链路事件翻译成 [`MazeEvent`] 给协作方消费。

use crate::controller::{Board, GateController};
use crate::error::ClientError;
use crate::event::MazeEvent;
use crossbeam_channel::{Receiver, Sender};
use maze_driver::{LinkEvent, MazeLink};
use maze_protocol::{GateSet, MessageType};
use maze_serial::SerialLink;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{error, trace, warn};

/// 初始化类请求的 payload
///
/// 固件忽略请求 payload，但原系统在线上始终带一个 0x00 字节；
/// 保持一致以兼容既有固件。
const INIT_REQUEST_PAYLOAD: &[u8] = &[0x00];

/// Maze 客户端（对外 API）
///
/// # Example
///
/// ```no_run
/// use maze_client::MazeBuilder;
///
/// let maze = MazeBuilder::new().port("/dev/ttyACM0").open().unwrap();
/// maze.request_system_init().unwrap();
/// for event in maze.events().iter() {
///     println!("{event:?}");
/// }
/// ```
pub struct Maze<L: SerialLink + 'static> {
    link: MazeLink<L>,
    controller: Arc<Mutex<GateController>>,
    events_rx: Receiver<MazeEvent>,
    pump_thread: Option<JoinHandle<()>>,
}

impl<L: SerialLink + 'static> Maze<L> {
    /// 在已启动的链路上建立客户端
    pub fn new(link: MazeLink<L>) -> Self {
        let controller = Arc::new(Mutex::new(GateController::new()));
        let (events_tx, events_rx) = crossbeam_channel::unbounded();

        let link_events = link.events().clone();
        let controller_clone = controller.clone();
        let pump_thread = std::thread::spawn(move || {
            event_pump(link_events, controller_clone, events_tx);
        });

        Self {
            link,
            controller,
            events_rx,
            pump_thread: Some(pump_thread),
        }
    }

    /// 请求系统初始化（扫描总线、发现板）
    pub fn request_system_init(&self) -> Result<(), ClientError> {
        self.link
            .send_request(MessageType::SystemInit, INIT_REQUEST_PAYLOAD)?;
        Ok(())
    }

    /// 请求闸门初始化（查询各板的可用闸门）
    pub fn request_gates_init(&self) -> Result<(), ClientError> {
        self.link
            .send_request(MessageType::GatesInit, INIT_REQUEST_PAYLOAD)?;
        Ok(())
    }

    /// 请求移动闸门
    ///
    /// `desired[i]` 是板 `i` 的目标闸门集合。命令态先记录在拓扑里，
    /// 响应到达后与实际态做失配检测。
    ///
    /// # Errors
    /// - `ClientError::Controller`: 目标条目多于已发现的板
    /// - `ClientError::Link`: 未连接、请求在途或串口失败
    pub fn request_move_gates(&self, desired: &[GateSet]) -> Result<(), ClientError> {
        // 锁跨越整个 编码 → 发送 → 记录 序列：编码或发送失败时
        // （包括已有请求在途被拒绝）命令态保持不变，在途移动的
        // 失配基线不被覆盖
        let mut controller = self.controller.lock();
        let payload = controller.encode_move_command(desired)?;
        self.link.send_request(MessageType::MoveGates, &payload)?;
        controller.record_move_command(desired);
        Ok(())
    }

    /// 事件流接收端（协作方据此渲染状态）
    pub fn events(&self) -> &Receiver<MazeEvent> {
        &self.events_rx
    }

    /// 当前拓扑快照
    pub fn boards(&self) -> Vec<Board> {
        self.controller.lock().boards().to_vec()
    }

    /// 是否有请求在途
    pub fn is_awaiting_response(&self) -> bool {
        self.link.is_awaiting_response()
    }

    /// 关闭客户端：停链路、停事件泵（幂等）
    pub fn close(&mut self) {
        self.link.close();
        if let Some(handle) = self.pump_thread.take()
            && let Err(e) = handle.join()
        {
            error!("Event pump thread panicked during join: {e:?}");
        }
    }
}

impl<L: SerialLink + 'static> Drop for Maze<L> {
    fn drop(&mut self) {
        self.close();
    }
}

/// 事件泵：链路事件 → 客户端事件
///
/// 链路事件通道断开（链路关闭）或订阅方丢弃接收端时退出。
fn event_pump(
    link_events: Receiver<LinkEvent>,
    controller: Arc<Mutex<GateController>>,
    events_tx: Sender<MazeEvent>,
) {
    for link_event in link_events.iter() {
        let translated: Vec<MazeEvent> = match link_event {
            LinkEvent::ResponseReceived {
                message_type,
                payload,
            } => match controller.lock().handle_response(message_type, &payload) {
                Ok(events) => events,
                Err(e) => {
                    warn!("Dropped {message_type:?} response: {e}");
                    vec![MazeEvent::ControllerError { error: e }]
                },
            },
            LinkEvent::ResponseTimeout {
                request,
                deadline_ms,
            } => vec![MazeEvent::ResponseTimeout {
                request,
                deadline_ms,
            }],
            LinkEvent::InvalidFrame { error } => vec![MazeEvent::InvalidFrame { error }],
            LinkEvent::ChecksumMismatch { expected, actual } => {
                vec![MazeEvent::ChecksumMismatch { expected, actual }]
            },
        };

        for event in translated {
            if events_tx.send(event).is_err() {
                trace!("Event pump: subscriber dropped, exiting");
                return;
            }
        }
    }
    trace!("Event pump: link event channel closed, exiting");
}
