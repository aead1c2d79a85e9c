//! 对外链路句柄
//!
//! [`MazeLink`] 持有会话与后台轮询线程。线程以 `poll_interval_ms`
//! 为节拍驱动 [`LinkSession::poll`]，产出的事件经 crossbeam 通道交给
//! 订阅方；调用方的 `send_request` 与轮询共用一把锁，保持"单逻辑
//! 执行者"的协议契约。

use crate::config::LinkConfig;
use crate::error::LinkError;
use crate::event::LinkEvent;
use crate::session::LinkSession;
use crossbeam_channel::{Receiver, Sender};
use maze_protocol::MessageType;
use maze_serial::SerialLink;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use tracing::{error, trace};

/// 链路句柄（对外 API）
///
/// Drop 时停止轮询线程并关闭会话。
pub struct MazeLink<L: SerialLink + 'static> {
    session: Arc<Mutex<LinkSession<L>>>,
    events_rx: Receiver<LinkEvent>,
    poll_thread: Option<JoinHandle<()>>,
    is_running: Arc<AtomicBool>,
}

impl<L: SerialLink + 'static> MazeLink<L> {
    /// 在已打开的链路上启动句柄（通常经由 [`crate::LinkBuilder`]）
    pub fn start(link: L, config: LinkConfig) -> Self {
        let poll_interval = config.poll_interval();
        let session = Arc::new(Mutex::new(LinkSession::open(link, config)));
        let (events_tx, events_rx) = crossbeam_channel::unbounded();

        let is_running = Arc::new(AtomicBool::new(true));

        let session_clone = session.clone();
        let is_running_clone = is_running.clone();
        let poll_thread = std::thread::spawn(move || {
            poll_loop(session_clone, events_tx, is_running_clone, poll_interval);
        });

        Self {
            session,
            events_rx,
            poll_thread: Some(poll_thread),
            is_running,
        }
    }

    /// 发送一个请求（不排队；在途请求未解决时立即失败）
    ///
    /// # Errors
    /// 见 [`LinkSession::send`]。
    pub fn send_request(&self, message_type: MessageType, payload: &[u8]) -> Result<(), LinkError> {
        self.session.lock().send(message_type, payload)
    }

    /// 事件流接收端（响应、超时、坏帧）
    pub fn events(&self) -> &Receiver<LinkEvent> {
        &self.events_rx
    }

    /// 是否有请求在途
    pub fn is_awaiting_response(&self) -> bool {
        self.session.lock().is_awaiting_response()
    }

    /// 关闭链路：停止轮询线程、关闭会话（幂等）
    pub fn close(&mut self) {
        // Release: 轮询线程看到 false 时，之前的写入已完成
        self.is_running.store(false, Ordering::Release);
        if let Some(handle) = self.poll_thread.take()
            && let Err(e) = handle.join()
        {
            error!("Poll thread panicked during join: {e:?}");
        }
        self.session.lock().close();
    }
}

impl<L: SerialLink + 'static> Drop for MazeLink<L> {
    fn drop(&mut self) {
        self.close();
    }
}

/// 后台轮询循环
///
/// 串口读错误不会终止循环（下一拍重试）；事件接收端被丢弃时循环退出。
fn poll_loop<L: SerialLink>(
    session: Arc<Mutex<LinkSession<L>>>,
    events_tx: Sender<LinkEvent>,
    is_running: Arc<AtomicBool>,
    poll_interval: std::time::Duration,
) {
    loop {
        if !is_running.load(Ordering::Acquire) {
            trace!("Poll thread: is_running flag is false, exiting");
            break;
        }

        let events = {
            let mut session = session.lock();
            session.poll()
        };

        match events {
            Ok(events) => {
                for event in events {
                    if events_tx.send(event).is_err() {
                        // 订阅方不在了，轮询没有继续的意义
                        trace!("Poll thread: event receiver dropped, exiting");
                        return;
                    }
                }
            },
            Err(e) => {
                error!("Poll error: {e}");
            },
        }

        spin_sleep::sleep(poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_protocol::{END_BYTE, START_BYTE, response_checksum};
    use maze_serial::mock::MockSerialLink;
    use std::time::Duration;

    fn fast_config() -> LinkConfig {
        LinkConfig {
            poll_interval_ms: 1,
            response_timeout_ms: 100,
            ..LinkConfig::default()
        }
    }

    fn response_frame(message_type: MessageType, payload: &[u8]) -> Vec<u8> {
        let mut raw = vec![START_BYTE, u8::from(message_type), payload.len() as u8];
        raw.extend_from_slice(payload);
        raw.push(response_checksum(message_type, payload));
        raw.push(END_BYTE);
        raw
    }

    #[test]
    fn test_background_poll_delivers_response_event() {
        let (link, handle) = MockSerialLink::new();
        let maze_link = MazeLink::start(link, fast_config());

        maze_link
            .send_request(MessageType::SystemInit, &[0x00])
            .unwrap();
        handle.push_response(&response_frame(MessageType::SystemInit, &[0x20]));

        let event = maze_link
            .events()
            .recv_timeout(Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            event,
            LinkEvent::ResponseReceived {
                message_type: MessageType::SystemInit,
                payload: vec![0x20],
            }
        );
        assert!(!maze_link.is_awaiting_response());
    }

    #[test]
    fn test_background_poll_reports_timeout_and_link_recovers() {
        let (link, _handle) = MockSerialLink::new();
        let maze_link = MazeLink::start(link, fast_config());

        maze_link
            .send_request(MessageType::MoveGates, &[0x01])
            .unwrap();

        let event = maze_link
            .events()
            .recv_timeout(Duration::from_secs(1))
            .unwrap();
        assert!(matches!(event, LinkEvent::ResponseTimeout { .. }));

        // 超时后链路可复用
        maze_link
            .send_request(MessageType::MoveGates, &[0x01])
            .unwrap();
    }

    #[test]
    fn test_send_while_awaiting_fails_fast() {
        let (link, _handle) = MockSerialLink::new();
        let maze_link = MazeLink::start(
            link,
            LinkConfig {
                poll_interval_ms: 1,
                response_timeout_ms: 10_000,
                ..LinkConfig::default()
            },
        );

        maze_link
            .send_request(MessageType::SystemInit, &[0x00])
            .unwrap();
        let err = maze_link
            .send_request(MessageType::GatesInit, &[0x00])
            .unwrap_err();
        assert!(matches!(err, LinkError::RequestPending));
    }

    #[test]
    fn test_close_joins_thread_and_rejects_sends() {
        let (link, _handle) = MockSerialLink::new();
        let mut maze_link = MazeLink::start(link, fast_config());

        maze_link.close();
        maze_link.close();

        let err = maze_link
            .send_request(MessageType::SystemInit, &[0x00])
            .unwrap_err();
        assert!(matches!(err, LinkError::NotConnected));
    }
}
