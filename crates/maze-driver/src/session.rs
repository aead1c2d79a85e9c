//! 协议状态机
//!
//! 会话在三个状态之间迁移：
//!
//! ```text
//! open() ──> Idle ──send()──> AwaitingResponse ──合法响应/超时──> Idle
//!              │                     │
//!              └──────── close() ────┴──> Closed（终态，幂等）
//! ```
//!
//! 核心不变式：同一时刻至多一个在途请求。`AwaitingResponse` 期间的
//! `send` 立即失败（不排队），每个在途请求要么被响应解决、要么被
//! 超时解决，任何路径都不会把会话卡死在 `AwaitingResponse`。

use crate::config::LinkConfig;
use crate::error::LinkError;
use crate::event::LinkEvent;
use maze_protocol::{self as protocol, MessageType};
use maze_serial::SerialLink;
use std::time::Instant;
use tracing::{debug, trace, warn};

/// 在途请求
#[derive(Debug)]
struct PendingRequest {
    /// 请求描述（类型 + payload 十六进制），超时上报时原样带出
    description: String,
    /// 绝对截止时间
    deadline: Instant,
}

/// 会话状态
#[derive(Debug)]
enum SessionState {
    /// 空闲，可以发送下一个请求
    Idle,
    /// 有请求在途，等待响应或超时
    AwaitingResponse(PendingRequest),
    /// 已关闭（终态）
    Closed,
}

/// 链路会话：字节流之上的单请求协议状态机
///
/// 本类型不做任何调度——[`poll`](Self::poll) 是一次协作式节拍，
/// 由外部（后台线程或测试）按轮询间隔驱动。
pub struct LinkSession<L: SerialLink> {
    /// `Closed` 之后为 `None`：关闭即释放串口句柄
    link: Option<L>,
    config: LinkConfig,
    state: SessionState,
}

impl<L: SerialLink> LinkSession<L> {
    /// 在已打开的链路上建立会话（Disconnected → Idle）
    pub fn open(link: L, config: LinkConfig) -> Self {
        Self {
            link: Some(link),
            config,
            state: SessionState::Idle,
        }
    }

    /// 链路配置
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// 是否有请求在途
    pub fn is_awaiting_response(&self) -> bool {
        matches!(self.state, SessionState::AwaitingResponse(_))
    }

    /// 会话是否已关闭
    pub fn is_closed(&self) -> bool {
        matches!(self.state, SessionState::Closed)
    }

    /// 发送一个请求（Idle → AwaitingResponse）
    ///
    /// # Errors
    /// - `LinkError::NotConnected`: 会话已关闭
    /// - `LinkError::RequestPending`: 已有请求在途（不排队，立即失败；
    ///   在途请求与其计时器都不受影响）
    /// - `LinkError::Protocol`: payload 超长
    /// - `LinkError::Serial`: 写串口失败
    pub fn send(&mut self, message_type: MessageType, payload: &[u8]) -> Result<(), LinkError> {
        match self.state {
            SessionState::Closed => return Err(LinkError::NotConnected),
            SessionState::AwaitingResponse(_) => return Err(LinkError::RequestPending),
            SessionState::Idle => {},
        }
        let link = self.link.as_mut().ok_or(LinkError::NotConnected)?;

        let raw = protocol::encode(message_type, payload)?;
        link.write_all(&raw)?;

        let description = format!("{message_type:?} payload [{}]", hex::encode(payload));
        trace!("Sent request {description}: frame [{}]", hex::encode(&raw));

        self.state = SessionState::AwaitingResponse(PendingRequest {
            description,
            deadline: Instant::now() + self.config.response_timeout(),
        });
        Ok(())
    }

    /// 一次协作式轮询节拍
    ///
    /// 依次做两件事：把当前可读的字节当作一个候选帧解码验证；
    /// 若请求仍未解决则检查截止时间。产出 0 到 2 个事件。
    ///
    /// # Errors
    /// - `LinkError::Serial`: 读串口失败（事件之外的硬错误）
    pub fn poll(&mut self) -> Result<Vec<LinkEvent>, LinkError> {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> Result<Vec<LinkEvent>, LinkError> {
        // 空闲/关闭状态下的节拍是空转
        if !self.is_awaiting_response() {
            return Ok(Vec::new());
        }

        let link = self.link.as_mut().ok_or(LinkError::NotConnected)?;
        let mut events = Vec::new();

        if link.bytes_to_read()? > 0 {
            let raw = link.read_available()?;
            match protocol::decode(&raw) {
                Err(error) => {
                    // 结构坏帧：丢弃字节，在途请求保持，等后续响应或超时
                    warn!("Discarding invalid frame [{}]: {error}", hex::encode(&raw));
                    events.push(LinkEvent::InvalidFrame { error });
                },
                Ok(frame) => {
                    let expected = frame.expected_response_checksum();
                    if expected != frame.checksum {
                        warn!(
                            "Checksum mismatch on {:?} response: expected 0x{expected:02X}, got 0x{:02X}",
                            frame.message_type, frame.checksum
                        );
                        events.push(LinkEvent::ChecksumMismatch {
                            expected,
                            actual: frame.checksum,
                        });
                    } else {
                        // 合法响应：请求解决，回到 Idle
                        debug!(
                            "Response {:?} ({} payload bytes)",
                            frame.message_type,
                            frame.payload.len()
                        );
                        self.state = SessionState::Idle;
                        events.push(LinkEvent::ResponseReceived {
                            message_type: frame.message_type,
                            payload: frame.payload,
                        });
                        return Ok(events);
                    }
                },
            }
        }

        // 请求仍在途：检查截止时间。坏帧/校验失败不给请求续命，
        // 截止时间从 send 起算一次。
        let timed_out =
            matches!(&self.state, SessionState::AwaitingResponse(pending) if now >= pending.deadline);
        if timed_out
            && let SessionState::AwaitingResponse(pending) =
                std::mem::replace(&mut self.state, SessionState::Idle)
        {
            let deadline_ms = self.config.response_timeout_ms;
            warn!(
                "Response timeout after {deadline_ms} ms for request {}",
                pending.description
            );
            events.push(LinkEvent::ResponseTimeout {
                request: pending.description,
                deadline_ms,
            });
        }

        Ok(events)
    }

    /// 关闭会话（任意状态 → Closed，幂等）
    ///
    /// 丢弃在途请求并释放串口句柄；之后的 `poll` 空转、
    /// `send` 返回 `NotConnected`。
    pub fn close(&mut self) {
        if !self.is_closed() {
            debug!("Link session closed");
            self.state = SessionState::Closed;
            self.link = None;
        }
    }
}
