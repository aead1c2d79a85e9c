//! 链路层事件
//!
//! 会话在每个轮询节拍上产出这些事件；上层（闸门控制器/UI 协作方）
//! 据此更新自己的状态。错误事件都是非致命的：`InvalidFrame` 与
//! `ChecksumMismatch` 不取消在途请求，`ResponseTimeout` 之后会话
//! 回到空闲、可以继续使用。

use maze_protocol::{MessageType, ProtocolError};

/// 链路层事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// 收到校验通过的响应帧
    ResponseReceived {
        message_type: MessageType,
        payload: Vec<u8>,
    },

    /// 在途请求在截止时间内没有等到合法响应（每个请求至多上报一次）
    ResponseTimeout {
        /// 在途请求的描述（类型 + payload 十六进制），用于诊断输出
        request: String,
        /// 配置的截止时间（毫秒）
        deadline_ms: u64,
    },

    /// 读到的字节无法按帧结构解析；字节已丢弃，在途请求仍然有效
    InvalidFrame { error: ProtocolError },

    /// 帧结构正确但校验和不符；帧已丢弃，在途请求仍然有效
    ChecksumMismatch { expected: u8, actual: u8 },
}
