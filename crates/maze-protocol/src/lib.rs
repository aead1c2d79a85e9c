//! # Maze Protocol
//!
//! 迷宫闸门控制器的串口帧协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `frame`: 帧编码/解码与校验和计算
//! - `gates`: 闸门位图类型（每块板 8 个闸门）
//!
//! ## 线格式
//!
//! 每帧结构固定（最短 5 字节）：
//!
//! ```text
//! 偏移  大小  字段
//! 0     1    START = 0x02
//! 1     1    message_type (0=SystemInit, 1=GatesInit, 2=MoveGates)
//! 2     1    payload 长度 N (0..=255)
//! 3     N    payload
//! 3+N   1    checksum
//! 4+N   1    END = 0x03
//! ```
//!
//! ## 校验和规则（非对称，与固件一致）
//!
//! - 上位机 → 固件（请求）：`sum(payload) % 256`
//! - 固件 → 上位机（响应）：`(sum(payload) + message_type) % 256`
//!
//! 该非对称规则来自固件本身的实现，两端必须保持一致，
//! 不要在不改固件的情况下"统一"它。

pub mod frame;
pub mod gates;

// 重新导出常用类型
pub use frame::{
    END_BYTE, Frame, MAX_PAYLOAD_LEN, MessageType, MIN_FRAME_LEN, START_BYTE, decode, encode,
    request_checksum, response_checksum,
};
pub use gates::GateSet;

use thiserror::Error;

/// 协议编码/解码错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Payload too large: {len} bytes (max 255)")]
    PayloadTooLarge { len: usize },

    #[error("Malformed frame ({len} bytes): {reason}")]
    MalformedFrame { reason: &'static str, len: usize },

    #[error("Length mismatch: declared {declared} payload bytes, frame carries {available}")]
    LengthMismatch { declared: usize, available: usize },

    #[error("Unknown message type: 0x{value:02X}")]
    UnknownMessageType { value: u8 },
}
