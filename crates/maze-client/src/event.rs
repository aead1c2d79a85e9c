//! 面向协作方的统一事件流
//!
//! 链路层事件与控制器解释结果在这里汇合成一个通道，
//! UI 协作方只订阅这一个流。

use crate::error::ControllerError;
use maze_protocol::{GateSet, ProtocolError};

/// 客户端事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeEvent {
    /// 系统初始化响应中发现一块新板（按发现顺序编号）
    BoardDiscovered { index: usize, address: u8 },

    /// 闸门初始化响应：板 `index` 的可用闸门集合
    GatesEnabled { index: usize, gates: GateSet },

    /// 移动响应与命令完全一致
    MoveSucceeded,

    /// 板 `board` 的闸门 `gate` 命令态与实际态不符；
    /// 协作方应回滚该闸门的预判显示状态
    GateMoveFailed { board: usize, gate: u8 },

    /// 一次移动交换里存在失配（聚合事件，跟在逐门事件之后）
    MoveHadErrors { mismatch_count: usize },

    /// 在途请求超时（该请求终止，会话已回到空闲）
    ResponseTimeout { request: String, deadline_ms: u64 },

    /// 收到无法解析的帧（已丢弃，在途请求不受影响）
    InvalidFrame { error: ProtocolError },

    /// 收到校验和不符的帧（已丢弃，在途请求不受影响）
    ChecksumMismatch { expected: u8, actual: u8 },

    /// 响应与已发现的拓扑不一致（该响应被整体丢弃）
    ControllerError { error: ControllerError },
}
