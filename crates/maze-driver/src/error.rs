//! 链路层错误类型定义

use maze_protocol::ProtocolError;
use maze_serial::SerialError;
use thiserror::Error;

/// 链路层错误类型
#[derive(Error, Debug)]
pub enum LinkError {
    /// 串口错误（打开失败、IO 失败）
    #[error("Serial error: {0}")]
    Serial(#[from] SerialError),

    /// 协议编码错误（如 payload 超长）
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 会话已关闭或从未打开，属于调用顺序错误
    #[error("Not connected: open the link before sending commands")]
    NotConnected,

    /// 已有请求在途；链路不排队，调用方应等待响应或超时
    #[error("A request is already awaiting its response")]
    RequestPending,

    /// 构造时未指定串口
    #[error("No serial port specified")]
    MissingPort,
}
