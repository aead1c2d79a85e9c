//! 客户端层错误类型定义

use maze_driver::LinkError;
use thiserror::Error;

/// 控制器层错误：响应与已发现的板拓扑不一致
///
/// 这类错误对"这一条响应"是致命的——控制器不会部分应用它，
/// 但会话与拓扑本身保持可用。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error(
        "Board index out of range: {entries} entries for {board_count} discovered boards"
    )]
    BoardIndexOutOfRange { entries: usize, board_count: usize },
}

/// 客户端层错误类型
#[derive(Error, Debug)]
pub enum ClientError {
    /// 链路层错误（未连接、请求在途、串口/协议失败）
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// 控制器层错误（拓扑不一致）
    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),
}
