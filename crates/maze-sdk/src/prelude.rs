//! Prelude - 常用类型的便捷导入
//!
//! 大多数用户应该使用这个模块来导入常用类型：
//!
//! ```rust
//! use maze_sdk::prelude::*;
//! ```

// 客户端层（推荐使用）
pub use maze_client::{Board, Maze, MazeBuilder, MazeEvent};

// 协议层常用类型
pub use maze_protocol::{GateSet, MessageType};

// 串口层（端口枚举 + 链路 trait）
pub use maze_serial::{SerialLink, list_available_ports};

// 驱动层配置
pub use maze_driver::LinkConfig;

// 错误类型
pub use maze_client::ClientError;
pub use maze_driver::LinkError;
pub use maze_protocol::ProtocolError;
pub use maze_serial::SerialError;
