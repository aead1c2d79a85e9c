//! # Maze Client
//!
//! 闸门控制器的高层接口：
//!
//! - `controller`: 板拓扑与三种响应消息的解释逻辑（纯状态，无 I/O）
//! - `event`: 面向协作方（UI 等）的统一事件流
//! - `maze`: [`Maze`] 客户端门面，组合链路句柄与控制器
//! - `builder`: 链式构造 [`Maze`]
//!
//! UI 层只做两件事：调用 [`Maze`] 的请求方法，消费
//! [`MazeEvent`] 事件流渲染状态。核心不反向依赖任何界面。

pub mod builder;
pub mod controller;
pub mod event;
pub mod maze;

mod error;

// 重新导出常用类型
pub use builder::MazeBuilder;
pub use controller::{Board, GateController};
pub use error::{ClientError, ControllerError};
pub use event::MazeEvent;
pub use maze::Maze;

// 方便起见，把下层常用类型一并导出
pub use maze_driver::{LinkConfig, LinkError};
pub use maze_protocol::{GateSet, MessageType};
