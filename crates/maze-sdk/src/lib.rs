//! # Maze SDK - 迷宫闸门控制器 Rust SDK
//!
//! 通过串口与迷宫装置的微控制器（Arduino）通信，实现帧协议的
//! 编解码、校验、响应关联与超时处理。
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): 帧编解码与闸门位图（纯函数，无 I/O）
//! - **串口层** (`serial`): 字节流链路抽象与 serialport 实现
//! - **驱动层** (`driver`): 单请求在途的会话状态机与后台轮询
//! - **客户端层** (`client`): 板拓扑管理与面向协作方的事件流
//!
//! # 快速开始
//!
//! 大多数用户应该使用客户端层：
//!
//! ```rust
//! use maze_sdk::prelude::*;
//! // 或
//! use maze_sdk::{Maze, MazeBuilder, MazeEvent};
//! ```
//!
//! ```no_run
//! use maze_sdk::prelude::*;
//!
//! let maze = MazeBuilder::new().port("/dev/ttyACM0").open()?;
//! maze.request_system_init()?;
//! for event in maze.events().iter() {
//!     println!("{event:?}");
//! }
//! # Ok::<(), maze_sdk::ClientError>(())
//! ```
//!
//! 需要直接收发帧的用户可以使用驱动层：
//!
//! ```rust
//! use maze_sdk::driver::{LinkBuilder, MazeLink};
//! ```

// 分层模块（各自是独立 crate，这里按层重导出）
pub use maze_client as client;
pub use maze_driver as driver;
pub use maze_protocol as protocol;
pub use maze_serial as serial;

// Prelude 模块
pub mod prelude;

// --- 用户以此为界 ---
// 以下是通过 Facade Pattern 提供的公共 API

// 客户端层（普通用户使用）- 这是推荐的入口点
pub use maze_client::{Board, ClientError, Maze, MazeBuilder, MazeEvent};

// 驱动层（高级用户使用）
pub use maze_driver::{LinkBuilder, LinkConfig, LinkError, LinkEvent, MazeLink};

// 协议层常用类型
pub use maze_protocol::{Frame, GateSet, MessageType, ProtocolError};

// 串口层
pub use maze_serial::{SerialError, SerialLink, list_available_ports};
