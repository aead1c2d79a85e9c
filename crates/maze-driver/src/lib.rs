//! # Maze Driver
//!
//! 链路会话层：在串口字节流之上实现"单请求在途"的协议状态机。
//!
//! ## 模块
//!
//! - `config`: 链路配置（波特率、响应超时、轮询间隔）
//! - `session`: 协议状态机（Idle / AwaitingResponse / Closed）
//! - `link`: 对外句柄，持有会话与后台轮询线程
//! - `builder`: 链式构造 [`MazeLink`]
//! - `event`: 链路层事件（响应、超时、坏帧）
//!
//! ## 并发模型
//!
//! 所有协议操作都由一个逻辑执行者完成：调用方通过 [`MazeLink`]
//! 发送请求，后台轮询线程以固定节拍驱动 [`session::LinkSession::poll`]。
//! 两者共用一把锁，链路上永远只有一个在途请求。

pub mod builder;
pub mod config;
pub mod event;
pub mod link;
pub mod session;

mod error;

// 重新导出常用类型
pub use builder::LinkBuilder;
pub use config::LinkConfig;
pub use error::LinkError;
pub use event::LinkEvent;
pub use link::MazeLink;
pub use session::LinkSession;
