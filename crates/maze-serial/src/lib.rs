//! # Maze Serial Adapter Layer
//!
//! 串口硬件抽象层：协议层/会话层通过 [`SerialLink`] trait 访问字节流，
//! 不直接依赖 `serialport` 的具体类型。
//!
//! - `port`: 基于 `serialport` crate 的真实串口实现
//! - `mock`: 内存实现（feature `mock`，用于无硬件测试）

use thiserror::Error;

pub mod port;

#[cfg(feature = "mock")]
pub mod mock;

pub use port::{OpenOptions, SerialPortLink};

#[cfg(feature = "mock")]
pub use mock::{MockHandle, MockSerialLink};

/// 串口层统一错误类型
#[derive(Error, Debug)]
pub enum SerialError {
    /// 串口打开失败（端口名错误、被占用等），对该次连接是致命的
    #[error("Failed to open port '{port}': {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Serial IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serial port error: {0}")]
    Port(#[from] serialport::Error),
}

/// 字节流链路抽象
///
/// 读取是非阻塞轮询式的：先问有多少字节可读，再一次性取走。
/// 会话层保证同一时刻只有一个线程访问链路。
pub trait SerialLink: Send {
    /// 写出全部字节（短暂阻塞可接受）
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerialError>;

    /// 当前可读的字节数
    fn bytes_to_read(&mut self) -> Result<usize, SerialError>;

    /// 读走当前可读的全部字节；无数据时返回空向量
    fn read_available(&mut self) -> Result<Vec<u8>, SerialError>;

    /// 丢弃输入缓冲区中的所有字节
    fn clear_input(&mut self) -> Result<(), SerialError>;
}

/// 列出主机上可用的串口名
///
/// 委托给操作系统；端口选择界面由上层收尾，这里只给名字。
pub fn list_available_ports() -> Result<Vec<String>, SerialError> {
    let ports = serialport::available_ports()?;
    let names: Vec<String> = ports.into_iter().map(|info| info.port_name).collect();
    tracing::debug!("Found {} serial ports: {:?}", names.len(), names);
    Ok(names)
}
