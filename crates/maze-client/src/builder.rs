//! Client 层 Builder
//!
//! 大多数用户从这里入手：指定端口、按需调超时，拿到 [`Maze`]。

use crate::error::ClientError;
use crate::maze::Maze;
use maze_driver::{LinkBuilder, LinkConfig};
use maze_serial::{SerialLink, SerialPortLink};

/// Maze Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use maze_client::MazeBuilder;
///
/// let maze = MazeBuilder::new()
///     .port("COM3")
///     .response_timeout_ms(30_000)
///     .open()
///     .unwrap();
/// ```
pub struct MazeBuilder {
    link: LinkBuilder,
}

impl MazeBuilder {
    /// 创建新的 Builder
    pub fn new() -> Self {
        Self {
            link: LinkBuilder::new(),
        }
    }

    /// 指定串口名
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.link = self.link.port(port);
        self
    }

    /// 整体替换链路配置
    pub fn config(mut self, config: LinkConfig) -> Self {
        self.link = self.link.config(config);
        self
    }

    /// 设置响应超时（毫秒）
    pub fn response_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.link = self.link.response_timeout_ms(timeout_ms);
        self
    }

    /// 打开串口时是否拉高 DTR
    pub fn assert_dtr(mut self, assert_dtr: bool) -> Self {
        self.link = self.link.assert_dtr(assert_dtr);
        self
    }

    /// 打开串口并建立客户端
    ///
    /// # Errors
    /// - `ClientError::Link`: 未指定端口，或端口打开失败
    pub fn open(self) -> Result<Maze<SerialPortLink>, ClientError> {
        let link = self.link.open()?;
        Ok(Maze::new(link))
    }

    /// 在任意链路实现上建立客户端（测试与 mock 用）
    pub fn open_with_link<L: SerialLink + 'static>(self, link: L) -> Maze<L> {
        Maze::new(self.link.open_with_link(link))
    }
}

impl Default for MazeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
