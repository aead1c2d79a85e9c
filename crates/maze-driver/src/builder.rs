//! Builder 模式实现
//!
//! 提供链式构造 [`MazeLink`] 的便捷方式。

use crate::config::LinkConfig;
use crate::error::LinkError;
use crate::link::MazeLink;
use maze_serial::{SerialLink, SerialPortLink};

/// 链路 Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use maze_driver::LinkBuilder;
///
/// let link = LinkBuilder::new()
///     .port("/dev/ttyACM0")
///     .response_timeout_ms(30_000)
///     .open()
///     .unwrap();
/// ```
pub struct LinkBuilder {
    port: Option<String>,
    config: LinkConfig,
}

impl LinkBuilder {
    /// 创建新的 Builder（默认配置，未指定端口）
    pub fn new() -> Self {
        Self {
            port: None,
            config: LinkConfig::default(),
        }
    }

    /// 指定串口名（如 "/dev/ttyACM0"、"COM3"）
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// 整体替换链路配置
    pub fn config(mut self, config: LinkConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置响应超时（毫秒）
    pub fn response_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.response_timeout_ms = timeout_ms;
        self
    }

    /// 打开串口时是否拉高 DTR
    pub fn assert_dtr(mut self, assert_dtr: bool) -> Self {
        self.config.assert_dtr = assert_dtr;
        self
    }

    /// 打开串口并启动链路
    ///
    /// # Errors
    /// - `LinkError::MissingPort`: 未指定端口
    /// - `LinkError::Serial`: 端口不存在或被占用
    pub fn open(self) -> Result<MazeLink<SerialPortLink>, LinkError> {
        let port = self.port.as_deref().ok_or(LinkError::MissingPort)?;
        let link = SerialPortLink::open(port, &self.config.open_options())?;
        Ok(MazeLink::start(link, self.config))
    }

    /// 在任意链路实现上启动（测试与 mock 用）
    pub fn open_with_link<L: SerialLink + 'static>(self, link: L) -> MazeLink<L> {
        MazeLink::start(link, self.config)
    }
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_without_port_fails() {
        let err = LinkBuilder::new().open().err();
        assert!(matches!(err, Some(LinkError::MissingPort)));
    }

    #[test]
    fn test_builder_setters_apply_to_config() {
        let builder = LinkBuilder::new()
            .port("COM3")
            .response_timeout_ms(30_000)
            .assert_dtr(false);
        assert_eq!(builder.config.response_timeout_ms, 30_000);
        assert!(!builder.config.assert_dtr);
        assert_eq!(builder.port.as_deref(), Some("COM3"));
    }
}
