//! 链路配置

use maze_serial::OpenOptions;
use std::time::Duration;

/// 链路配置
///
/// 历史版本里响应超时在 5 s 与 30 s 之间摇摆过，这里做成配置项，
/// 默认 5000 ms。
///
/// # Example
///
/// ```
/// use maze_driver::LinkConfig;
///
/// // 默认配置（115200 波特，5 s 响应超时，50 ms 轮询）
/// let config = LinkConfig::default();
///
/// // 慢速固件用长超时
/// let config = LinkConfig {
///     response_timeout_ms: 30_000,
///     ..LinkConfig::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkConfig {
    /// 串口波特率
    pub baud_rate: u32,
    /// 响应超时（毫秒），超过后对在途请求上报 `ResponseTimeout`
    pub response_timeout_ms: u64,
    /// 轮询间隔（毫秒），后台线程按此节拍检查输入
    pub poll_interval_ms: u64,
    /// 底层阻塞读超时（毫秒）
    pub read_timeout_ms: u64,
    /// 打开串口时拉高 DTR（部分板卡靠 DTR 复位）
    pub assert_dtr: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            response_timeout_ms: 5_000,
            poll_interval_ms: 50,
            read_timeout_ms: 1_000,
            assert_dtr: true,
        }
    }
}

impl LinkConfig {
    /// 响应超时
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    /// 轮询间隔
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// 转换为串口打开选项
    pub fn open_options(&self) -> OpenOptions {
        OpenOptions {
            baud_rate: self.baud_rate,
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            assert_dtr: self.assert_dtr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LinkConfig::default();
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.response_timeout_ms, 5_000);
        assert_eq!(config.poll_interval_ms, 50);
        assert!(config.assert_dtr);
    }

    #[test]
    fn test_open_options_mirror_config() {
        let config = LinkConfig {
            baud_rate: 9_600,
            read_timeout_ms: 250,
            assert_dtr: false,
            ..LinkConfig::default()
        };
        let options = config.open_options();
        assert_eq!(options.baud_rate, 9_600);
        assert_eq!(options.read_timeout, Duration::from_millis(250));
        assert!(!options.assert_dtr);
    }
}
