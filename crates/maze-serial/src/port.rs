//! 基于 `serialport` crate 的真实串口链路

use crate::{SerialError, SerialLink};
use serialport::{ClearBuffer, DataBits, Parity, SerialPort, StopBits};
use std::io::Read;
use std::time::Duration;
use tracing::debug;

/// 串口打开选项
///
/// 协议本身只要求 115200 8N1；DTR 与固件的复位行为有关，
/// 属于连接选项而不是协议的一部分。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOptions {
    /// 波特率
    pub baud_rate: u32,
    /// 阻塞读超时（轮询路径下只影响零散的底层读）
    pub read_timeout: Duration,
    /// 打开后拉高 DTR（部分固件板靠 DTR 复位，原系统按此方式连接）
    pub assert_dtr: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            read_timeout: Duration::from_secs(1),
            assert_dtr: true,
        }
    }
}

/// 真实串口链路
pub struct SerialPortLink {
    inner: Box<dyn SerialPort>,
    port_name: String,
}

impl SerialPortLink {
    /// 打开串口
    ///
    /// 打开后立即清空输入缓冲区，避免上一次会话残留的半截帧
    /// 污染第一次交换。
    ///
    /// # Errors
    /// - `SerialError::Open`: 端口不存在或被占用
    pub fn open(port_name: &str, options: &OpenOptions) -> Result<Self, SerialError> {
        let port = serialport::new(port_name, options.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(options.read_timeout)
            .open()
            .map_err(|source| SerialError::Open {
                port: port_name.to_string(),
                source,
            })?;

        let mut link = Self {
            inner: port,
            port_name: port_name.to_string(),
        };

        if options.assert_dtr {
            link.inner.write_data_terminal_ready(true)?;
        }
        link.clear_input()?;

        debug!(
            "Opened serial port '{}' at {} baud (dtr={})",
            port_name, options.baud_rate, options.assert_dtr
        );
        Ok(link)
    }

    /// 端口名
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl SerialLink for SerialPortLink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        std::io::Write::write_all(&mut self.inner, bytes)?;
        self.inner.flush()?;
        Ok(())
    }

    fn bytes_to_read(&mut self) -> Result<usize, SerialError> {
        Ok(self.inner.bytes_to_read()? as usize)
    }

    fn read_available(&mut self) -> Result<Vec<u8>, SerialError> {
        let available = self.bytes_to_read()?;
        if available == 0 {
            return Ok(Vec::new());
        }
        let mut buf = vec![0u8; available];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn clear_input(&mut self) -> Result<(), SerialError> {
        self.inner.clear(ClearBuffer::Input)?;
        Ok(())
    }
}
