//! 内存链路实现（无硬件测试用）
//!
//! [`MockSerialLink`] 交给会话层使用，配套的 [`MockHandle`] 留在测试侧：
//! 测试通过 handle 扮演固件——检查上位机写了什么、把响应塞进接收缓冲。

use crate::{SerialError, SerialLink};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MockState {
    /// 固件 → 上位机方向的待读字节
    rx: VecDeque<u8>,
    /// 上位机每次 write_all 的完整内容
    written: Vec<Vec<u8>>,
}

/// 内存串口链路
#[derive(Debug)]
pub struct MockSerialLink {
    state: Arc<Mutex<MockState>>,
}

/// 测试侧句柄（扮演固件）
#[derive(Debug, Clone)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockSerialLink {
    /// 创建链路与测试句柄
    pub fn new() -> (Self, MockHandle) {
        let state = Arc::new(Mutex::new(MockState::default()));
        (
            Self {
                state: state.clone(),
            },
            MockHandle { state },
        )
    }
}

impl MockHandle {
    /// 向接收缓冲追加固件响应字节
    pub fn push_response(&self, bytes: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.rx.extend(bytes.iter().copied());
    }

    /// 取走到目前为止上位机写出的所有帧
    pub fn take_written(&self) -> Vec<Vec<u8>> {
        let mut state = self.state.lock().unwrap();
        std::mem::take(&mut state.written)
    }

    /// 当前未被读走的响应字节数
    pub fn pending_response_len(&self) -> usize {
        self.state.lock().unwrap().rx.len()
    }
}

impl SerialLink for MockSerialLink {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        let mut state = self.state.lock().unwrap();
        state.written.push(bytes.to_vec());
        Ok(())
    }

    fn bytes_to_read(&mut self) -> Result<usize, SerialError> {
        Ok(self.state.lock().unwrap().rx.len())
    }

    fn read_available(&mut self) -> Result<Vec<u8>, SerialError> {
        let mut state = self.state.lock().unwrap();
        Ok(state.rx.drain(..).collect())
    }

    fn clear_input(&mut self) -> Result<(), SerialError> {
        self.state.lock().unwrap().rx.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_link_roundtrip() {
        let (mut link, handle) = MockSerialLink::new();

        link.write_all(&[1, 2, 3]).unwrap();
        assert_eq!(handle.take_written(), vec![vec![1, 2, 3]]);

        handle.push_response(&[9, 8]);
        assert_eq!(link.bytes_to_read().unwrap(), 2);
        assert_eq!(link.read_available().unwrap(), vec![9, 8]);
        assert_eq!(link.bytes_to_read().unwrap(), 0);
    }

    #[test]
    fn test_clear_input_discards_pending() {
        let (mut link, handle) = MockSerialLink::new();
        handle.push_response(&[1, 2, 3]);
        link.clear_input().unwrap();
        assert_eq!(link.read_available().unwrap(), Vec::<u8>::new());
    }
}
