//! 帧编码/解码模块
//!
//! 提供纯函数形式的帧变换：无状态、无 I/O，
//! 校验和的"期望值"策略由调用方决定（请求与响应规则不同）。

use crate::ProtocolError;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// 帧起始标记
pub const START_BYTE: u8 = 0x02;

/// 帧结束标记
pub const END_BYTE: u8 = 0x03;

/// payload 最大长度（长度字段只有一个字节）
pub const MAX_PAYLOAD_LEN: usize = 255;

/// 最短合法帧长度（payload 为空时：START + type + len + checksum + END）
pub const MIN_FRAME_LEN: usize = 5;

/// 消息类型
///
/// 固件只认识这三种消息，请求与响应共用同一类型字节。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageType {
    /// 系统初始化：扫描总线，响应 payload 为发现的板地址序列
    SystemInit = 0,
    /// 闸门初始化：响应 payload 为每块板的可用闸门位图
    GatesInit = 1,
    /// 移动闸门：请求/响应 payload 均为每块板一个位图字节
    MoveGates = 2,
}

/// 一个完整的线格式帧（解码结果）
///
/// `checksum` 是帧里声明的校验和字节，解码时不做验证——
/// 发送路径与接收路径的校验规则不同，由调用方选用
/// [`request_checksum`] 或 [`response_checksum`] 比对。
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// 消息类型
    pub message_type: MessageType,
    /// payload 字节（0..=255 个）
    pub payload: Vec<u8>,
    /// 帧内声明的校验和字节
    pub checksum: u8,
}

impl Frame {
    /// 按响应规则计算本帧的期望校验和
    pub fn expected_response_checksum(&self) -> u8 {
        response_checksum(self.message_type, &self.payload)
    }
}

/// 请求校验和：`sum(payload) % 256`
///
/// 上位机发往固件的帧使用此规则（固件接收端同样只累加 payload）。
pub fn request_checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// 响应校验和：`(sum(payload) + message_type) % 256`
///
/// 固件发回的帧把消息类型也折进校验和，接收端必须用同一规则验证。
pub fn response_checksum(message_type: MessageType, payload: &[u8]) -> u8 {
    request_checksum(payload).wrapping_add(u8::from(message_type))
}

/// 编码一个请求帧
///
/// # Errors
/// - `ProtocolError::PayloadTooLarge`: payload 超过 255 字节
pub fn encode(message_type: MessageType, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(ProtocolError::PayloadTooLarge { len: payload.len() });
    }

    let mut frame = Vec::with_capacity(payload.len() + MIN_FRAME_LEN);
    frame.push(START_BYTE);
    frame.push(u8::from(message_type));
    frame.push(payload.len() as u8);
    frame.extend_from_slice(payload);
    frame.push(request_checksum(payload));
    frame.push(END_BYTE);
    Ok(frame)
}

/// 解码一个候选帧
///
/// 输入应当是一次读取得到的完整帧字节（含起止标记）。
///
/// # Errors
/// - `ProtocolError::MalformedFrame`: 帧过短或起止标记缺失
/// - `ProtocolError::LengthMismatch`: 长度字段与帧实际大小不一致
/// - `ProtocolError::UnknownMessageType`: 类型字节不在协议范围内
pub fn decode(raw: &[u8]) -> Result<Frame, ProtocolError> {
    if raw.len() < MIN_FRAME_LEN {
        return Err(ProtocolError::MalformedFrame {
            reason: "frame shorter than minimum",
            len: raw.len(),
        });
    }
    if raw[0] != START_BYTE {
        return Err(ProtocolError::MalformedFrame {
            reason: "missing start byte",
            len: raw.len(),
        });
    }
    if raw[raw.len() - 1] != END_BYTE {
        return Err(ProtocolError::MalformedFrame {
            reason: "missing end byte",
            len: raw.len(),
        });
    }

    // 长度字段必须恰好给校验和留出一个字节
    let declared = raw[2] as usize;
    let available = raw.len() - MIN_FRAME_LEN;
    if declared != available {
        return Err(ProtocolError::LengthMismatch { declared, available });
    }

    let message_type = MessageType::try_from(raw[1])
        .map_err(|_| ProtocolError::UnknownMessageType { value: raw[1] })?;

    Ok(Frame {
        message_type,
        payload: raw[3..3 + declared].to_vec(),
        checksum: raw[3 + declared],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let raw = encode(MessageType::MoveGates, &[0x11, 0x02]).unwrap();
        assert_eq!(raw, vec![0x02, 0x02, 0x02, 0x11, 0x02, 0x13, 0x03]);
    }

    #[test]
    fn test_encode_empty_payload_is_minimum_frame() {
        let raw = encode(MessageType::SystemInit, &[]).unwrap();
        assert_eq!(raw.len(), MIN_FRAME_LEN);
        assert_eq!(raw, vec![START_BYTE, 0x00, 0x00, 0x00, END_BYTE]);
    }

    #[test]
    fn test_encode_payload_too_large() {
        let payload = vec![0u8; 256];
        let err = encode(MessageType::GatesInit, &payload).unwrap_err();
        assert_eq!(err, ProtocolError::PayloadTooLarge { len: 256 });

        // 恰好 255 字节仍然合法
        assert!(encode(MessageType::GatesInit, &payload[..255]).is_ok());
    }

    #[test]
    fn test_decode_roundtrip() {
        // 发送路径编码出的帧应当原样解回（类型 + payload）
        for (message_type, payload) in [
            (MessageType::SystemInit, vec![]),
            (MessageType::GatesInit, vec![0x20]),
            (MessageType::MoveGates, vec![0x01, 0xFF, 0x00, 0x80]),
        ] {
            let raw = encode(message_type, &payload).unwrap();
            let frame = decode(&raw).unwrap();
            assert_eq!(frame.message_type, message_type);
            assert_eq!(frame.payload, payload);
            assert_eq!(frame.checksum, request_checksum(&payload));
        }
    }

    #[test]
    fn test_decode_too_short() {
        let err = decode(&[START_BYTE, 0x00, 0x00, END_BYTE]).unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedFrame { len: 4, .. }));
    }

    #[test]
    fn test_decode_bad_markers() {
        // 起始标记错误
        let err = decode(&[0xFF, 0x00, 0x00, 0x00, END_BYTE]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::MalformedFrame {
                reason: "missing start byte",
                ..
            }
        ));

        // 结束标记错误
        let err = decode(&[START_BYTE, 0x00, 0x00, 0x00, 0xFF]).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::MalformedFrame {
                reason: "missing end byte",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_length_mismatch() {
        // 声明 3 字节 payload，实际只有 1 字节
        let raw = [START_BYTE, 0x01, 0x03, 0xAA, 0xAA, END_BYTE];
        let err = decode(&raw).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::LengthMismatch {
                declared: 3,
                available: 1
            }
        );
    }

    #[test]
    fn test_decode_unknown_message_type() {
        let raw = [START_BYTE, 0x07, 0x00, 0x00, END_BYTE];
        let err = decode(&raw).unwrap_err();
        assert_eq!(err, ProtocolError::UnknownMessageType { value: 0x07 });
    }

    #[test]
    fn test_decode_does_not_validate_checksum() {
        // 校验和字节错误时解码仍然成功，验证是调用方的职责
        let raw = [START_BYTE, 0x00, 0x01, 0x20, 0xEE, END_BYTE];
        let frame = decode(&raw).unwrap();
        assert_eq!(frame.checksum, 0xEE);
        assert_ne!(frame.checksum, frame.expected_response_checksum());
    }

    #[test]
    fn test_response_checksum_includes_message_type() {
        let payload = [0x10u8, 0x20];
        assert_eq!(request_checksum(&payload), 0x30);
        assert_eq!(response_checksum(MessageType::MoveGates, &payload), 0x32);
        // 空 payload 时响应校验和恰好等于类型字节
        assert_eq!(response_checksum(MessageType::GatesInit, &[]), 0x01);
    }

    #[test]
    fn test_checksum_wraps_mod_256() {
        let payload = [0xFFu8, 0x02];
        assert_eq!(request_checksum(&payload), 0x01);
    }
}
