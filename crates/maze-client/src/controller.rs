//! 闸门控制器：板拓扑与响应解释
//!
//! 控制器是纯状态机：输入是链路层交来的 `(message_type, payload)`，
//! 输出是事件列表。板列表在一个会话内只增不减、不重排；
//! 板与响应按位置对应，不按地址对应。

use crate::error::ControllerError;
use crate::event::MazeEvent;
use maze_protocol::{GateSet, MessageType};
use tracing::{debug, warn};

/// 一块闸门驱动板
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// 总线地址，发现时赋值，之后不变
    address: u8,
    /// 可用闸门集合，由闸门初始化响应一次性填充
    enabled_gates: GateSet,
    /// 最近一次命令要求的闸门集合
    commanded_gates: GateSet,
    /// 最近一次响应报告的闸门集合
    reported_gates: GateSet,
}

impl Board {
    fn new(address: u8) -> Self {
        Self {
            address,
            enabled_gates: GateSet::EMPTY,
            commanded_gates: GateSet::EMPTY,
            reported_gates: GateSet::EMPTY,
        }
    }

    /// 总线地址
    pub fn address(&self) -> u8 {
        self.address
    }

    /// 可用闸门集合
    pub fn enabled_gates(&self) -> GateSet {
        self.enabled_gates
    }

    /// 最近命令的闸门集合
    pub fn commanded_gates(&self) -> GateSet {
        self.commanded_gates
    }

    /// 最近报告的闸门集合
    pub fn reported_gates(&self) -> GateSet {
        self.reported_gates
    }
}

/// 闸门控制器
#[derive(Debug, Default)]
pub struct GateController {
    boards: Vec<Board>,
}

impl GateController {
    /// 空拓扑的控制器（系统初始化响应到来之前没有任何板）
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前已发现的板
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// 编码一次移动命令的 payload（不修改拓扑）
    ///
    /// `desired[i]` 是板 `i` 的目标闸门集合；缺省的尾部板视为
    /// "全部落下"。输出恒为每块板一个字节。命令态由
    /// [`record_move_command`](Self::record_move_command) 在请求真正
    /// 写上链路之后记录——被拒绝的请求不能动在途命令的失配基线。
    ///
    /// # Errors
    /// - `ControllerError::BoardIndexOutOfRange`: 目标条目多于已发现的板
    pub fn encode_move_command(&self, desired: &[GateSet]) -> Result<Vec<u8>, ControllerError> {
        if desired.len() > self.boards.len() {
            return Err(ControllerError::BoardIndexOutOfRange {
                entries: desired.len(),
                board_count: self.boards.len(),
            });
        }

        let mut payload = Vec::with_capacity(self.boards.len());
        for i in 0..self.boards.len() {
            let gates = desired.get(i).copied().unwrap_or(GateSet::EMPTY);
            payload.push(gates.bits());
        }
        Ok(payload)
    }

    /// 记录一次已发出的移动命令的命令态
    ///
    /// 调用方保证 `desired` 与刚发送的 payload 一致（条目数已校验过）。
    pub fn record_move_command(&mut self, desired: &[GateSet]) {
        for (i, board) in self.boards.iter_mut().enumerate() {
            board.commanded_gates = desired.get(i).copied().unwrap_or(GateSet::EMPTY);
        }
    }

    /// 解释一条校验通过的响应
    ///
    /// # Errors
    /// - `ControllerError::BoardIndexOutOfRange`: payload 条目多于已
    ///   发现的板；响应被整体丢弃，拓扑不做部分修改
    pub fn handle_response(
        &mut self,
        message_type: MessageType,
        payload: &[u8],
    ) -> Result<Vec<MazeEvent>, ControllerError> {
        match message_type {
            MessageType::SystemInit => Ok(self.apply_system_init(payload)),
            MessageType::GatesInit => self.apply_gates_init(payload),
            MessageType::MoveGates => self.apply_move_result(payload),
        }
    }

    /// 系统初始化响应：payload 是按发现顺序排列的板地址
    fn apply_system_init(&mut self, payload: &[u8]) -> Vec<MazeEvent> {
        let mut events = Vec::with_capacity(payload.len());
        for &address in payload {
            let index = self.boards.len();
            self.boards.push(Board::new(address));
            debug!("Discovered board {index} at address 0x{address:02X}");
            events.push(MazeEvent::BoardDiscovered { index, address });
        }
        events
    }

    /// 闸门初始化响应：每块已发现的板一个位图字节，按位置对应
    fn apply_gates_init(&mut self, payload: &[u8]) -> Result<Vec<MazeEvent>, ControllerError> {
        if payload.len() > self.boards.len() {
            return Err(ControllerError::BoardIndexOutOfRange {
                entries: payload.len(),
                board_count: self.boards.len(),
            });
        }

        let mut events = Vec::with_capacity(payload.len());
        for (index, &bits) in payload.iter().enumerate() {
            let gates = GateSet::from_bits(bits);
            self.boards[index].enabled_gates = gates;
            debug!("Board {index}: enabled gates {gates}");
            events.push(MazeEvent::GatesEnabled { index, gates });
        }
        Ok(events)
    }

    /// 移动响应：每块板一个实际态位图，与命令态做对称差
    fn apply_move_result(&mut self, payload: &[u8]) -> Result<Vec<MazeEvent>, ControllerError> {
        if payload.len() > self.boards.len() {
            return Err(ControllerError::BoardIndexOutOfRange {
                entries: payload.len(),
                board_count: self.boards.len(),
            });
        }

        let mut events = Vec::new();
        let mut mismatch_count = 0;
        for (index, &bits) in payload.iter().enumerate() {
            let board = &mut self.boards[index];
            board.reported_gates = GateSet::from_bits(bits);

            let mismatched = board.commanded_gates ^ board.reported_gates;
            for gate in mismatched.indices() {
                warn!(
                    "Gate {gate} on board {index} did not move: commanded {}, reported {}",
                    board.commanded_gates, board.reported_gates
                );
                events.push(MazeEvent::GateMoveFailed { board: index, gate });
                mismatch_count += 1;
            }
        }

        if mismatch_count > 0 {
            events.push(MazeEvent::MoveHadErrors { mismatch_count });
        } else {
            events.push(MazeEvent::MoveSucceeded);
        }
        Ok(events)
    }
}
