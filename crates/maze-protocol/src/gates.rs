//! 闸门位图类型
//!
//! 每块驱动板最多 8 个闸门，线格式里用一个字节表示：
//! bit i 置 1 ⇔ 闸门 i 处于（或应当处于）升起状态。

use std::fmt;
use std::ops::BitXor;

/// 一块板上的闸门集合（u8 位图的类型安全包装）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GateSet(u8);

impl GateSet {
    /// 空集合（所有闸门落下）
    pub const EMPTY: GateSet = GateSet(0);

    /// 每块板的闸门数量
    pub const GATE_COUNT: u8 = 8;

    /// 从原始位图字节构造
    pub const fn from_bits(bits: u8) -> Self {
        GateSet(bits)
    }

    /// 从闸门编号序列构造
    ///
    /// 超出 0..=7 的编号会被静默丢弃（防御性截断，不是错误）。
    pub fn from_indices<I>(indices: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let mut set = GateSet::EMPTY;
        for gate in indices {
            set.insert(gate);
        }
        set
    }

    /// 原始位图字节
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// 集合是否为空
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 集合中的闸门数量
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// 闸门 `gate` 是否在集合中（编号越界返回 false）
    pub const fn contains(self, gate: u8) -> bool {
        gate < Self::GATE_COUNT && self.0 & (1 << gate) != 0
    }

    /// 加入闸门 `gate`（编号越界时静默忽略）
    pub fn insert(&mut self, gate: u8) {
        if gate < Self::GATE_COUNT {
            self.0 |= 1 << gate;
        }
    }

    /// 按升序迭代集合中的闸门编号
    pub fn indices(self) -> impl Iterator<Item = u8> {
        (0..Self::GATE_COUNT).filter(move |gate| self.contains(*gate))
    }

    /// 与另一集合的对称差（命令态 vs 实际态的失配闸门）
    pub const fn mismatch(self, other: GateSet) -> GateSet {
        GateSet(self.0 ^ other.0)
    }
}

impl BitXor for GateSet {
    type Output = GateSet;

    fn bitxor(self, rhs: GateSet) -> GateSet {
        self.mismatch(rhs)
    }
}

impl From<u8> for GateSet {
    fn from(bits: u8) -> Self {
        GateSet(bits)
    }
}

impl From<GateSet> for u8 {
    fn from(set: GateSet) -> u8 {
        set.bits()
    }
}

impl fmt::Display for GateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for gate in self.indices() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{gate}")?;
            first = false;
        }
        write!(f, "}}")
    }
}
