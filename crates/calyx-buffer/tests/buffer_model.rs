//! `buffer_model` 影子模型测试：用朴素 `Vec<u8>` 模型对照 `Buffer` 的实现。
//!
//! # 建模约定（How）
//! - 模型持有一段与真实容量等长的字节表（`backing`）与逻辑长度 `len`；
//! - 新分配内存按零初始化建模；容量内 `set_len` 暴露的是 `backing`
//!   中的既有字节（可能是此前写入后又被截断的"陈旧"内容）；
//! - 容量增长尺寸完全复用公开的 [`GrowthPolicy`]，与实现共享同一套算术。
//!
//! # 验收口径（What）
//! - 每步操作后 `buffer.as_slice()` 必须与模型的 `[0, len)` 前缀逐字节相等，
//!   且 `len`/`capacity`/增长结果一致。

use calyx_buffer::{Buffer, Growth, GrowthPolicy};
use proptest::collection::vec;
use proptest::prelude::*;

/// 对 `Buffer` 的朴素参考实现：显式维护容量内的全部字节。
struct ModelBuffer {
    backing: Vec<u8>,
    len: usize,
    policy: GrowthPolicy,
}

impl ModelBuffer {
    fn new() -> Self {
        Self {
            backing: Vec::new(),
            len: 0,
            policy: GrowthPolicy::default(),
        }
    }

    fn capacity(&self) -> usize {
        self.backing.len()
    }

    fn content(&self) -> &[u8] {
        &self.backing[..self.len]
    }

    /// 迁移到 `new_capacity` 字节的零初始化新块，仅带走 `[0, len)`。
    fn migrate(&mut self, new_capacity: usize) {
        let mut fresh = vec![0u8; new_capacity];
        fresh[..self.len].copy_from_slice(&self.backing[..self.len]);
        self.backing = fresh;
    }

    fn assign(&mut self, src: &[u8]) {
        if src.len() > self.capacity() {
            // 赋值增长按源长度精确分配，不经摊还策略。
            self.backing = vec![0u8; src.len()];
        }
        self.backing[..src.len()].copy_from_slice(src);
        self.len = src.len();
    }

    fn set_capacity(&mut self, capacity: usize) -> Growth {
        if capacity <= self.capacity() {
            return Growth::Retained;
        }
        self.migrate(capacity);
        Growth::Grown
    }

    fn set_len(&mut self, len: usize) -> Growth {
        let growth = if len > self.capacity() {
            self.migrate(self.policy.next_capacity(self.capacity(), len));
            Growth::Grown
        } else {
            Growth::Retained
        };
        self.len = len;
        growth
    }

    fn append(&mut self, src: &[u8]) {
        let new_len = self.len + src.len();
        if new_len > self.capacity() {
            self.migrate(self.policy.next_capacity(self.capacity(), new_len));
        }
        self.backing[self.len..new_len].copy_from_slice(src);
        self.len = new_len;
    }

    fn fill(&mut self, byte: u8) {
        self.backing[..self.len].fill(byte);
    }

    fn clear(&mut self) {
        self.len = 0;
    }
}

/// 施加在真实缓冲与模型上的单步操作。
#[derive(Debug, Clone)]
enum Op {
    Assign(Vec<u8>),
    SetCapacity(usize),
    SetLen(usize),
    Append(Vec<u8>),
    Fill(u8),
    Clear,
    FindRoundTrip(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        vec(any::<u8>(), 0..96).prop_map(Op::Assign),
        (0usize..192).prop_map(Op::SetCapacity),
        (0usize..192).prop_map(Op::SetLen),
        vec(any::<u8>(), 0..48).prop_map(Op::Append),
        any::<u8>().prop_map(Op::Fill),
        Just(Op::Clear),
        any::<u8>().prop_map(Op::FindRoundTrip),
    ]
}

proptest! {
    /// 任意操作序列下，真实缓冲与影子模型保持逐字节一致。
    #[test]
    fn buffer_matches_shadow_model(ops in vec(op_strategy(), 1..48)) {
        let mut buffer = Buffer::new();
        let mut model = ModelBuffer::new();

        for op in ops {
            match op {
                Op::Assign(src) => {
                    buffer.assign(&src).expect("模型规模下的赋值不应失败");
                    model.assign(&src);
                }
                Op::SetCapacity(capacity) => {
                    let real = buffer
                        .set_capacity(capacity)
                        .expect("模型规模下的容量设置不应失败");
                    let expected = model.set_capacity(capacity);
                    prop_assert_eq!(real, expected, "增长判定与模型不一致");
                }
                Op::SetLen(len) => {
                    let real = buffer
                        .set_len(len)
                        .expect("模型规模下的长度设置不应失败");
                    let expected = model.set_len(len);
                    prop_assert_eq!(real, expected, "增长判定与模型不一致");
                }
                Op::Append(src) => {
                    buffer.append(&src).expect("模型规模下的追加不应失败");
                    model.append(&src);
                }
                Op::Fill(byte) => {
                    buffer.fill(byte);
                    model.fill(byte);
                }
                Op::Clear => {
                    buffer.clear();
                    model.clear();
                }
                Op::FindRoundTrip(byte) => {
                    let expected = model.content().iter().position(|&b| b == byte);
                    prop_assert_eq!(buffer.find(byte), expected);
                    let expected_rev = model.content().iter().rposition(|&b| b == byte);
                    prop_assert_eq!(buffer.rfind(byte), expected_rev);
                }
            }

            prop_assert_eq!(buffer.len(), model.len, "逻辑长度与模型不一致");
            prop_assert_eq!(
                buffer.capacity(),
                model.capacity(),
                "容量轨迹与模型不一致"
            );
            prop_assert_eq!(buffer.as_slice(), model.content(), "内容与模型不一致");
        }
    }
}
