#![cfg_attr(not(feature = "std"), no_std)]

//! `calyx-buffer` 提供区分逻辑长度与容量、可自有或借用底层内存的字节缓冲。
//!
//! # 模块定位（Why）
//! - 为 `calyx-core` 的分配器契约提供落地实体：[`Buffer`] 负责逻辑长度、容量与
//!   所有权三者的一致性，原始内存的申请与归还全部委派给
//!   [`ByteAllocator`](calyx_core::ByteAllocator) 协作者。
//! - 缓冲有两种存储形态：自有（通过分配器申请并在析构时归还）与借用
//!   （包装调用方仍持有的内存块，生命周期由借用约束，永不归还）。
//!   增长操作在借用态上自动切换为自有，借出内存原样保留。
//!
//! # 设计概要（How）
//! - `buffer` 模块实现 [`Buffer`]、所有权移交的 [`DetachedBlock`] 与增长结果 [`Growth`]；
//! - `growth` 模块将扩容策略表达为纯函数 [`GrowthPolicy::next_capacity`]，便于独立测试；
//! - `system` 模块提供默认分配器 [`SystemAllocator`]，以原子计数暴露
//!   [`AllocatorStats`] 快照，支撑上层观测。
//!
//! # 命名约定（Consistency）
//! - 延续 `calyx-core` 的术语：`capacity` 指总可寻址字节，`len` 指逻辑长度，
//!   两者满足 `len <= capacity` 的全程不变式。

extern crate alloc;

mod buffer;
mod growth;
mod raw;
mod system;

pub use buffer::{Buffer, DetachedBlock, Growth};
pub use growth::GrowthPolicy;
pub use system::{AllocatorStats, SystemAllocator};
