#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![allow(private_bounds)]
#![doc = "calyx-core: 双所有权字节缓冲的核心契约层。"]
#![doc = ""]
#![doc = "本 crate 只定义契约，不落地任何具体内存策略："]
#![doc = "1. 错误域：稳定错误码 + 可回溯的 `CoreError`；"]
#![doc = "2. 分配器协作者：`ByteAllocator`，缓冲实现通过它申请与归还原始内存。"]
#![doc = ""]
#![doc = "== 内存分配依赖 =="]
#![doc = "`calyx-core` 定位于 `no_std + alloc` 场景：错误消息依赖 [`alloc`] 中的 `Cow`、`Box` 等类型。"]
#![doc = "纯 `no_std`（无分配器）环境暂不支持。"]

extern crate alloc;

mod sealed;

pub mod allocator;
pub mod error;

pub use allocator::ByteAllocator;
pub use error::{CoreError, ErrorCause, Result, codes};
