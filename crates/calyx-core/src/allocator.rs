use core::ptr::NonNull;

use crate::{CoreError, Result, sealed::Sealed};

/// `ByteAllocator` 定义缓冲与原始内存之间的分配器协作契约。
///
/// # 设计背景（Why）
/// - 缓冲本体只负责“逻辑长度 / 容量 / 所有权”三件事，申请与归还原始内存
///   是外部协作者的职责；通过 Trait 把这条缝隙显式化，测试可以注入探针分配器，
///   宿主可以替换为池化或 arena 策略。
/// - 对标 `Vec` 的 `Allocator` 泛型参数与池化缓冲向回收器注入句柄的做法，
///   分配器以值的形式存放在缓冲内部，生命周期与缓冲等长。
///
/// # 逻辑解析（How）
/// - `allocate` 返回零初始化的块：这一强化使缓冲可以把 `[0, size)` 安全地暴露为
///   `&[u8]`，即使逻辑长度刚刚越过旧内容的边界。对外契约仍然只承诺“内容未定义”，
///   实现者不得依赖零值。
/// - `release` 是 `unsafe fn`：指针与容量必须与此前某次 `allocate` 的结果逐字段对应，
///   这是安全代码无法验证的前置条件。
///
/// # 契约说明（What）
/// - **输入参数**：
///   - `allocate(capacity)` 的 `capacity` 恒大于 0，空块由调用方短路处理；
///   - `release(ptr, capacity)` 的两个参数必须来自同一次成功的 `allocate`。
/// - **返回值**：`allocate` 失败时返回携带
///   [`codes::BUFFER_ALLOCATION_FAILED`](crate::codes::BUFFER_ALLOCATION_FAILED)
///   的 [`CoreError`]，而不是中止进程。
/// - **前置条件**：实现必须满足 `Send + Sync`，以便缓冲在线程间移动。
/// - **后置条件**：成功的 `allocate` 返回至少 `capacity` 字节、按单字节对齐、
///   全部置零的可写内存。
///
/// # 设计考量（Trade-offs & Gotchas)
/// - 放弃 `std::alloc::Allocator`（尚未稳定）而定义窄接口，只覆盖缓冲实际需要的
///   两个操作，降低实现门槛。
/// - 零初始化有一次 `memset` 的代价；对缓冲的典型场景（网络/文件分块读写），
///   这笔开销远小于越界读取带来的未定义行为风险。
#[allow(unsafe_code)]
pub trait ByteAllocator: Send + Sync + Sealed {
    /// 申请一块至少 `capacity` 字节、零初始化的内存。
    fn allocate(&self, capacity: usize) -> Result<NonNull<u8>, CoreError>;

    /// 归还此前由 [`allocate`](Self::allocate) 产出的内存块。
    ///
    /// # Safety
    /// - `ptr` 必须来自同一分配器实例（或其克隆）的一次成功 `allocate`；
    /// - `capacity` 必须与该次 `allocate` 的请求值一致；
    /// - 同一块内存只能归还一次，归还后不得再访问。
    unsafe fn release(&self, ptr: NonNull<u8>, capacity: usize);
}
