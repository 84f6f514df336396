use alloc::alloc::{Layout, alloc_zeroed, dealloc};
use alloc::format;
use alloc::sync::Arc;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use calyx_core::{ByteAllocator, CoreError, Result, codes};

/// `SystemAllocator` 是默认的分配器协作者，直接落到全局堆。
///
/// # 模块角色（Why）
/// - 为 [`Buffer`](crate::Buffer) 提供开箱即用的内存来源，调用方无需先搭建池化设施；
/// - 以原子计数跟踪 `allocated_bytes`、`released_bytes`、`live_allocations` 等指标，
///   支撑 [`statistics`](Self::statistics) 快照以及后续的监控集成。
///
/// # 核心机制（How）
/// - `allocate` 使用 `alloc_zeroed` 申请按单字节对齐的块，零初始化以满足
///   [`ByteAllocator`] 的后置条件；
/// - 指标挂在 `Arc` 上，克隆分配器（缓冲深拷贝、detach 移交）共享同一份计数。
///
/// # 契约说明（What）
/// - **线程安全**：全部状态为原子计数，满足 `Send + Sync`；
/// - **后置条件**：`allocate` 失败（容量溢出 `isize::MAX` 或堆耗尽）时返回
///   [`codes::BUFFER_ALLOCATION_FAILED`]，并递增 `failed_allocations`，不会中止进程。
#[derive(Clone, Default)]
pub struct SystemAllocator {
    metrics: Arc<AllocatorMetrics>,
}

impl SystemAllocator {
    /// 创建独立计数的分配器实例。
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取当前指标快照。
    pub fn statistics(&self) -> AllocatorStats {
        AllocatorStats {
            allocated_bytes: self.metrics.allocated_bytes.load(Ordering::Relaxed),
            released_bytes: self.metrics.released_bytes.load(Ordering::Relaxed),
            live_allocations: self.metrics.live_allocations.load(Ordering::Relaxed),
            failed_allocations: self.metrics.failed_allocations.load(Ordering::Relaxed),
        }
    }
}

impl ByteAllocator for SystemAllocator {
    fn allocate(&self, capacity: usize) -> Result<NonNull<u8>, CoreError> {
        debug_assert!(capacity > 0, "空块应由调用方短路处理");
        let layout = Layout::array::<u8>(capacity).map_err(|_| {
            self.metrics.record_failure();
            CoreError::new(
                codes::BUFFER_ALLOCATION_FAILED,
                format!("请求容量 {capacity} 超出可分配上限"),
            )
        })?;
        // 零初始化是 ByteAllocator 的后置条件：缓冲据此才能安全暴露 [0, size)。
        let ptr = unsafe { alloc_zeroed(layout) };
        match NonNull::new(ptr) {
            Some(ptr) => {
                self.metrics.record_allocation(capacity);
                Ok(ptr)
            }
            None => {
                self.metrics.record_failure();
                Err(CoreError::new(
                    codes::BUFFER_ALLOCATION_FAILED,
                    format!("堆无法满足 {capacity} 字节的分配请求"),
                ))
            }
        }
    }

    unsafe fn release(&self, ptr: NonNull<u8>, capacity: usize) {
        debug_assert!(capacity > 0, "空块不应进入 release");
        // 容量来自一次成功的 allocate，布局构造必然成立。
        let layout = unsafe { Layout::from_size_align_unchecked(capacity, 1) };
        unsafe { dealloc(ptr.as_ptr(), layout) };
        self.metrics.record_release(capacity);
    }
}

/// 分配器指标快照，字段语义与读取时刻一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorStats {
    /// 历史累计分配的字节数。
    pub allocated_bytes: usize,
    /// 历史累计归还的字节数。
    pub released_bytes: usize,
    /// 当前存活（已分配未归还）的块数。
    pub live_allocations: usize,
    /// 累计失败的分配请求数。
    pub failed_allocations: u64,
}

#[derive(Default)]
struct AllocatorMetrics {
    allocated_bytes: AtomicUsize,
    released_bytes: AtomicUsize,
    live_allocations: AtomicUsize,
    failed_allocations: AtomicU64,
}

impl AllocatorMetrics {
    fn record_allocation(&self, capacity: usize) {
        self.allocated_bytes.fetch_add(capacity, Ordering::Relaxed);
        self.live_allocations.fetch_add(1, Ordering::Relaxed);
    }

    fn record_release(&self, capacity: usize) {
        self.released_bytes.fetch_add(capacity, Ordering::Relaxed);
        let _ = self
            .live_allocations
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |prev| {
                Some(prev.saturating_sub(1))
            });
    }

    fn record_failure(&self) {
        self.failed_allocations.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_returns_zeroed_block_and_updates_metrics() {
        let allocator = SystemAllocator::new();
        let ptr = allocator.allocate(32).expect("堆分配不应失败");
        let bytes = unsafe { core::slice::from_raw_parts(ptr.as_ptr(), 32) };
        assert!(bytes.iter().all(|&b| b == 0), "新块必须零初始化");

        let stats = allocator.statistics();
        assert_eq!(stats.allocated_bytes, 32);
        assert_eq!(stats.live_allocations, 1);

        unsafe { allocator.release(ptr, 32) };
        let after = allocator.statistics();
        assert_eq!(after.released_bytes, 32);
        assert_eq!(after.live_allocations, 0);
    }

    #[test]
    fn clones_share_the_same_metrics() {
        let allocator = SystemAllocator::new();
        let twin = allocator.clone();
        let ptr = twin.allocate(8).expect("堆分配不应失败");
        assert_eq!(allocator.statistics().live_allocations, 1);
        unsafe { allocator.release(ptr, 8) };
        assert_eq!(twin.statistics().live_allocations, 0);
    }

    #[test]
    fn oversized_request_fails_with_stable_code() {
        let allocator = SystemAllocator::new();
        let err = allocator
            .allocate(usize::MAX)
            .expect_err("超出 isize::MAX 的请求应失败");
        assert_eq!(err.code(), codes::BUFFER_ALLOCATION_FAILED);
        assert_eq!(allocator.statistics().failed_allocations, 1);
    }
}
