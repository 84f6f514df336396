//! 批量字节搬运原语。
//!
//! 缓冲的所有拷贝路径（构造复制、赋值、扩容迁移、追加）统一经过这里，
//! 便于在单点审计别名前提。

/// 将 `len` 字节从 `src` 搬运到 `dst`。
///
/// # Safety
/// - `src` 与 `dst` 指向的区域不得重叠（调用方契约）；
/// - 两侧各自必须有至少 `len` 字节的可读/可写空间。
pub(crate) unsafe fn copy_bytes(dst: *mut u8, src: *const u8, len: usize) {
    if len == 0 {
        return;
    }
    unsafe { core::ptr::copy_nonoverlapping(src, dst, len) }
}
