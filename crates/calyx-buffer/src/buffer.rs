use alloc::borrow::Cow;
use alloc::format;
use core::fmt;
use core::mem;
use core::ops::{Deref, DerefMut};
use core::ptr::NonNull;
use core::slice;

use calyx_core::{ByteAllocator, CoreError, Result, codes};

use crate::growth::GrowthPolicy;
use crate::raw;
use crate::system::SystemAllocator;

/// 表征一次长度/容量设置是否触发了重新分配。
///
/// - `Grown`：容量不足，已迁移到新的自有块；
/// - `Retained`：请求落在现有容量内，仅更新簿记，指针身份保持不变。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    Grown,
    Retained,
}

impl Growth {
    /// 是否发生了重新分配。
    pub fn is_grown(self) -> bool {
        matches!(self, Growth::Grown)
    }
}

/// 缓冲的存储形态：自有块在析构时经分配器归还，借用块永不归还。
///
/// 以类型区分两种形态（而非运行期布尔标记），借用态携带生命周期约束，
/// “释放借来的内存”“重复释放自有内存”两类误用在编译期即被拒绝。
enum Storage<'a> {
    Owned(OwnedBlock),
    Borrowed(&'a mut [u8]),
}

struct OwnedBlock {
    ptr: NonNull<u8>,
    capacity: usize,
}

impl OwnedBlock {
    /// 零容量占位块：悬垂指针 + 容量 0，不会进入 release。
    const EMPTY: OwnedBlock = OwnedBlock {
        ptr: NonNull::dangling(),
        capacity: 0,
    };
}

/// `Buffer` 是区分逻辑长度与容量、可自有或借用底层内存的可增长字节缓冲。
///
/// # 设计动机（Why）
/// - 协议编解码与 IO 分块场景需要一个“先预留、后填充”的字节容器：
///   逻辑长度（`len`）描述当前有效数据，容量（`capacity`）描述已寻址空间，
///   两者分离才能做到增长摊还与零拷贝包装。
/// - 双所有权是唯一的非平凡语义：缓冲既可以独占一块由
///   [`ByteAllocator`] 申请的内存（自有态），也可以透明包装调用方仍然
///   持有的内存块（借用态）。借用态允许在容量内读写，但永不控制其生命周期。
///
/// # 架构关系（How）
/// - 原始内存的申请/归还全部委派给分配器协作者 `A`，拷贝统一经过内部搬运原语；
/// - 扩容幅度由纯函数 [`GrowthPolicy::next_capacity`] 决定，显式容量请求则按值精确分配；
/// - 借用态上的任何增长都会迁移到新的自有块，借出内存原样保留、永不归还，
///   从借用到自有的转换对出借方是无感知且无竞争的。
///
/// # 契约说明（What）
/// - **全程不变式**：每个公开操作结束后 `len() <= capacity()`；
/// - **相等语义**：只比较 `[0, len)` 的字节内容，与容量、所有权形态、存储地址无关；
/// - **强异常安全**：失败的操作不产生任何可观察的状态变化——新块总是先于
///   现有状态变更完成分配；
/// - **内容约定**：增长暴露出的新字节内容未定义；当前实现恰好置零，
///   调用方不得依赖该事实。
///
/// # 风险与取舍（Trade-offs）
/// - 自有态以裸指针 + 容量表示，`Send`/`Sync` 依赖“写操作要求 `&mut self`”的
///   借用规则人工论证（见文末 `unsafe impl`）；维护时不得暴露新的 `&self` 可变路径。
pub struct Buffer<'a, A: ByteAllocator = SystemAllocator> {
    storage: Storage<'a>,
    len: usize,
    policy: GrowthPolicy,
    alloc: A,
}

impl<'a> Buffer<'a> {
    /// 创建空缓冲：长度 0、容量 0、无分配。
    pub fn new() -> Self {
        Self::new_in(SystemAllocator::new())
    }

    /// 创建长度为 `len` 的自有缓冲，容量至少为 `len`；内容未定义。
    pub fn with_len(len: usize) -> Result<Self, CoreError> {
        Self::with_len_in(len, SystemAllocator::new())
    }

    /// 创建长度为 `len`、容量至少为 `capacity` 的自有缓冲。
    ///
    /// `capacity < len` 时返回 [`codes::BUFFER_INVALID_ARGUMENT`]。
    pub fn with_len_and_capacity(len: usize, capacity: usize) -> Result<Self, CoreError> {
        Self::with_len_and_capacity_in(len, capacity, SystemAllocator::new())
    }

    /// 深拷贝 `src` 构造自有缓冲。
    pub fn from_slice(src: &[u8]) -> Result<Self, CoreError> {
        Self::from_slice_in(src, SystemAllocator::new())
    }

    /// 深拷贝 `src` 并预留至少 `capacity` 字节容量。
    pub fn from_slice_with_capacity(src: &[u8], capacity: usize) -> Result<Self, CoreError> {
        Self::from_slice_with_capacity_in(src, capacity, SystemAllocator::new())
    }

    /// 以借用态包装调用方仍持有的内存块：零拷贝、零分配。
    ///
    /// 容量为 `block.len()`，逻辑长度为 `len`；`len > block.len()` 时返回
    /// [`codes::BUFFER_INVALID_ARGUMENT`]。出借方在缓冲存续期间保有该内存的
    /// 生命周期责任，缓冲只会在容量内读写。
    pub fn wrap(block: &'a mut [u8], len: usize) -> Result<Self, CoreError> {
        Self::wrap_in(block, len, SystemAllocator::new())
    }

    /// 直接接管调用方提交的一块分配（零拷贝移交所有权）。
    ///
    /// # Safety
    /// - `ptr`/`capacity` 必须来自默认分配器（[`SystemAllocator`]）的一次成功
    ///   `allocate`，且此后未被归还；
    /// - 块内全部 `capacity` 字节必须已初始化（`allocate` 产出的零初始化块天然满足）。
    pub unsafe fn from_raw_parts(
        ptr: NonNull<u8>,
        len: usize,
        capacity: usize,
    ) -> Result<Self, CoreError> {
        unsafe { Self::from_raw_parts_in(ptr, len, capacity, SystemAllocator::new()) }
    }
}

impl<'a, A: ByteAllocator> Buffer<'a, A> {
    /// 以指定分配器创建空缓冲。
    pub fn new_in(alloc: A) -> Self {
        Self {
            storage: Storage::Owned(OwnedBlock::EMPTY),
            len: 0,
            policy: GrowthPolicy::default(),
            alloc,
        }
    }

    /// 以指定分配器创建长度为 `len` 的自有缓冲。
    pub fn with_len_in(len: usize, alloc: A) -> Result<Self, CoreError> {
        Self::with_len_and_capacity_in(len, len, alloc)
    }

    /// 以指定分配器创建长度 `len`、容量至少 `capacity` 的自有缓冲。
    ///
    /// # 契约说明（What）
    /// - **前置条件**：`capacity >= len`，否则返回 [`codes::BUFFER_INVALID_ARGUMENT`]
    ///   且不发生分配；
    /// - **后置条件**：`capacity == 0` 时退化为空缓冲；否则持有一块恰好
    ///   `capacity` 字节的自有内存。
    pub fn with_len_and_capacity_in(
        len: usize,
        capacity: usize,
        alloc: A,
    ) -> Result<Self, CoreError> {
        if capacity < len {
            return Err(invalid_argument(format!(
                "容量 {capacity} 小于请求长度 {len}"
            )));
        }
        if capacity == 0 {
            return Ok(Self::new_in(alloc));
        }
        let ptr = alloc.allocate(capacity)?;
        Ok(Self {
            storage: Storage::Owned(OwnedBlock { ptr, capacity }),
            len,
            policy: GrowthPolicy::default(),
            alloc,
        })
    }

    /// 以指定分配器深拷贝 `src`。
    pub fn from_slice_in(src: &[u8], alloc: A) -> Result<Self, CoreError> {
        Self::from_slice_with_capacity_in(src, src.len(), alloc)
    }

    /// 以指定分配器深拷贝 `src` 并预留容量。
    pub fn from_slice_with_capacity_in(
        src: &[u8],
        capacity: usize,
        alloc: A,
    ) -> Result<Self, CoreError> {
        let mut buffer = Self::with_len_and_capacity_in(src.len(), capacity, alloc)?;
        buffer.as_mut_slice().copy_from_slice(src);
        Ok(buffer)
    }

    /// 以指定分配器包装借用块；分配器仅在后续增长转为自有态时使用。
    pub fn wrap_in(block: &'a mut [u8], len: usize, alloc: A) -> Result<Self, CoreError> {
        if len > block.len() {
            return Err(invalid_argument(format!(
                "逻辑长度 {len} 超出借用块容量 {}",
                block.len()
            )));
        }
        Ok(Self {
            storage: Storage::Borrowed(block),
            len,
            policy: GrowthPolicy::default(),
            alloc,
        })
    }

    /// 接管 `alloc` 产出的一块分配。
    ///
    /// `len > capacity` 时返回 [`codes::BUFFER_INVALID_ARGUMENT`]，不接管内存。
    ///
    /// # Safety
    /// - `ptr`/`capacity` 必须来自 `alloc`（或其克隆）的一次成功 `allocate`，
    ///   且此后未被归还；
    /// - 块内全部 `capacity` 字节必须已初始化。
    pub unsafe fn from_raw_parts_in(
        ptr: NonNull<u8>,
        len: usize,
        capacity: usize,
        alloc: A,
    ) -> Result<Self, CoreError> {
        if len > capacity {
            return Err(invalid_argument(format!(
                "逻辑长度 {len} 超出接管块容量 {capacity}"
            )));
        }
        Ok(Self {
            storage: Storage::Owned(OwnedBlock { ptr, capacity }),
            len,
            policy: GrowthPolicy::default(),
            alloc,
        })
    }

    /// 深拷贝当前内容，产物恒为自有态、存储独立。
    ///
    /// 对应复制构造：无论自身是自有还是借用，副本都持有新的分配，
    /// 改动任意一方不影响另一方。分配失败时原缓冲不变。
    pub fn try_clone(&self) -> Result<Buffer<'static, A>, CoreError>
    where
        A: Clone,
    {
        let mut copy = Buffer::from_slice_in(self.as_slice(), self.alloc.clone())?;
        copy.policy = self.policy;
        Ok(copy)
    }

    /// 逻辑长度。
    pub fn len(&self) -> usize {
        self.len
    }

    /// 是否不含有效数据。
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 当前容量（总可寻址字节）。
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Owned(block) => block.capacity,
            Storage::Borrowed(block) => block.len(),
        }
    }

    /// 是否处于自有态（析构时负责归还底层内存）。
    pub fn is_owner(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    /// 只读视图：`[0, len)`。
    pub fn as_slice(&self) -> &[u8] {
        match &self.storage {
            // 自有块全程保持初始化（分配零填充 + 仅整块迁移），暴露 [0, len) 是安全的。
            Storage::Owned(block) => unsafe {
                slice::from_raw_parts(block.ptr.as_ptr(), self.len)
            },
            Storage::Borrowed(block) => &block[..self.len],
        }
    }

    /// 可写视图：`[0, len)`。
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let len = self.len;
        match &mut self.storage {
            Storage::Owned(block) => unsafe { slice::from_raw_parts_mut(block.ptr.as_ptr(), len) },
            Storage::Borrowed(block) => &mut block[..len],
        }
    }

    /// 存储首字节地址；用于指针身份断言与 FFI 场景。
    pub fn as_ptr(&self) -> *const u8 {
        match &self.storage {
            Storage::Owned(block) => block.ptr.as_ptr(),
            Storage::Borrowed(block) => block.as_ptr(),
        }
    }

    /// 存储首字节的可写地址。
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.data_ptr_mut()
    }

    /// 访问分配器协作者。
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// 当前扩容策略。
    pub fn growth_policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// 替换扩容策略，仅影响后续 `set_len`/`append` 的增长幅度。
    pub fn set_growth_policy(&mut self, policy: GrowthPolicy) {
        self.policy = policy;
    }

    /// 以 `src` 的深拷贝替换当前内容。
    ///
    /// # 契约说明（What）
    /// - **复用优化**：`src.len() <= capacity()` 时必须复用现有存储——不重新分配、
    ///   指针身份保持不变，仅拷贝字节并更新长度。借用态在容量内同样走此路径
    ///   （借用块允许写入，只是不控制生命周期）。
    /// - **增长路径**：容量不足时按 `src.len()` 精确分配新自有块，拷贝后替换；
    ///   旧块若为自有则归还，若为借用则原样保留。
    /// - **失败语义**：分配失败时缓冲保持原状。
    pub fn assign(&mut self, src: &[u8]) -> Result<(), CoreError> {
        if src.len() <= self.capacity() {
            let dst = self.data_ptr_mut();
            unsafe { raw::copy_bytes(dst, src.as_ptr(), src.len()) };
            self.len = src.len();
            return Ok(());
        }
        let ptr = self.alloc.allocate(src.len())?;
        unsafe { raw::copy_bytes(ptr.as_ptr(), src.as_ptr(), src.len()) };
        let old = mem::replace(
            &mut self.storage,
            Storage::Owned(OwnedBlock {
                ptr,
                capacity: src.len(),
            }),
        );
        self.release_storage(old);
        self.len = src.len();
        Ok(())
    }

    /// 以另一缓冲内容的深拷贝替换当前内容（拷贝赋值等价物）。
    pub fn assign_from<B: ByteAllocator>(&mut self, other: &Buffer<'_, B>) -> Result<(), CoreError> {
        self.assign(other.as_slice())
    }

    /// 接管一块新的分配并替换现有内容，等价于 `(ptr, n, cap, assumeOwnership)` 赋值变体。
    ///
    /// # Safety
    /// 同 [`from_raw_parts_in`](Self::from_raw_parts_in)：`ptr`/`capacity` 必须来自
    /// 本缓冲分配器的一次成功 `allocate`，块内全部字节已初始化。
    pub unsafe fn assign_raw_parts(
        &mut self,
        ptr: NonNull<u8>,
        len: usize,
        capacity: usize,
    ) -> Result<(), CoreError> {
        if len > capacity {
            return Err(invalid_argument(format!(
                "逻辑长度 {len} 超出接管块容量 {capacity}"
            )));
        }
        let old = mem::replace(&mut self.storage, Storage::Owned(OwnedBlock { ptr, capacity }));
        self.release_storage(old);
        self.len = len;
        Ok(())
    }

    /// 改为借用态包装 `block`，替换现有内容（`wrap` 的赋值变体）。
    ///
    /// # 契约说明（What）
    /// - 零拷贝、零分配：缓冲直接指向 `block`，容量为 `block.len()`，
    ///   逻辑长度为 `len`；`len > block.len()` 时返回
    ///   [`codes::BUFFER_INVALID_ARGUMENT`] 且缓冲不变；
    /// - 此前的自有块经分配器归还，此前的借用块原样放下；
    /// - 出借方在缓冲存续期间保有 `block` 的生命周期责任。
    pub fn assign_wrapped(&mut self, block: &'a mut [u8], len: usize) -> Result<(), CoreError> {
        if len > block.len() {
            return Err(invalid_argument(format!(
                "逻辑长度 {len} 超出借用块容量 {}",
                block.len()
            )));
        }
        let old = mem::replace(&mut self.storage, Storage::Borrowed(block));
        self.release_storage(old);
        self.len = len;
        Ok(())
    }

    /// 请求容量至少为 `capacity`；从不收缩。
    ///
    /// # 契约说明（What）
    /// - `capacity <= capacity()`：无操作，返回 [`Growth::Retained`]；
    /// - 否则按请求值精确分配新自有块，拷贝 `[0, len)`，旧自有块归还，
    ///   返回 [`Growth::Grown`]。借用态在此转为自有，借出内存不被触碰。
    pub fn set_capacity(&mut self, capacity: usize) -> Result<Growth, CoreError> {
        if capacity <= self.capacity() {
            return Ok(Growth::Retained);
        }
        self.grow_to(capacity)?;
        Ok(Growth::Grown)
    }

    /// 设置逻辑长度。
    ///
    /// # 契约说明（What）
    /// - `len <= capacity()`：纯簿记更新，无拷贝，返回 [`Growth::Retained`]；
    /// - 否则经 [`GrowthPolicy::next_capacity`] 计算摊还容量后增长，
    ///   返回 [`Growth::Grown`]。新暴露字节的内容未定义（当前实现为零）。
    pub fn set_len(&mut self, len: usize) -> Result<Growth, CoreError> {
        if len <= self.capacity() {
            self.len = len;
            return Ok(Growth::Retained);
        }
        let target = self.policy.next_capacity(self.capacity(), len);
        self.grow_to(target)?;
        self.len = len;
        Ok(Growth::Grown)
    }

    /// 追加 `src` 到逻辑末尾，必要时先增长容量。
    pub fn append(&mut self, src: &[u8]) -> Result<(), CoreError> {
        if src.is_empty() {
            return Ok(());
        }
        let required = self.len.checked_add(src.len()).ok_or_else(|| {
            CoreError::new(
                codes::BUFFER_ALLOCATION_FAILED,
                "append 后的总长度溢出 usize",
            )
        })?;
        if required > self.capacity() {
            let target = self.policy.next_capacity(self.capacity(), required);
            self.grow_to(target)?;
        }
        let dst = unsafe { self.data_ptr_mut().add(self.len) };
        unsafe { raw::copy_bytes(dst, src.as_ptr(), src.len()) };
        self.len = required;
        Ok(())
    }

    /// 以 `byte` 覆写 `[0, len)`；不分配、不改变长度与容量。
    pub fn fill(&mut self, byte: u8) {
        self.as_mut_slice().fill(byte);
    }

    /// 清空逻辑内容；容量与分配保留以待复用。
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// O(1) 交换两个缓冲的全部状态（存储、长度、策略、分配器）。
    ///
    /// 不分配、不拷贝，指针身份随交换原样转移；所有权移交对两个参与方是原子的。
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// 将自有分配的所有权移交给调用方，自身复位为空缓冲。
    ///
    /// # 契约说明（What）
    /// - **自有态**：返回 [`DetachedBlock`]，其可读内容等于移交前的 `[0, len)`；
    ///   该块在自身析构时经同一分配器归还，也可经
    ///   [`into_raw_parts`](DetachedBlock::into_raw_parts) 继续裸移交。
    ///   移交后本缓冲 `len == 0 && capacity == 0`。
    /// - **借用态**：返回 [`codes::BUFFER_INVALID_ARGUMENT`]，缓冲不变——
    ///   借来的内存没有可移交的所有权。
    pub fn detach(&mut self) -> Result<DetachedBlock<A>, CoreError>
    where
        A: Clone,
    {
        if !self.is_owner() {
            return Err(invalid_argument("借用态缓冲不持有可移交的所有权"));
        }
        let block = match mem::replace(&mut self.storage, Storage::Owned(OwnedBlock::EMPTY)) {
            Storage::Owned(block) => block,
            Storage::Borrowed(_) => unreachable!("is_owner 已保证状态"),
        };
        let len = mem::take(&mut self.len);
        Ok(DetachedBlock {
            ptr: block.ptr,
            len,
            capacity: block.capacity,
            alloc: self.alloc.clone(),
        })
    }

    /// 自 `[0, len)` 正向线性扫描首个等于 `byte` 的位置。
    pub fn find(&self, byte: u8) -> Option<usize> {
        self.find_from(byte, 0)
    }

    /// 自 `[from, len)` 正向扫描；`from >= len` 时恒为 `None`。
    pub fn find_from(&self, byte: u8, from: usize) -> Option<usize> {
        if from >= self.len {
            return None;
        }
        self.as_slice()[from..]
            .iter()
            .position(|&b| b == byte)
            .map(|offset| from + offset)
    }

    /// 自末尾反向线性扫描最后一个等于 `byte` 的位置。
    pub fn rfind(&self, byte: u8) -> Option<usize> {
        self.as_slice().iter().rposition(|&b| b == byte)
    }

    /// 自 `min(from, len - 1)` 反向扫描到 0；空缓冲恒为 `None`。
    pub fn rfind_from(&self, byte: u8, from: usize) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let start = from.min(self.len - 1);
        self.as_slice()[..=start].iter().rposition(|&b| b == byte)
    }

    /// 迁移到一块至少 `new_capacity` 字节的新自有块。
    ///
    /// 强异常安全的关键路径：先完成新块分配与内容迁移，再替换并归还旧块；
    /// 分配失败时不触碰任何现有状态。旧块为借用时只是放下引用，内存不被触碰。
    fn grow_to(&mut self, new_capacity: usize) -> Result<(), CoreError> {
        debug_assert!(new_capacity > self.capacity());
        let ptr = self.alloc.allocate(new_capacity)?;
        unsafe { raw::copy_bytes(ptr.as_ptr(), self.as_ptr(), self.len) };
        let old = mem::replace(
            &mut self.storage,
            Storage::Owned(OwnedBlock {
                ptr,
                capacity: new_capacity,
            }),
        );
        self.release_storage(old);
        Ok(())
    }

    /// 放下一份旧存储：自有块经分配器归还，借用块原样保留。
    fn release_storage(&self, storage: Storage<'a>) {
        if let Storage::Owned(block) = storage {
            if block.capacity > 0 {
                unsafe { self.alloc.release(block.ptr, block.capacity) };
            }
        }
    }

    fn data_ptr_mut(&mut self) -> *mut u8 {
        match &mut self.storage {
            Storage::Owned(block) => block.ptr.as_ptr(),
            Storage::Borrowed(block) => block.as_mut_ptr(),
        }
    }
}

impl<'a, A: ByteAllocator> Drop for Buffer<'a, A> {
    fn drop(&mut self) {
        let storage = mem::replace(&mut self.storage, Storage::Owned(OwnedBlock::EMPTY));
        self.release_storage(storage);
    }
}

impl<'a, A: ByteAllocator + Default> Default for Buffer<'a, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<'a, A: ByteAllocator> fmt::Debug for Buffer<'a, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("owned", &self.is_owner())
            .finish()
    }
}

impl<'a, A: ByteAllocator> AsRef<[u8]> for Buffer<'a, A> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// 相等只看 `[0, len)` 的内容：容量、所有权形态、存储地址均不参与比较。
impl<'a, 'b, A: ByteAllocator, B: ByteAllocator> PartialEq<Buffer<'b, B>> for Buffer<'a, A> {
    fn eq(&self, other: &Buffer<'b, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<'a, A: ByteAllocator> Eq for Buffer<'a, A> {}

/// `Buffer` 的并发安全性说明：
///
/// - 自有块被缓冲独占，借用块以 `&'a mut [u8]` 独占借入；
/// - 写操作均要求 `&mut self`，遵循 Rust 借用规则，避免与其它读取并发发生数据竞争；
/// - 只读方法仅访问不可变切片，不触发内部可变状态。
unsafe impl<'a, A: ByteAllocator + Send> Send for Buffer<'a, A> {}

/// 参见 [`Send`] 的说明：共享引用只暴露只读视图，可安全实现 `Sync`。
unsafe impl<'a, A: ByteAllocator + Sync> Sync for Buffer<'a, A> {}

/// `DetachedBlock` 承载一次 [`Buffer::detach`] 移交出的自有分配。
///
/// # 设计动机（Why）
/// - detach 的语义是“调用方接管释放责任”；在 Rust 中裸还指针会把释放责任
///   变成口头契约，因此以守卫类型承载：析构时经同一分配器归还，
///   需要继续裸移交时走 [`into_raw_parts`](Self::into_raw_parts)。
///
/// # 契约说明（What）
/// - 可读内容固定为移交前缓冲的 `[0, len)`；
/// - `into_raw_parts` 之后释放责任转移给调用方，与
///   [`Buffer::from_raw_parts_in`] 配对可重新入列。
pub struct DetachedBlock<A: ByteAllocator = SystemAllocator> {
    ptr: NonNull<u8>,
    len: usize,
    capacity: usize,
    alloc: A,
}

impl<A: ByteAllocator> DetachedBlock<A> {
    /// 移交前缓冲的逻辑长度。
    pub fn len(&self) -> usize {
        self.len
    }

    /// 是否不含有效数据。
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 移交块的总容量。
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 块首字节地址。
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// 只读视图：移交前的 `[0, len)`。
    pub fn as_slice(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// 可写视图。
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// 拆解为裸组成部分，释放责任随之转移给调用方。
    ///
    /// 返回 `(ptr, len, capacity)`；此后本守卫不再归还内存，调用方应以
    /// [`Buffer::from_raw_parts_in`] 重新接管，或按分配器契约自行归还。
    pub fn into_raw_parts(mut self) -> (NonNull<u8>, usize, usize) {
        let parts = (self.ptr, self.len, self.capacity);
        // 容量清零后析构路径不再归还。
        self.capacity = 0;
        self.len = 0;
        parts
    }
}

impl<A: ByteAllocator> Deref for DetachedBlock<A> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl<A: ByteAllocator> DerefMut for DetachedBlock<A> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl<A: ByteAllocator> Drop for DetachedBlock<A> {
    fn drop(&mut self) {
        if self.capacity > 0 {
            unsafe { self.alloc.release(self.ptr, self.capacity) };
        }
    }
}

impl<A: ByteAllocator> fmt::Debug for DetachedBlock<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetachedBlock")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// 移交块独占其底层分配，安全性论证同 [`Buffer`]。
unsafe impl<A: ByteAllocator + Send> Send for DetachedBlock<A> {}
unsafe impl<A: ByteAllocator + Sync> Sync for DetachedBlock<A> {}

fn invalid_argument(message: impl Into<Cow<'static, str>>) -> CoreError {
    CoreError::new(codes::BUFFER_INVALID_ARGUMENT, message)
}
