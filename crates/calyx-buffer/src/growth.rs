/// `GrowthPolicy` 把“扩容到多大”表达为一个纯函数，与分配/拷贝副作用彻底解耦。
///
/// # 设计背景（Why）
/// - 逻辑长度越界时的扩容幅度是典型的摊还决策：若每次只扩到刚好足够，
///   连续追加会退化为 O(n²) 拷贝；若无节制翻倍，小缓冲会浪费内存。
/// - 将策略收敛为 `next_capacity(current, requested) -> new` 的纯函数后，
///   策略本身可以被单元测试与性质测试独立覆盖，缓冲实现只消费其结果。
///
/// # 逻辑解析（How）
/// - 取 `requested`、`current * 2`（饱和乘法）与 `min_capacity` 三者的最大值；
/// - 饱和运算保证在极端容量下不会回绕，最坏退化为“恰好满足请求”。
///
/// # 契约说明（What）
/// - **前置条件**：调用方仅在 `requested > current` 时咨询本策略；
/// - **后置条件**：返回值同时满足 `>= requested`、`>= current` 与 `>= min_capacity`。
///
/// # 设计取舍（Trade-offs）
/// - 显式容量请求（`set_capacity`）不经过本策略，按请求值精确分配，
///   把“预留多少”的决定权留给调用方。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    min_capacity: usize,
}

impl GrowthPolicy {
    /// 以给定的容量下限构造策略。
    pub const fn new(min_capacity: usize) -> Self {
        Self { min_capacity }
    }

    /// 计算满足 `requested` 的下一容量。
    pub fn next_capacity(&self, current: usize, requested: usize) -> usize {
        requested
            .max(current.saturating_mul(2))
            .max(self.min_capacity)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new(16)
    }
}
