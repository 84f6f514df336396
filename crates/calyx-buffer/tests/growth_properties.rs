//! `growth_properties` 性质测试：校验扩容策略的代数性质。
//!
//! # 性质清单（What）
//! - 产出容量永不小于请求值、当前容量与下限（充分性）；
//! - 产出分别对请求值与当前容量单调不减（摊还曲线不回退）。

use calyx_buffer::GrowthPolicy;
use proptest::prelude::*;

proptest! {
    /// 产出容量同时覆盖请求值、当前容量与策略下限。
    #[test]
    fn next_capacity_is_sufficient(
        min in 0usize..4096,
        current in 0usize..1_000_000,
        requested in 0usize..1_000_000,
    ) {
        let policy = GrowthPolicy::new(min);
        let next = policy.next_capacity(current, requested);
        prop_assert!(next >= requested, "产出 {next} 小于请求值 {requested}");
        prop_assert!(next >= current, "产出 {next} 小于当前容量 {current}");
        prop_assert!(next >= min, "产出 {next} 低于策略下限 {min}");
    }

    /// 当前容量固定时，产出对请求值单调不减。
    #[test]
    fn next_capacity_is_monotone_in_requested(
        min in 0usize..4096,
        current in 0usize..1_000_000,
        requested in 0usize..1_000_000,
        delta in 0usize..1_000_000,
    ) {
        let policy = GrowthPolicy::new(min);
        let smaller = policy.next_capacity(current, requested);
        let larger = policy.next_capacity(current, requested + delta);
        prop_assert!(larger >= smaller, "请求值增大后产出反而回退");
    }

    /// 请求值固定时，产出对当前容量单调不减。
    #[test]
    fn next_capacity_is_monotone_in_current(
        min in 0usize..4096,
        current in 0usize..1_000_000,
        delta in 0usize..1_000_000,
        requested in 0usize..1_000_000,
    ) {
        let policy = GrowthPolicy::new(min);
        let smaller = policy.next_capacity(current, requested);
        let larger = policy.next_capacity(current + delta, requested);
        prop_assert!(larger >= smaller, "当前容量增大后产出反而回退");
    }
}
