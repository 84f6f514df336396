use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::error::Error;
use core::fmt;

/// `CoreError` 表示 `calyx` 各层共享的稳定错误域，是所有可观察错误的最终形态。
///
/// # 设计背景（Why）
/// - 缓冲层的失败场景稀少但关键（分配失败、参数非法），需要合流为统一的错误码，
///   以便日志与上层治理系统执行精确分类。
/// - 框架需兼容 `no_std + alloc` 场景，因此不依赖 `std::error::Error`，
///   而是直接使用 `core::error::Error`。
///
/// # 逻辑解析（How）
/// - 结构体以 Builder 风格方法叠加底层原因，并通过 `source()` 暴露完整链路。
/// - 错误码 `code` 始终为 `'static` 字符串，承载稳定语义；`message` 面向排障人员。
///
/// # 契约说明（What）
/// - **前置条件**：调用方必须使用 [`codes`] 模块或遵循 `<域>.<语义>` 约定的自定义码值。
/// - **返回值**：构造函数返回拥有所有权的 `CoreError`，可安全跨线程移动（`Send + Sync + 'static`）。
/// - **后置条件**：除非显式调用 `with_cause`，错误不会包含额外上下文。
///
/// # 设计取舍与风险（Trade-offs）
/// - 采用 `Cow<'static, str>` 保存消息，静态文案零分配，动态描述仅一次堆分配。
#[derive(Debug)]
pub struct CoreError {
    code: &'static str,
    message: Cow<'static, str>,
    cause: Option<ErrorCause>,
}

impl CoreError {
    /// 构造核心错误。
    ///
    /// # 契约定义（What）
    /// - **输入参数**：
    ///   - `code`：遵循 `<领域>.<语义>` 约定的稳定错误码，建议取自 [`codes`]；
    ///   - `message`：面向排障人员的自然语言描述，可为 `&'static str` 或堆分配字符串。
    /// - **后置条件**：返回的 [`CoreError`] 拥有独立所有权，`cause` 初始为空，
    ///   可稍后通过 [`with_cause`](Self::with_cause) 填充。
    ///
    /// # 示例（Examples）
    /// ```rust
    /// use calyx_core::CoreError;
    /// use calyx_core::codes;
    ///
    /// let err = CoreError::new(codes::BUFFER_INVALID_ARGUMENT, "capacity < size");
    /// assert_eq!(err.code(), codes::BUFFER_INVALID_ARGUMENT);
    /// assert_eq!(err.message(), "capacity < size");
    /// assert!(err.cause().is_none(), "初始错误默认不含底层原因");
    /// ```
    pub fn new(code: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// 附带底层原因并返回新的核心错误。
    pub fn with_cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// 为现有错误设置底层原因。
    pub fn set_cause(&mut self, cause: impl Error + Send + Sync + 'static) {
        self.cause = Some(Box::new(cause));
    }

    /// 获取稳定错误码。
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// 获取描述。
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 获取底层原因。
    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }

    /// 返回适合排障会议或值班新人的“人话”描述。
    ///
    /// # 契约定义（What）
    /// - **前置条件**：`self.code()` 是稳定错误码；若为自定义码，回退到 `message()`。
    /// - **返回值**：`Cow<'static, str>`，命中官方摘要时借用静态文案，否则克隆核心消息。
    /// - **后置条件**：不修改内部状态，可在日志格式化路径安全复用。
    pub fn human(&self) -> Cow<'static, str> {
        lookup_human_and_hint(self.code)
            .map(|(human, _)| Cow::Borrowed(human))
            .unwrap_or_else(|| self.message.clone())
    }

    /// 返回修复建议，帮助值班人员快速处置。
    ///
    /// # 契约定义（What）
    /// - **返回值**：错误码在官方表中登记时返回 `Some(Cow::Borrowed(hint))`；否则返回 `None`。
    /// - **后置条件**：不影响 `CoreError` 内部 `message` 与 `cause`。
    pub fn hint(&self) -> Option<Cow<'static, str>> {
        lookup_human_and_hint(self.code).and_then(|(_, hint)| hint.map(Cow::Borrowed))
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_ref()
            .map(|boxed| boxed.as_ref() as &(dyn Error + 'static))
    }
}

/// `ErrorCause` 封装底层原因，保持 `Send + Sync` 以方便跨线程传递。
pub type ErrorCause = Box<dyn Error + Send + Sync + 'static>;

/// `Result` 为框架统一的返回值别名，在所有层级提供稳定的错误边界。
///
/// # 契约说明（What）
/// - **泛型参数**：`T` 为成功路径返回值；`E` 默认为 [`CoreError`]。
/// - **后置条件**：与标准库 `Result` 行为完全一致，可直接与 `?` 运算符协同工作。
pub type Result<T, E = CoreError> = core::result::Result<T, E>;

/// 框架内置的错误码常量集合，确保可观测性系统具有稳定识别符。
///
/// # 设计背景（Why）
/// - 缓冲层只有两类致命故障：分配失败与参数非法；查找与比较操作永不失败，
///   通过 `Option`/`bool` 表达结果。稳定码值便于在跨组件日志中检索与聚合。
///
/// # 契约说明（What）
/// - **使用前提**：错误码应由实现者封装进 [`CoreError`]，并携带完整上下文。
pub mod codes {
    /// 分配器无法满足请求的容量。
    pub const BUFFER_ALLOCATION_FAILED: &str = "buffer.allocation_failed";
    /// 参数非法：容量小于长度、借用块过短、或在借用态上执行 detach。
    pub const BUFFER_INVALID_ARGUMENT: &str = "buffer.invalid_argument";
}

/// 根据稳定错误码查找“人话”摘要与修复建议。
///
/// # 契约说明（What）
/// - **输入参数**：`code` 为遵循 `<领域>.<语义>` 规范的稳定错误码。
/// - **返回值**：若命中预置表，返回 `(human, hint)`；纯读操作，无副作用。
fn lookup_human_and_hint(code: &str) -> Option<(&'static str, Option<&'static str>)> {
    match code {
        codes::BUFFER_ALLOCATION_FAILED => Some((
            "缓冲分配失败：分配器无法满足请求的容量",
            Some("确认请求容量是否异常放大；可缩小请求重试，或检查宿主内存水位"),
        )),
        codes::BUFFER_INVALID_ARGUMENT => Some((
            "缓冲参数非法：容量小于长度，或在借用态上执行了所有权操作",
            Some("核对构造参数中 capacity >= size；借用缓冲不支持 detach，请先通过增长转为自有"),
        )),
        _ => None,
    }
}

const _: fn() = || {
    fn assert_error_traits<T: Error + Send + Sync + 'static>() {}

    assert_error_traits::<CoreError>();
};
