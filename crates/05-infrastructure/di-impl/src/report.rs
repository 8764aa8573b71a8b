//! 初始化报告

use chrono::{DateTime, Duration, Utc};
use infrastructure_common::DependencyError;
use std::fmt;

/// 一次装配失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitFailure {
    /// 失败对象（类型名、`宿主::方法` 或包路径）
    pub subject: String,
    /// 失败原因
    pub error: DependencyError,
}

impl fmt::Display for InitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.error)
    }
}

/// 一次 `init()` 的结果汇总
#[derive(Debug, Clone)]
pub struct InitReport {
    /// 开始时间
    pub started_at: DateTime<Utc>,
    /// 结束时间
    pub finished_at: DateTime<Utc>,
    /// 构造的组件数量
    pub components_constructed: usize,
    /// 调用的 Bean 方法数量
    pub providers_invoked: usize,
    /// 尽力装配模式下被吸收的失败
    pub failures: Vec<InitFailure>,
}

impl InitReport {
    pub(crate) fn start() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            components_constructed: 0,
            providers_invoked: 0,
            failures: Vec::new(),
        }
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// 没有任何失败
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// 初始化耗时
    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }

    /// 按失败对象查找失败记录
    pub fn failure_for(&self, subject: &str) -> Option<&InitFailure> {
        self.failures.iter().find(|failure| failure.subject == subject)
    }
}
