//! 多数据源并发聚合
//!
//! 每个数据源一个 tokio 任务，全部同时启动，等待全部结束后再汇总。
//! 失败的数据源不会取消其它数据源。

use std::sync::{Arc, Mutex};

use log::{info, warn};

use crate::crtsh::CrtShSource;
use crate::domain::{collect_subdomains, Domain};
use crate::error::{DiscoveryError, SourceError, SourceFailure};
use crate::source::SubdomainSource;

/// 一次发现过程的完整结果
///
/// `subdomains` 只包含成功数据源的结果；`failures` 按数据源注册顺序排列。
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub subdomains: Vec<String>,
    pub failures: Vec<SourceFailure>,
}

impl DiscoveryReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// 严格模式：任一数据源失败则整体失败，不返回部分结果
    pub fn into_result(self) -> Result<Vec<String>, DiscoveryError> {
        if self.failures.is_empty() {
            Ok(self.subdomains)
        } else {
            Err(DiscoveryError::SourcesFailed(self.failures))
        }
    }
}

/// 单个数据源的结束状态，附带注册序号
type SourceOutcome = (usize, Result<Vec<String>, SourceFailure>);

/// 追加一条带序号的结果，锁中毒时照常写入
pub(crate) fn push_indexed<T>(slot: &Mutex<Vec<(usize, T)>>, index: usize, item: T) {
    match slot.lock() {
        Ok(mut guard) => guard.push((index, item)),
        Err(poisoned) => poisoned.into_inner().push((index, item)),
    }
}

/// 子域名聚合器
#[derive(Clone, Default)]
pub struct SubdomainFinder {
    sources: Vec<Arc<dyn SubdomainSource>>,
}

impl SubdomainFinder {
    pub fn new() -> Self {
        SubdomainFinder {
            sources: Vec::new(),
        }
    }

    /// 默认数据源集合
    pub fn with_default_sources() -> Result<Self, SourceError> {
        Ok(SubdomainFinder::new().with_source(CrtShSource::new()?))
    }

    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: SubdomainSource + 'static,
    {
        self.sources.push(Arc::new(source));
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// 查询所有数据源并汇总，返回成功部分和全部失败
    pub async fn run(&self, domain: &Domain) -> DiscoveryReport {
        let outcomes: Arc<Mutex<Vec<SourceOutcome>>> =
            Arc::new(Mutex::new(Vec::with_capacity(self.sources.len())));

        let mut tasks = Vec::with_capacity(self.sources.len());
        for (index, source) in self.sources.iter().enumerate() {
            let source = Arc::clone(source);
            let domain = domain.clone();
            let outcomes = Arc::clone(&outcomes);

            let task = tokio::spawn(async move {
                info!("Searching subdomains in {}...", source.name());
                let outcome = match source.find_subdomains(&domain).await {
                    Ok(candidates) => {
                        info!("Found {} candidates from {}", candidates.len(), source.name());
                        Ok(candidates)
                    }
                    Err(e) => {
                        warn!("{} failed: {}", source.name(), e);
                        Err(SourceFailure::new(source.name(), e))
                    }
                };
                push_indexed(&outcomes, index, outcome);
            });
            tasks.push((index, task));
        }

        // 全部等待结束，panic 的任务记为该数据源失败
        for (index, task) in tasks {
            if let Err(e) = task.await {
                let name = self.sources[index].name();
                warn!("{} task aborted: {}", name, e);
                let failure = SourceFailure::new(name, SourceError::Task(e.to_string()));
                push_indexed(&outcomes, index, Err(failure));
            }
        }

        let mut outcomes = match outcomes.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        // 完成顺序不确定，按注册顺序还原，保证首次出现顺序稳定
        outcomes.sort_by_key(|(index, _)| *index);

        let mut candidates = Vec::new();
        let mut failures = Vec::new();
        for (_, outcome) in outcomes {
            match outcome {
                Ok(names) => candidates.extend(names),
                Err(failure) => failures.push(failure),
            }
        }

        DiscoveryReport {
            subdomains: collect_subdomains(domain, candidates),
            failures,
        }
    }

    /// 严格模式的发现：任一数据源失败即整体失败
    pub async fn discover(&self, domain: &Domain) -> Result<Vec<String>, DiscoveryError> {
        if self.sources.is_empty() {
            return Err(DiscoveryError::NoSources);
        }
        self.run(domain).await.into_result()
    }
}
