use std::net::SocketAddr;
use std::time::{Duration, Instant};

use log::info;

use crate::crtsh::{CrtShSource, DEFAULT_HTTP_TIMEOUT};
use crate::domain::Domain;
use crate::error::{DiscoveryError, SourceError, SourceFailure};
use crate::finder::SubdomainFinder;
use crate::resolver::{
    LivenessChecker, LivenessConfig, LivenessObserver, DEFAULT_CONCURRENCY, DEFAULT_DNS_TIMEOUT,
};

/// 运行配置
#[derive(Debug, Clone)]
pub struct SubdigConfig {
    /// 是否对发现的子域名做 DNS 存活检测
    pub resolve: bool,
    /// 存活检测使用的上游 DNS
    pub resolver: SocketAddr,
    /// 同时进行的 DNS 解析上限
    pub concurrency: usize,
    /// 单次 DNS 解析超时
    pub dns_timeout: Duration,
    /// 单个数据源的 HTTP 超时
    pub http_timeout: Duration,
    /// 部分数据源失败时仍返回成功部分
    pub allow_partial: bool,
    /// 是否静默模式
    pub silent: bool,
}

impl Default for SubdigConfig {
    fn default() -> Self {
        SubdigConfig {
            resolve: false,
            resolver: LivenessConfig::default().resolver,
            concurrency: DEFAULT_CONCURRENCY,
            dns_timeout: DEFAULT_DNS_TIMEOUT,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            allow_partial: false,
            silent: false,
        }
    }
}

impl SubdigConfig {
    pub fn liveness(&self) -> LivenessConfig {
        LivenessConfig {
            resolver: self.resolver,
            concurrency: self.concurrency,
            timeout: self.dns_timeout,
        }
    }
}

/// 一次完整扫描的结果
#[derive(Debug)]
pub struct ScanOutcome {
    pub domain: Domain,
    pub subdomains: Vec<String>,
    /// 未开启存活检测时为 None
    pub alive: Option<Vec<String>>,
    /// 仅在 allow_partial 时可能非空
    pub failures: Vec<SourceFailure>,
    pub elapsed: Duration,
}

impl ScanOutcome {
    /// 最终要展示和保存的列表：开启检测时为存活子集
    pub fn results(&self) -> &[String] {
        self.alive.as_deref().unwrap_or(&self.subdomains)
    }
}

/// 发现 + 可选存活检测的流水线
pub struct SubdigEngine {
    config: SubdigConfig,
    finder: SubdomainFinder,
    checker: Option<LivenessChecker>,
}

impl SubdigEngine {
    /// 使用默认数据源创建引擎
    pub fn new(config: SubdigConfig) -> Result<Self, SourceError> {
        let finder =
            SubdomainFinder::new().with_source(CrtShSource::with_timeout(config.http_timeout)?);
        Ok(Self::with_finder(config, finder))
    }

    pub fn with_finder(config: SubdigConfig, finder: SubdomainFinder) -> Self {
        let checker = if config.resolve {
            Some(LivenessChecker::new(&config.liveness()))
        } else {
            None
        };

        SubdigEngine {
            config,
            finder,
            checker,
        }
    }

    /// 替换存活检测器（自定义解析后端或进度回调）
    pub fn with_checker(mut self, checker: LivenessChecker) -> Self {
        self.checker = Some(checker);
        self
    }

    pub fn with_observer(mut self, observer: LivenessObserver) -> Self {
        self.checker = self.checker.map(|c| c.with_observer(observer));
        self
    }

    pub fn config(&self) -> &SubdigConfig {
        &self.config
    }

    pub async fn run(&self, domain: &Domain) -> Result<ScanOutcome, DiscoveryError> {
        let start = Instant::now();

        if self.finder.source_names().is_empty() {
            return Err(DiscoveryError::NoSources);
        }

        let report = self.finder.run(domain).await;
        let (subdomains, failures) = if self.config.allow_partial {
            (report.subdomains, report.failures)
        } else {
            (report.into_result()?, Vec::new())
        };
        info!("Found {} subdomains for {}", subdomains.len(), domain);

        let alive = match self.checker {
            Some(ref checker) => {
                let alive = checker.alive(&subdomains).await;
                info!("Found {} alive subdomains", alive.len());
                Some(alive)
            }
            None => None,
        };

        Ok(ScanOutcome {
            domain: domain.clone(),
            subdomains,
            alive,
            failures,
            elapsed: start.elapsed(),
        })
    }
}

/// 便捷的发现函数：默认数据源，严格模式
pub async fn discover_subdomains(domain: &Domain) -> Result<Vec<String>, DiscoveryError> {
    let finder = SubdomainFinder::with_default_sources().map_err(|e| {
        DiscoveryError::SourcesFailed(vec![SourceFailure::new("crt.sh", e)])
    })?;
    finder.discover(domain).await
}

/// 便捷的存活检测函数：默认解析器配置，单项失败只表现为不在结果中
pub async fn verify_subdomains(subdomains: &[String]) -> Vec<String> {
    LivenessChecker::new(&LivenessConfig::default())
        .alive(subdomains)
        .await
}
