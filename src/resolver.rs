use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use trust_dns_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

use crate::error::ResolverError;
use crate::finder::push_indexed;

/// 默认上游 DNS 服务器
pub const DEFAULT_RESOLVER: &str = "8.8.8.8:53";
/// 同时进行中的解析请求上限
pub const DEFAULT_CONCURRENCY: usize = 50;
/// 单次解析超时
pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(5);

/// 存活检测配置
#[derive(Debug, Clone)]
pub struct LivenessConfig {
    pub resolver: SocketAddr,
    pub concurrency: usize,
    pub timeout: Duration,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        LivenessConfig {
            resolver: SocketAddr::from(([8, 8, 8, 8], 53)),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_DNS_TIMEOUT,
        }
    }
}

/// 解析 `ip:port` 或裸 `ip`（默认 53 端口）
pub fn parse_resolver_addr(addr: &str) -> Result<SocketAddr, ResolverError> {
    if let Ok(socket) = addr.parse::<SocketAddr>() {
        return Ok(socket);
    }
    addr.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, 53))
        .map_err(|_| ResolverError::InvalidAddress(addr.to_string()))
}

/// 单个名称的正向解析
///
/// 只关心是否解析成功，不关心解析到的地址。
#[async_trait]
pub trait HostLookup: Send + Sync {
    async fn lookup_host(&self, name: &str) -> bool;
}

/// 基于 trust-dns 的解析实现，固定查询指定的上游服务器
pub struct DnsHostLookup {
    resolver: TokioAsyncResolver,
}

impl DnsHostLookup {
    pub fn new(server: SocketAddr, attempt_timeout: Duration) -> Self {
        let name_servers =
            NameServerConfigGroup::from_ips_clear(&[server.ip()], server.port(), true);
        let config = ResolverConfig::from_parts(None, vec![], name_servers);

        // 不重试，暂时性失败与永久失败同样视为不存活
        let mut opts = ResolverOpts::default();
        opts.timeout = attempt_timeout;
        opts.attempts = 1;
        opts.use_hosts_file = false;

        DnsHostLookup {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

#[async_trait]
impl HostLookup for DnsHostLookup {
    async fn lookup_host(&self, name: &str) -> bool {
        match self.resolver.lookup_ip(name).await {
            Ok(response) => response.iter().next().is_some(),
            Err(e) => {
                debug!("lookup {} failed: {}", name, e);
                false
            }
        }
    }
}

/// 单个名称的检测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessResult {
    pub subdomain: String,
    pub alive: bool,
}

/// 检测器整体状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerState {
    Idle,
    /// 仍有待派发的名称
    Dispatching,
    /// 全部已派发，等待进行中的解析结束
    Draining,
    Done,
}

impl fmt::Display for CheckerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckerState::Idle => "idle",
            CheckerState::Dispatching => "dispatching",
            CheckerState::Draining => "draining",
            CheckerState::Done => "done",
        };
        f.write_str(s)
    }
}

/// 每完成一个解析回调一次，用于进度输出
pub type LivenessObserver = Arc<dyn Fn(&LivenessResult) + Send + Sync>;

/// 有界并发的存活检测器
///
/// 由信号量限制同时进行中的解析数量，派发方在拿到许可前阻塞；
/// 许可随任务结束（包括失败和 panic）自动释放。
pub struct LivenessChecker {
    lookup: Arc<dyn HostLookup>,
    concurrency: usize,
    timeout_duration: Duration,
    observer: Option<LivenessObserver>,
    state: Arc<Mutex<CheckerState>>,
}

impl LivenessChecker {
    pub fn new(config: &LivenessConfig) -> Self {
        let lookup = DnsHostLookup::new(config.resolver, config.timeout);
        Self::with_lookup(Arc::new(lookup), config.concurrency, config.timeout)
    }

    pub fn with_lookup(
        lookup: Arc<dyn HostLookup>,
        concurrency: usize,
        timeout_duration: Duration,
    ) -> Self {
        LivenessChecker {
            lookup,
            concurrency: concurrency.max(1),
            timeout_duration,
            observer: None,
            state: Arc::new(Mutex::new(CheckerState::Idle)),
        }
    }

    pub fn with_observer(mut self, observer: LivenessObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn state(&self) -> CheckerState {
        match self.state.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn set_state(&self, next: CheckerState) {
        debug!("liveness checker: {}", next);
        match self.state.lock() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// 检测所有名称，返回每个名称的结果（与输入顺序一致）
    pub async fn check_all(&self, subdomains: &[String]) -> Vec<LivenessResult> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let results: Arc<Mutex<Vec<(usize, LivenessResult)>>> =
            Arc::new(Mutex::new(Vec::with_capacity(subdomains.len())));

        self.set_state(CheckerState::Dispatching);
        let mut tasks = Vec::with_capacity(subdomains.len());
        for (index, subdomain) in subdomains.iter().enumerate() {
            // 信号量从不关闭，acquire 只会在关闭时失败
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let lookup = Arc::clone(&self.lookup);
            let observer = self.observer.clone();
            let results = Arc::clone(&results);
            let subdomain = subdomain.clone();
            let attempt_timeout = self.timeout_duration;

            tasks.push(tokio::spawn(async move {
                let _permit = permit;
                let alive = timeout(attempt_timeout, lookup.lookup_host(&subdomain))
                    .await
                    .unwrap_or(false);

                let result = LivenessResult { subdomain, alive };
                if alive {
                    debug!("✓ {} is alive", result.subdomain);
                } else {
                    debug!("✗ {} is not alive", result.subdomain);
                }
                if let Some(observer) = observer {
                    observer(&result);
                }
                push_indexed(&results, index, result);
            }));
        }

        self.set_state(CheckerState::Draining);
        for task in tasks {
            // panic 的任务没有写入结果，等同于不存活
            let _ = task.await;
        }

        let mut results = match results.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        results.sort_by_key(|(index, _)| *index);
        self.set_state(CheckerState::Done);

        results.into_iter().map(|(_, result)| result).collect()
    }

    /// 只返回存活的名称，保持输入顺序
    pub async fn alive(&self, subdomains: &[String]) -> Vec<String> {
        self.check_all(subdomains)
            .await
            .into_iter()
            .filter(|r| r.alive)
            .map(|r| r.subdomain)
            .collect()
    }
}
