//! # subdig
//!
//! 被动子域名收集工具库：从证书透明度日志等数据源并发收集子域名，
//! 可选地通过 DNS 解析检测哪些子域名当前存活。
//!
//! ## 特性
//!
//! - 🔍 **多数据源聚合**: 每个数据源独立并发查询，结果规范化、过滤并按首次出现顺序去重
//! - 🧯 **失败可追溯**: 每个失败都带有数据源名称，可选择严格模式或保留部分结果
//! - 🚦 **有界并发解析**: 信号量限制同时进行中的 DNS 查询数量，固定上游解析器
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use subdig::{discover_subdomains, verify_subdomains, Domain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let domain = Domain::parse("example.com")?;
//!     let subdomains = discover_subdomains(&domain).await?;
//!     let alive = verify_subdomains(&subdomains).await;
//!
//!     println!("发现 {} 个子域名，{} 个存活", subdomains.len(), alive.len());
//!     Ok(())
//! }
//! ```
//!
//! 配置引擎的完整用法见 `demos/quick_start.rs`（`cargo run --example quick_start`）。

pub mod api;
pub mod crtsh;
pub mod domain;
pub mod error;
pub mod finder;
pub mod input;
pub mod logger;
pub mod output;
pub mod resolver;
pub mod source;

// 重新导出主要的公共API
pub use api::{discover_subdomains, verify_subdomains, ScanOutcome, SubdigConfig, SubdigEngine};

pub use crtsh::CrtShSource;
pub use domain::{collect_subdomains, dedup_preserving_order, normalize_candidate, Domain};
pub use error::{DiscoveryError, DomainError, ResolverError, SourceError, SourceFailure};
pub use finder::{DiscoveryReport, SubdomainFinder};
pub use input::OutputFormat;
pub use output::export_results;
pub use resolver::{
    CheckerState, DnsHostLookup, HostLookup, LivenessChecker, LivenessConfig, LivenessObserver,
    LivenessResult,
};
pub use source::SubdomainSource;
