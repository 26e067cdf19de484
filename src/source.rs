use async_trait::async_trait;

use crate::domain::Domain;
use crate::error::SourceError;

/// 被动子域名数据源
///
/// `find_subdomains` 返回原始候选名称，不做过滤和去重，
/// 这些由 [`SubdomainFinder`](crate::finder::SubdomainFinder) 统一处理。
/// 实现必须自行限制单次调用的超时时间。
#[async_trait]
pub trait SubdomainSource: Send + Sync {
    /// 数据源名称，用于日志和错误归属
    fn name(&self) -> &str;

    async fn find_subdomains(&self, domain: &Domain) -> Result<Vec<String>, SourceError>;
}
