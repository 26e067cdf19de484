use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Request};
use serde::Deserialize;
use tokio::time::timeout;

use crate::domain::Domain;
use crate::error::SourceError;
use crate::source::SubdomainSource;

/// crt.sh 默认查询地址
pub const CRTSH_ENDPOINT: &str = "https://crt.sh/";
/// 单次查询默认超时
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// crt.sh 返回的单条证书记录，只关心 name_value
#[derive(Debug, Deserialize)]
struct CrtShRecord {
    name_value: String,
}

/// 证书透明度日志数据源 (crt.sh)
#[derive(Debug, Clone)]
pub struct CrtShSource {
    client: Client,
    endpoint: String,
    timeout_duration: Duration,
}

impl CrtShSource {
    pub fn new() -> Result<Self, SourceError> {
        Self::with_endpoint(CRTSH_ENDPOINT, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(timeout_duration: Duration) -> Result<Self, SourceError> {
        Self::with_endpoint(CRTSH_ENDPOINT, timeout_duration)
    }

    /// 指定查询地址（测试或镜像站点）
    pub fn with_endpoint(endpoint: &str, timeout_duration: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout_duration)
            .build()
            .map_err(SourceError::from)?;

        Ok(CrtShSource {
            client,
            endpoint: endpoint.to_string(),
            timeout_duration,
        })
    }

    /// `%.<domain>` 匹配所有子域名证书，查询参数交给 reqwest 编码
    fn build_request(&self, domain: &Domain) -> Result<Request, SourceError> {
        let pattern = format!("%.{}", domain);
        self.client
            .get(&self.endpoint)
            .query(&[("q", pattern.as_str()), ("output", "json")])
            .build()
            .map_err(SourceError::from)
    }

    async fn fetch(&self, request: Request) -> Result<String, SourceError> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            SourceError::Timeout(self.timeout_duration)
        } else {
            SourceError::from(err)
        }
    }
}

#[async_trait]
impl SubdomainSource for CrtShSource {
    fn name(&self) -> &str {
        "crt.sh"
    }

    async fn find_subdomains(&self, domain: &Domain) -> Result<Vec<String>, SourceError> {
        let request = self.build_request(domain)?;
        debug!("GET {}", request.url());

        let body = match timeout(self.timeout_duration, self.fetch(request)).await {
            Ok(result) => result?,
            Err(_) => return Err(SourceError::Timeout(self.timeout_duration)),
        };

        parse_records(&body)
    }
}

/// 解析 crt.sh JSON 响应
///
/// 一张证书可能覆盖多个名称，name_value 按换行拆分成多个候选。
pub fn parse_records(body: &str) -> Result<Vec<String>, SourceError> {
    let records: Vec<CrtShRecord> = serde_json::from_str(body)?;

    Ok(records
        .iter()
        .flat_map(|record| record.name_value.split('\n'))
        .map(|name| name.to_string())
        .collect())
}
