use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::ScanOutcome;
use crate::input::OutputFormat;

/// 可序列化的数据源失败记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableFailure {
    pub source: String,
    pub error: String,
}

/// 完整的导出数据结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportData {
    pub domain: String,
    pub subdomains: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alive: Option<Vec<String>>,
    pub failures: Vec<SerializableFailure>,
    pub elapsed_ms: u128,
    pub export_time: String,
}

impl From<&ScanOutcome> for ExportData {
    fn from(outcome: &ScanOutcome) -> Self {
        ExportData {
            domain: outcome.domain.to_string(),
            subdomains: outcome.subdomains.clone(),
            alive: outcome.alive.clone(),
            failures: outcome
                .failures
                .iter()
                .map(|f| SerializableFailure {
                    source: f.source_name.clone(),
                    error: f.error.to_string(),
                })
                .collect(),
            elapsed_ms: outcome.elapsed.as_millis(),
            export_time: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }
}

/// 导出结果到文件
///
/// txt 只写最终列表（开启存活检测时为存活子集），每行一个；
/// json 写入完整的扫描结果。
pub fn export_results<P: AsRef<Path>>(
    outcome: &ScanOutcome,
    output_path: P,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = match format {
        OutputFormat::Txt => export_to_txt(outcome.results()),
        OutputFormat::Json => serde_json::to_string_pretty(&ExportData::from(outcome))?,
    };

    let mut file = File::create(output_path)?;
    file.write_all(data.as_bytes())?;
    Ok(())
}

fn export_to_txt(names: &[String]) -> String {
    let mut txt = String::new();
    for name in names {
        txt.push_str(name);
        txt.push('\n');
    }
    txt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use crate::error::{SourceError, SourceFailure};
    use std::time::Duration;

    fn outcome(alive: Option<Vec<String>>) -> ScanOutcome {
        ScanOutcome {
            domain: Domain::parse("example.com").unwrap(),
            subdomains: vec!["a.example.com".to_string(), "b.example.com".to_string()],
            alive,
            failures: vec![SourceFailure::new("other", SourceError::Status(429))],
            elapsed: Duration::from_millis(1500),
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("subdig-{}-{}", std::process::id(), name))
    }

    #[test]
    fn txt_writes_one_name_per_line() {
        let path = temp_path("plain.txt");
        export_results(&outcome(None), &path, OutputFormat::Txt).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "a.example.com\nb.example.com\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn txt_prefers_alive_subset() {
        let path = temp_path("alive.txt");
        let alive = Some(vec!["b.example.com".to_string()]);
        export_results(&outcome(alive), &path, OutputFormat::Txt).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "b.example.com\n");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn json_contains_failures() {
        let path = temp_path("report.json");
        export_results(&outcome(None), &path, OutputFormat::Json).unwrap();
        let data: ExportData =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(data.domain, "example.com");
        assert_eq!(data.subdomains.len(), 2);
        assert!(data.alive.is_none());
        assert_eq!(data.failures[0].source, "other");
        assert_eq!(data.elapsed_ms, 1500);
        let _ = std::fs::remove_file(&path);
    }
}
