use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// 通配符证书前缀
const WILDCARD_PREFIX: &str = "*.";

/// 已校验的根域名
///
/// 非空、无首尾空白，只含主机名字符（ASCII 字母数字、`-`、`.`）。
/// 既作为数据源的查询关键字，也作为候选子域名的后缀过滤条件。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain(String);

impl Domain {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::Empty);
        }
        if raw.trim() != raw {
            return Err(DomainError::SurroundingWhitespace(raw.to_string()));
        }
        if let Some(c) = raw.chars().find(|c| !is_hostname_char(*c)) {
            return Err(DomainError::InvalidCharacter(raw.to_string(), c));
        }
        Ok(Domain(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 判断名称是否属于该域名：相等或以 `.` + 域名结尾
    pub fn contains(&self, name: &str) -> bool {
        name == self.0
            || (name.len() > self.0.len()
                && name.ends_with(self.0.as_str())
                && name.as_bytes()[name.len() - self.0.len() - 1] == b'.')
    }
}

fn is_hostname_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '.'
}

impl FromStr for Domain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::parse(s)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 规范化单个候选名称：去掉一次通配符前缀，不属于目标域名时丢弃
pub fn normalize_candidate(domain: &Domain, candidate: &str) -> Option<String> {
    let name = candidate.strip_prefix(WILDCARD_PREFIX).unwrap_or(candidate);
    if domain.contains(name) {
        Some(name.to_string())
    } else {
        None
    }
}

/// 去重并保留首次出现的顺序
pub fn dedup_preserving_order<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for name in names {
        if seen.insert(name.clone()) {
            unique.push(name);
        }
    }
    unique
}

/// 候选列表 -> 子域名列表（规范化、过滤、去重）
pub fn collect_subdomains<I, S>(domain: &Domain, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    dedup_preserving_order(
        candidates
            .into_iter()
            .filter_map(|c| normalize_candidate(domain, c.as_ref())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> Domain {
        Domain::parse("example.com").unwrap()
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(Domain::parse(""), Err(DomainError::Empty));
        assert!(matches!(
            Domain::parse(" example.com"),
            Err(DomainError::SurroundingWhitespace(_))
        ));
        assert!(matches!(
            Domain::parse("example.com\n"),
            Err(DomainError::SurroundingWhitespace(_))
        ));
        assert!(matches!(
            Domain::parse("exa mple.com"),
            Err(DomainError::InvalidCharacter(_, ' '))
        ));
        assert_eq!(example().as_str(), "example.com");
    }

    #[test]
    fn parse_rejects_query_string_metacharacters() {
        for (raw, bad) in [
            ("example.com#frag", '#'),
            ("example.com&output=html", '&'),
            ("example.com?x", '?'),
            ("%25.example.com", '%'),
            ("example.com/path", '/'),
            ("exämple.com", 'ä'),
        ] {
            assert_eq!(
                Domain::parse(raw),
                Err(DomainError::InvalidCharacter(raw.to_string(), bad)),
                "{}",
                raw
            );
        }
        assert!(Domain::parse("my-host.example-1.com").is_ok());
    }

    #[test]
    fn wildcard_prefix_is_stripped() {
        assert_eq!(
            normalize_candidate(&example(), "*.foo.example.com").as_deref(),
            Some("foo.example.com")
        );
        assert_eq!(
            normalize_candidate(&example(), "*.example.com").as_deref(),
            Some("example.com")
        );
    }

    #[test]
    fn foreign_names_are_dropped() {
        let domain = example();
        assert_eq!(normalize_candidate(&domain, "evil.com"), None);
        assert_eq!(normalize_candidate(&domain, "notexample.com"), None);
        assert_eq!(normalize_candidate(&domain, "example.com.evil.com"), None);
        assert_eq!(normalize_candidate(&domain, ""), None);
        assert_eq!(
            normalize_candidate(&domain, "example.com").as_deref(),
            Some("example.com")
        );
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert_eq!(normalize_candidate(&example(), "www.EXAMPLE.com"), None);
        let names = collect_subdomains(&example(), ["A.example.com", "a.example.com"]);
        assert_eq!(names, vec!["A.example.com", "a.example.com"]);
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        let names = ["a", "b", "a", "c"].map(String::from);
        assert_eq!(dedup_preserving_order(names), vec!["a", "b", "c"]);
    }

    #[test]
    fn collect_normalizes_filters_and_dedups() {
        let names = collect_subdomains(
            &example(),
            [
                "*.a.example.com",
                "b.example.com",
                "b.example.com",
                "notexample.com",
            ],
        );
        assert_eq!(names, vec!["a.example.com", "b.example.com"]);
    }
}
