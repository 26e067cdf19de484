use log::LevelFilter;

/// 日志级别字符串 -> LevelFilter，无法识别时使用 Warn
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}

/// 初始化全局日志，重复调用时忽略
pub fn init_logger(level: &str) {
    let _ = env_logger::Builder::new()
        .filter_level(parse_level(level))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warning"), LevelFilter::Warn);
        assert_eq!(parse_level("verbose"), LevelFilter::Warn);
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logger("info");
        init_logger("debug");
    }
}
