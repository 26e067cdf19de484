use clap::Parser;

/// 输出格式枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 每行一个子域名
    Txt,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" => Ok(OutputFormat::Txt),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("unsupported output format: {}. supported: txt, json", s)),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "subdig")]
#[command(version)]
#[command(
    about = "SubDig - passive subdomain enumeration",
    long_about = "Discovers subdomains through certificate transparency logs (crt.sh) and can \
optionally resolve them to check which are alive.\n\nExample usage:\n  subdig -d example.com\n  subdig -d example.com -r -o results.txt",
    arg_required_else_help = true
)]
pub struct Opts {
    /// target domain to find subdomains
    #[arg(short, long)]
    pub domain: String,

    /// save results to output file
    #[arg(short, long)]
    pub output: Option<String>,

    /// resolve discovered subdomains and keep only alive ones
    #[arg(short, long)]
    pub resolve: bool,

    /// output format (txt, json)
    #[arg(long, default_value = "txt")]
    pub format: String,

    /// DNS server used for liveness checks (ip or ip:port)
    #[arg(long, default_value = "8.8.8.8:53")]
    pub resolver: String,

    /// max concurrent DNS lookups
    #[arg(short, long, default_value = "50")]
    pub concurrency: usize,

    /// DNS lookup timeout in seconds
    #[arg(long, default_value = "5")]
    pub dns_timeout: u64,

    /// per-source HTTP timeout in seconds
    #[arg(long, default_value = "30")]
    pub http_timeout: u64,

    /// keep results from working sources when some sources fail
    #[arg(long)]
    pub partial: bool,

    /// only print results
    #[arg(short, long)]
    pub silent: bool,

    /// log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
