use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::*;

use subdig::input::{Opts, OutputFormat};
use subdig::logger::init_logger;
use subdig::output::export_results;
use subdig::resolver::{parse_resolver_addr, LivenessResult};
use subdig::{Domain, ScanOutcome, SubdigConfig, SubdigEngine};

#[tokio::main]
async fn main() {
    let opts = Opts::parse();
    init_logger(&opts.log_level);

    // Ctrl-C 直接终止本次扫描，不输出结果
    let result = tokio::select! {
        result = run(opts) => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("{}", "Interrupted".red());
            process::exit(130);
        }
    };

    if let Err(e) = result {
        eprintln!("{}", format!("Error: {}", e).red());
        process::exit(1);
    }
}

/// 命令行参数 -> 运行配置
fn build_config(opts: &Opts) -> Result<SubdigConfig, Box<dyn std::error::Error>> {
    Ok(SubdigConfig {
        resolve: opts.resolve,
        resolver: parse_resolver_addr(&opts.resolver)?,
        concurrency: opts.concurrency,
        dns_timeout: Duration::from_secs(opts.dns_timeout),
        http_timeout: Duration::from_secs(opts.http_timeout),
        allow_partial: opts.partial,
        silent: opts.silent,
    })
}

async fn run(opts: Opts) -> Result<(), Box<dyn std::error::Error>> {
    let domain = Domain::parse(&opts.domain)?;
    let format = opts.format.parse::<OutputFormat>()?;
    let config = build_config(&opts)?;
    let silent = config.silent;

    if !silent {
        println!("{}", format!("Starting subdomain enumeration for: {}", domain).cyan());
    }

    let mut engine = SubdigEngine::new(config)?;
    if !silent {
        engine = engine.with_observer(Arc::new(print_liveness));
    }

    let outcome = engine.run(&domain).await?;
    if !silent {
        print_summary(&outcome);
    }

    if let Some(ref path) = opts.output {
        match export_results(&outcome, path, format) {
            Ok(()) => {
                if !silent {
                    println!("{}", format!("Results saved to {}", path).green());
                }
            }
            Err(e) => eprintln!("{}", format!("Error saving to file: {}", e).red()),
        }
    }

    if !silent {
        println!("\nResults:");
    }
    for name in outcome.results() {
        println!("{}", name);
    }

    if !silent {
        println!("{}", format!("\nCompleted in {:?}", outcome.elapsed).cyan());
    }
    Ok(())
}

fn print_liveness(result: &LivenessResult) {
    if result.alive {
        println!("{} {} is alive", "✓".green(), result.subdomain);
    } else {
        println!("{} {} is not alive", "✗".red(), result.subdomain);
    }
}

fn print_summary(outcome: &ScanOutcome) {
    for failure in &outcome.failures {
        eprintln!("{}", format!("Warning: {}", failure).yellow());
    }
    println!("{}", format!("Found {} subdomains", outcome.subdomains.len()).green());
    if let Some(ref alive) = outcome.alive {
        println!("{}", format!("Found {} alive subdomains", alive.len()).green());
    }
}
