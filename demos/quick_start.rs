use std::time::Duration;

use subdig::{discover_subdomains, verify_subdomains, Domain, SubdigConfig, SubdigEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("subdig 库使用快速入门");

    let domain = Domain::parse("example.com")?;

    // 方法1: 使用便捷函数（最简单）
    println!("\n=== 方法1: 便捷函数 ===");
    match discover_subdomains(&domain).await {
        Ok(subdomains) => {
            let alive = verify_subdomains(&subdomains).await;
            println!("发现 {} 个子域名，{} 个存活", subdomains.len(), alive.len());
            for name in alive.iter().take(3) {
                println!("  {}", name);
            }
        }
        Err(e) => println!("收集失败: {}", e),
    }

    // 方法2: 使用配置引擎（推荐）
    println!("\n=== 方法2: 配置引擎 ===");
    let config = SubdigConfig {
        resolve: true,
        concurrency: 100,
        dns_timeout: Duration::from_secs(3),
        allow_partial: true, // 部分数据源失败时保留其余结果
        ..Default::default()
    };

    match SubdigEngine::new(config) {
        Ok(engine) => match engine.run(&domain).await {
            Ok(outcome) => {
                for failure in &outcome.failures {
                    println!("  跳过: {}", failure);
                }
                println!("存活 {} 个，耗时 {:?}", outcome.results().len(), outcome.elapsed);
                for name in outcome.results().iter().take(3) {
                    println!("  {}", name);
                }
            }
            Err(e) => println!("收集失败: {}", e),
        },
        Err(e) => println!("引擎创建失败: {}", e),
    }

    Ok(())
}
