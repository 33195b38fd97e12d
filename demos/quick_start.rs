//! nanoclaude 快速入门示例
//! 最简单的使用方式，帮助用户快速上手

use nanoclaude::{ClaudeClient, Config, Result};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    println!("🚀 nanoclaude 快速入门\n");

    // 步骤1: 从 .env 文件和环境变量加载配置
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("❌ 配置加载失败: {e}");
            println!("请设置以下环境变量（或写入 .env 文件）:");
            println!("   ANTHROPIC_API_KEY=your_api_key");
            return Ok(());
        }
    };

    println!("✅ API密钥已设置");
    println!("🔧 使用模型: {}", config.model());

    // 步骤2: 创建客户端
    println!("🤖 创建AI客户端...");
    let client = ClaudeClient::new(config);

    // 步骤3: 发送第一个请求
    println!("💬 发送第一个请求...");

    match client.generate("What is a quaternion?").await {
        Ok(response) => {
            println!("\n🤖 AI回复:");
            println!("─────────────────────────────────");
            println!("{response}");
            println!("─────────────────────────────────");
        }
        Err(e) => {
            println!("❌ 请求失败: {e}");
            println!("\n💡 可能的解决方案:");
            println!("   1. 检查API密钥是否正确");
            println!("   2. 检查网络连接");
            println!("   3. 确认API配额是否充足");
            return Ok(());
        }
    }

    println!("\n🎉 恭喜！你已经成功使用了 nanoclaude");
    println!("\n📚 下一步可以尝试:");
    println!("   • 流式响应: cargo run --example streaming");
    println!("   • 通道转发: cargo run --example channel_streaming");

    Ok(())
}
