//! # 流式响应示例
//!
//! 这个示例展示了如何使用 nanoclaude 的原始事件流：
//! - 从环境变量加载配置
//! - 创建 ClaudeClient 实例
//! - 发起流式调用并在调用方循环中折叠事件
//! - 实时输出文本片段，结束后打印完整的累积响应

use futures::StreamExt;
use nanoclaude::utils::message;
use nanoclaude::{ClaudeClient, Config, Result, Role, StreamedResponse};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // 从环境变量加载配置
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("配置加载失败: {e}");
            eprintln!("请设置 ANTHROPIC_API_KEY 环境变量");
            return Ok(());
        }
    };
    let model = config.model().to_string();

    // 创建客户端
    let client = ClaudeClient::new(config);

    // 发起流式调用
    let messages = vec![message(Role::User, "What is a quaternion?")];
    let mut stream = client.create_message_stream(&messages).await?;

    // 在调用方循环中逐个折叠事件
    let mut response = StreamedResponse::new(model);
    while let Some(result) = stream.next().await {
        match result {
            Ok(event) => {
                if let Some(fragment) = response.fold(event) {
                    print!("{fragment}");
                    io::stdout().flush().ok();
                }
            }
            Err(e) => eprintln!("错误: {e}"),
        }
    }
    println!();

    print_summary(&response);

    Ok(())
}

/// 打印累积响应的各个字段
fn print_summary(response: &StreamedResponse) {
    println!("\n--------------------------------");
    println!("Message ID: {}", response.message_id);
    println!("Model: {}", response.model);
    println!("Role: {:?}", response.role);
    println!("Content Block Type: {:?}", response.content_block_type);
    println!("Content Block Index: {}", response.content_block_index);
    println!("Content: {}", response.content);
    println!("Stop Reason: {:?}", response.stop_reason);
    println!("Stop Sequence: {:?}", response.stop_sequence);
    println!("Input Tokens: {}", response.input_tokens);
    println!("Output Tokens: {}", response.output_tokens);
    println!(
        "Cache Creation Input Tokens: {}",
        response.cache_creation_input_tokens
    );
    println!(
        "Cache Read Input Tokens: {}",
        response.cache_read_input_tokens
    );
    println!("--------------------------------");
}
