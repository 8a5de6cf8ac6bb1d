use anyhow::Result;

use ai_quiz_trainer::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    ai_quiz_trainer::logger::init();

    // 加载配置（可选 TOML 文件 + 环境变量覆盖）
    let config = Config::load().await;

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
