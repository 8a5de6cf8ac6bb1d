//! 题目来源 - 业务能力层
//!
//! 把"出题"抽象为可注入接口：网络实现（LlmService）和本地实现
//! （FallbackBank）各自实现该接口，测试可以换成确定性的假实现。
//! `QuestionGenerator` 负责编排两者：先走 LLM，任何失败都静默兜底。

use anyhow::Result;
use tracing::{info, warn};

use crate::models::question::{Question, QuizConfig};
use crate::services::fallback_bank::FallbackBank;
use crate::services::llm_service::LlmService;

/// 题目来源接口
///
/// 为给定配置生成指定数量的题目，可能在网络 I/O 上挂起
pub trait QuestionSource {
    fn generate(
        &self,
        config: &QuizConfig,
        count: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Question>>> + Send;
}

impl QuestionSource for LlmService {
    async fn generate(&self, config: &QuizConfig, count: usize) -> Result<Vec<Question>> {
        self.generate_questions(config, count).await
    }
}

impl QuestionSource for FallbackBank {
    async fn generate(&self, config: &QuizConfig, count: usize) -> Result<Vec<Question>> {
        Ok(self.pick(&config.topic, count))
    }
}

/// 题目生成编排
///
/// 职责：
/// - 先尝试主来源（通常是 LLM）
/// - 任何失败记一条告警后静默退到本地题池，不向用户暴露降级
/// - 兜底永不失败，返回的题目数量可能少于请求数量
pub struct QuestionGenerator<S: QuestionSource> {
    primary: S,
    fallback: FallbackBank,
}

impl<S: QuestionSource> QuestionGenerator<S> {
    /// 创建题目生成编排
    pub fn new(primary: S) -> Self {
        Self {
            primary,
            fallback: FallbackBank::new(),
        }
    }

    /// 生成题目
    ///
    /// # 参数
    /// - `config`: 测验配置
    /// - `count`: 需要的题目数量
    ///
    /// # 返回
    /// 返回非空题目列表；只有请求数量为 0 时返回空列表
    pub async fn generate(&self, config: &QuizConfig, count: usize) -> Result<Vec<Question>> {
        match self.primary.generate(config, count).await {
            Ok(questions) if !questions.is_empty() => {
                info!("✓ 题目生成完成，共 {} 道", questions.len());
                Ok(questions)
            }
            Ok(_) => {
                warn!("⚠️ 主来源返回空题目列表，使用本地题池兜底");
                self.fall_back(config, count)
            }
            Err(e) => {
                warn!("⚠️ 题目生成失败，使用本地题池兜底: {}", e);
                self.fall_back(config, count)
            }
        }
    }

    fn fall_back(&self, config: &QuizConfig, count: usize) -> Result<Vec<Question>> {
        let questions = self.fallback.pick(&config.topic, count);
        if questions.is_empty() && count > 0 {
            anyhow::bail!("本地题池没有可用题目");
        }
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Difficulty;

    /// 永远失败的假来源
    struct FailingSource;

    impl QuestionSource for FailingSource {
        async fn generate(&self, _config: &QuizConfig, _count: usize) -> Result<Vec<Question>> {
            anyhow::bail!("网络不可用")
        }
    }

    /// 返回固定题目的假来源
    struct FixedSource(Vec<Question>);

    impl QuestionSource for FixedSource {
        async fn generate(&self, _config: &QuizConfig, _count: usize) -> Result<Vec<Question>> {
            Ok(self.0.clone())
        }
    }

    fn config_for(topic: &str) -> QuizConfig {
        QuizConfig::new(topic, Difficulty::Beginner, 2).unwrap()
    }

    #[tokio::test]
    async fn primary_result_passes_through() {
        let question = Question {
            id: 1,
            text: "Q?".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 0,
        };
        let generator = QuestionGenerator::new(FixedSource(vec![question.clone()]));

        let questions = generator.generate(&config_for("Rust"), 1).await.unwrap();
        assert_eq!(questions, vec![question]);
    }

    #[tokio::test]
    async fn failure_falls_back_silently() {
        let generator = QuestionGenerator::new(FailingSource);

        let questions = generator.generate(&config_for("Python"), 4).await.unwrap();
        // 兜底来自本地题池，数量不超过请求数
        assert!(!questions.is_empty());
        assert!(questions.len() <= 4);
    }

    #[tokio::test]
    async fn empty_primary_result_falls_back() {
        let generator = QuestionGenerator::new(FixedSource(Vec::new()));

        let questions = generator.generate(&config_for("React"), 3).await.unwrap();
        assert_eq!(questions.len(), 3);
    }
}
