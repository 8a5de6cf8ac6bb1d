//! 结果记录器 - 业务能力层
//!
//! 只负责"终态会话 → 持久化记录"能力：同步构造记录，
//! 再把记录插到结果列表最前面整体保存（最近的测验排在最前）。

use anyhow::Result;
use chrono::Local;
use tracing::info;

use crate::infrastructure::KvStore;
use crate::models::result::QuizResult;
use crate::services::result_store::ResultStore;
use crate::workflow::session::SessionOutcome;

/// 结果记录器
pub struct ResultRecorder;

impl ResultRecorder {
    /// 创建结果记录器
    pub fn new() -> Self {
        Self
    }

    /// 记录一次终态会话
    ///
    /// # 参数
    /// - `outcome`: 会话快照（完成或保存式放弃）
    /// - `store`: 结果存储
    ///
    /// # 返回
    /// 返回已持久化的记录
    pub async fn record<S: KvStore>(
        &self,
        outcome: &SessionOutcome,
        store: &ResultStore<S>,
    ) -> Result<QuizResult> {
        let mut all = store.load_all().await;
        let record = self.build_record(outcome, &all);

        // 最近的记录排在最前
        all.insert(0, record.clone());
        store.save_all(&all).await?;

        info!(
            "✓ 结果已记录: {} | 得分 {}/{}{}",
            record.topic,
            record.score,
            record.total_questions,
            if record.is_partial { " (部分)" } else { "" }
        );

        Ok(record)
    }

    /// 由会话快照构造结果记录
    ///
    /// id 取毫秒时间戳；与已有记录撞上时逐一加一，保证列表内唯一
    pub fn build_record(&self, outcome: &SessionOutcome, existing: &[QuizResult]) -> QuizResult {
        let total_questions = outcome.questions.len();
        let correct_answers: Vec<i32> = outcome
            .questions
            .iter()
            .map(|q| q.correct_answer as i32)
            .collect();

        let mut id = Local::now().timestamp_millis();
        let mut id_str = id.to_string();
        while existing.iter().any(|r| r.id == id_str) {
            id += 1;
            id_str = id.to_string();
        }

        QuizResult {
            id: id_str,
            topic: outcome.config.topic.clone(),
            difficulty: outcome.config.difficulty.id().to_string(),
            experience_level: outcome.config.experience_level().name().to_string(),
            questions_count: total_questions,
            score: outcome.score,
            total_questions,
            date_taken: Local::now().format("%Y-%m-%d").to_string(),
            user_answers: outcome.user_answers.clone(),
            correct_answers,
            questions: outcome.questions.clone(),
            is_partial: outcome.is_partial,
            answered_count: outcome.answered_count,
        }
    }
}

impl Default for ResultRecorder {
    fn default() -> Self {
        Self::new()
    }
}
