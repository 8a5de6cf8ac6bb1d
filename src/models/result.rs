use serde::{Deserialize, Serialize};

use crate::models::question::Question;

/// "未作答"哨兵值
///
/// 旧版存储格式在 0 基下标数组中混入 -1 表示未作答，
/// 为兼容保留原样。注意该编码不给第 5 个真实选项留空间。
pub const UNANSWERED: i32 = -1;

/// 测验结果记录
///
/// 一次完成或中途放弃的测验的持久化快照，创建后不可变。
/// 字段名与移动端存储的 JSON 格式逐一对应（camelCase），
/// `questionsCount` 是旧格式中与 `totalQuestions` 重复的字段，保留以兼容。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: String,
    pub topic: String,
    pub difficulty: String,
    pub experience_level: String,
    pub questions_count: usize,
    pub score: usize,
    pub total_questions: usize,
    pub date_taken: String,
    pub user_answers: Vec<i32>,
    pub correct_answers: Vec<i32>,
    /// 题目快照；早于快照功能的旧记录可能缺失
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub is_partial: bool,
    #[serde(default, rename = "answeredQuestions")]
    pub answered_count: usize,
}

impl QuizResult {
    /// 得分百分比（四舍五入）
    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        ((self.score as f64 / self.total_questions as f64) * 100.0).round() as u32
    }

    /// 记录是否缺失题目快照（旧格式）
    pub fn has_question_snapshot(&self) -> bool {
        !self.questions.is_empty()
    }
}
