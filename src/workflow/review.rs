//! 结果回顾 - 流程层
//!
//! 核心职责：把持久化记录还原成逐题回顾视图
//!
//! 每个选项归入四类之一（用户答对的选择 / 用户答错的选择 /
//! 用户错过的正确答案 / 普通选项），该分类驱动回顾界面的呈现语义，
//! 必须精确保持。

use crate::infrastructure::KvStore;
use crate::models::question::Question;
use crate::models::result::{QuizResult, UNANSWERED};
use crate::services::result_store::ResultStore;

/// 单个选项的回顾标注
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// 用户选了且选对
    CorrectPick,
    /// 用户选了但选错
    WrongPick,
    /// 正确答案，但用户答错或未作答
    MissedCorrect,
    /// 普通选项
    Neutral,
}

/// 单题的作答判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerVerdict {
    Correct,
    Wrong,
    Unanswered,
}

/// 单题回顾视图
#[derive(Debug, Clone)]
pub struct QuestionReview {
    pub question: Question,
    /// 用户答案（-1 表示未作答）
    pub user_answer: i32,
    pub is_unanswered: bool,
    pub is_correct: bool,
    pub verdict: AnswerVerdict,
    /// 与选项一一对应的标注
    pub marks: Vec<OptionMark>,
}

/// 把结果记录还原成逐题回顾列表
///
/// 缺失题目快照的旧记录返回空列表，而不是报错
pub fn reconstruct(record: &QuizResult) -> Vec<QuestionReview> {
    record
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| review_question(record, question, index))
        .collect()
}

/// 按 id 查找记录并还原回顾视图
///
/// # 返回
/// 记录不存在时返回 None；存在则返回记录和逐题回顾
pub async fn reconstruct_by_id<S: KvStore>(
    store: &ResultStore<S>,
    id: &str,
) -> Option<(QuizResult, Vec<QuestionReview>)> {
    let record = store.find_by_id(id).await?;
    let reviews = reconstruct(&record);
    Some((record, reviews))
}

fn review_question(record: &QuizResult, question: &Question, index: usize) -> QuestionReview {
    let user_answer = record
        .user_answers
        .get(index)
        .copied()
        .unwrap_or(UNANSWERED);
    let is_unanswered = user_answer == UNANSWERED;
    let is_correct = !is_unanswered && user_answer == question.correct_answer as i32;

    let verdict = if is_unanswered {
        AnswerVerdict::Unanswered
    } else if is_correct {
        AnswerVerdict::Correct
    } else {
        AnswerVerdict::Wrong
    };

    let marks = (0..question.options.len())
        .map(|option_index| {
            let is_user_pick = !is_unanswered && user_answer == option_index as i32;
            let is_correct_answer = question.correct_answer == option_index;

            if is_user_pick && is_correct {
                OptionMark::CorrectPick
            } else if is_user_pick {
                OptionMark::WrongPick
            } else if is_correct_answer && (!is_correct || is_unanswered) {
                OptionMark::MissedCorrect
            } else {
                OptionMark::Neutral
            }
        })
        .collect();

    QuestionReview {
        question: question.clone(),
        user_answer,
        is_unanswered,
        is_correct,
        verdict,
        marks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(user_answers: Vec<i32>, correct: &[usize], with_snapshot: bool) -> QuizResult {
        let questions: Vec<Question> = if with_snapshot {
            correct
                .iter()
                .enumerate()
                .map(|(i, &c)| Question {
                    id: (i + 1) as u32,
                    text: format!("Q{}?", i + 1),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_answer: c,
                })
                .collect()
        } else {
            Vec::new()
        };
        let total = correct.len();
        QuizResult {
            id: "test".to_string(),
            topic: "Rust".to_string(),
            difficulty: "beginner".to_string(),
            experience_level: "Junior".to_string(),
            questions_count: total,
            score: 0,
            total_questions: total,
            date_taken: "2026-08-05".to_string(),
            user_answers,
            correct_answers: correct.iter().map(|&c| c as i32).collect(),
            questions,
            is_partial: false,
            answered_count: 0,
        }
    }

    #[test]
    fn correct_pick_marks() {
        // 用户选对：正确选项标 CorrectPick，其余全 Neutral
        let record = make_record(vec![2], &[2], true);
        let reviews = reconstruct(&record);

        assert_eq!(reviews.len(), 1);
        let review = &reviews[0];
        assert!(review.is_correct);
        assert_eq!(review.verdict, AnswerVerdict::Correct);
        assert_eq!(
            review.marks,
            vec![
                OptionMark::Neutral,
                OptionMark::Neutral,
                OptionMark::CorrectPick,
                OptionMark::Neutral,
            ]
        );
    }

    #[test]
    fn wrong_pick_shows_missed_correct() {
        // 用户选错：错选标 WrongPick，正确答案标 MissedCorrect
        let record = make_record(vec![0], &[3], true);
        let review = &reconstruct(&record)[0];

        assert!(!review.is_correct);
        assert_eq!(review.verdict, AnswerVerdict::Wrong);
        assert_eq!(
            review.marks,
            vec![
                OptionMark::WrongPick,
                OptionMark::Neutral,
                OptionMark::Neutral,
                OptionMark::MissedCorrect,
            ]
        );
    }

    #[test]
    fn unanswered_shows_only_missed_correct() {
        // 未作答：只有正确答案标 MissedCorrect
        let record = make_record(vec![UNANSWERED], &[1], true);
        let review = &reconstruct(&record)[0];

        assert!(review.is_unanswered);
        assert_eq!(review.verdict, AnswerVerdict::Unanswered);
        assert_eq!(
            review.marks,
            vec![
                OptionMark::Neutral,
                OptionMark::MissedCorrect,
                OptionMark::Neutral,
                OptionMark::Neutral,
            ]
        );
    }

    #[test]
    fn legacy_record_without_snapshot_yields_empty_list() {
        // 场景 D：没有题目快照的旧记录
        let record = make_record(vec![0, 1, 2], &[0, 1, 2], false);
        assert!(reconstruct(&record).is_empty());
    }

    #[test]
    fn mixed_record_reviews_each_question() {
        let record = make_record(vec![0, 2, UNANSWERED], &[0, 1, 3], true);
        let reviews = reconstruct(&record);

        assert_eq!(reviews.len(), 3);
        assert_eq!(reviews[0].verdict, AnswerVerdict::Correct);
        assert_eq!(reviews[1].verdict, AnswerVerdict::Wrong);
        assert_eq!(reviews[2].verdict, AnswerVerdict::Unanswered);
    }

    #[test]
    fn answers_shorter_than_snapshot_are_unanswered() {
        // 记录损坏（答案数组偏短）时按未作答处理，不崩
        let record = make_record(vec![0], &[0, 1], true);
        let reviews = reconstruct(&record);

        assert_eq!(reviews.len(), 2);
        assert!(reviews[1].is_unanswered);
    }
}
