//! 测验会话 - 流程层
//!
//! 核心职责：定义"一次测验"的状态机
//!
//! 状态流转：
//! 1. AwaitingAnswer(0) → 选择答案 → 前进 → ... → Completed
//! 2. 任意 AwaitingAnswer → 放弃（保存部分 / 直接丢弃）→ Abandoned
//!
//! 终态不直接持久化，统一先转成 SessionOutcome 快照再交给结果记录器。

use crate::error::SessionError;
use crate::models::question::{Question, QuizConfig, OPTION_COUNT};
use crate::models::result::UNANSWERED;

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 等待当前题目作答
    AwaitingAnswer,
    /// 全部题目作答完毕
    Completed,
    /// 中途放弃
    Abandoned,
}

/// 前进结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// 进入下一题
    Next,
    /// 刚好答完最后一题，会话完成
    Finished,
}

/// 放弃方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonMode {
    /// 不保存，直接丢弃
    Discard,
    /// 保存部分结果（未答位置填充哨兵值）
    SavePartial,
}

/// 终态会话快照
///
/// 完成或保存式放弃时的全部信息，交给结果记录器转成持久化记录
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub config: QuizConfig,
    pub questions: Vec<Question>,
    /// 逐题答案，未作答位置为 -1
    pub user_answers: Vec<i32>,
    pub score: usize,
    pub answered_count: usize,
    pub is_partial: bool,
}

/// 测验会话状态机
///
/// 一次只推进一道题：先 `select_answer` 记录候选，再 `advance` 落定。
/// 不变量：`answers.len() == current_index`，且两者都不超过题目总数。
#[derive(Debug)]
pub struct QuizSession {
    config: QuizConfig,
    questions: Vec<Question>,
    current_index: usize,
    /// 当前题目的候选答案，advance 时落定
    candidate: Option<usize>,
    /// 已落定的答案
    answers: Vec<usize>,
    state: SessionState,
}

impl QuizSession {
    /// 基于非空题目序列创建会话，初始状态为第 0 题待作答
    pub fn new(config: QuizConfig, questions: Vec<Question>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyQuestionList);
        }
        Ok(Self {
            config,
            questions,
            current_index: 0,
            candidate: None,
            answers: Vec::new(),
            state: SessionState::AwaitingAnswer,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// 当前题目（会话已结束时为 None）
    pub fn current_question(&self) -> Option<&Question> {
        if self.state == SessionState::AwaitingAnswer {
            self.questions.get(self.current_index)
        } else {
            None
        }
    }

    /// 当前题目下标（0 基）
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// 已落定的答案数量
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// 当前题目的候选答案
    pub fn selected_answer(&self) -> Option<usize> {
        self.candidate
    }

    /// 是否在最后一题上
    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    /// 为当前题目选择候选答案
    ///
    /// 不前进；重复调用覆盖之前的选择（以最后一次为准）
    pub fn select_answer(&mut self, option_index: usize) -> Result<(), SessionError> {
        if self.state != SessionState::AwaitingAnswer {
            return Err(SessionError::SessionFinished);
        }
        if option_index >= OPTION_COUNT {
            return Err(SessionError::InvalidOption {
                index: option_index,
            });
        }
        self.candidate = Some(option_index);
        Ok(())
    }

    /// 落定当前候选答案并前进
    ///
    /// 没有候选答案时返回 `AnswerRequired`，状态不变。
    /// 答完最后一题时转入 Completed。
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        if self.state != SessionState::AwaitingAnswer {
            return Err(SessionError::SessionFinished);
        }
        let answer = self.candidate.take().ok_or(SessionError::AnswerRequired)?;

        self.answers.push(answer);
        self.current_index += 1;

        if self.current_index == self.questions.len() {
            self.state = SessionState::Completed;
            Ok(Advance::Finished)
        } else {
            Ok(Advance::Next)
        }
    }

    /// 放弃会话
    ///
    /// # 参数
    /// - `mode`: Discard 不留痕迹；SavePartial 返回部分结果快照
    ///   （当前题有候选答案则一并计入，其余位置填 -1）
    pub fn abandon(&mut self, mode: AbandonMode) -> Result<Option<SessionOutcome>, SessionError> {
        if self.state != SessionState::AwaitingAnswer {
            return Err(SessionError::SessionFinished);
        }
        self.state = SessionState::Abandoned;

        match mode {
            AbandonMode::Discard => Ok(None),
            AbandonMode::SavePartial => {
                let mut padded: Vec<i32> = self.answers.iter().map(|&a| a as i32).collect();
                if let Some(candidate) = self.candidate.take() {
                    padded.push(candidate as i32);
                }
                while padded.len() < self.questions.len() {
                    padded.push(UNANSWERED);
                }
                Ok(Some(self.build_outcome(padded, true)))
            }
        }
    }

    /// 完成态会话的快照（未完成时为 None）
    pub fn outcome(&self) -> Option<SessionOutcome> {
        if self.state != SessionState::Completed {
            return None;
        }
        let answers: Vec<i32> = self.answers.iter().map(|&a| a as i32).collect();
        Some(self.build_outcome(answers, false))
    }

    fn build_outcome(&self, user_answers: Vec<i32>, is_partial: bool) -> SessionOutcome {
        let (score, answered_count) = score_answers(&user_answers, &self.questions);
        SessionOutcome {
            config: self.config.clone(),
            questions: self.questions.clone(),
            user_answers,
            score,
            answered_count,
            is_partial,
        }
    }
}

/// 计算得分和已作答数量
///
/// 得分只统计"已作答且等于正确选项"的位置，哨兵值 -1 跳过
pub fn score_answers(user_answers: &[i32], questions: &[Question]) -> (usize, usize) {
    let mut score = 0;
    let mut answered_count = 0;
    for (answer, question) in user_answers.iter().zip(questions.iter()) {
        if *answer == UNANSWERED {
            continue;
        }
        answered_count += 1;
        if *answer == question.correct_answer as i32 {
            score += 1;
        }
    }
    (score, answered_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Difficulty;

    fn make_questions(correct: &[usize]) -> Vec<Question> {
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
    }

    fn make_session(correct: &[usize]) -> QuizSession {
        let config = QuizConfig::new("Rust", Difficulty::Beginner, 2).unwrap();
        QuizSession::new(config, make_questions(correct)).unwrap()
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let config = QuizConfig::new("Rust", Difficulty::Beginner, 2).unwrap();
        assert_eq!(
            QuizSession::new(config, Vec::new()).unwrap_err(),
            SessionError::EmptyQuestionList
        );
    }

    #[test]
    fn advance_without_answer_fails_without_state_change() {
        let mut session = make_session(&[0, 1]);

        assert_eq!(session.advance().unwrap_err(), SessionError::AnswerRequired);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.state(), SessionState::AwaitingAnswer);
    }

    #[test]
    fn last_selection_wins() {
        let mut session = make_session(&[2, 1]);

        session.select_answer(0).unwrap();
        session.select_answer(3).unwrap();
        session.select_answer(2).unwrap();
        session.advance().unwrap();

        session.select_answer(1).unwrap();
        session.advance().unwrap();

        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.user_answers, vec![2, 1]);
        assert_eq!(outcome.score, 2);
    }

    #[test]
    fn invalid_option_index_is_rejected() {
        let mut session = make_session(&[0]);
        assert_eq!(
            session.select_answer(4).unwrap_err(),
            SessionError::InvalidOption { index: 4 }
        );
        assert_eq!(session.selected_answer(), None);
    }

    #[test]
    fn answers_and_index_track_advances() {
        let mut session = make_session(&[0, 0, 0]);

        for n in 1..=3 {
            session.select_answer(0).unwrap();
            session.advance().unwrap();
            // n 次 advance 后：answers.len() == n，current_index == min(n, total)
            assert_eq!(session.answered_count(), n);
            assert_eq!(session.current_index(), n.min(3));
        }
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn completing_all_questions_scores_full() {
        // 场景 A：5 道题全答对
        let correct = [0, 1, 2, 3, 0];
        let mut session = make_session(&correct);

        for &c in &correct {
            session.select_answer(c).unwrap();
            let advanced = session.advance().unwrap();
            if session.state() == SessionState::Completed {
                assert_eq!(advanced, Advance::Finished);
            } else {
                assert_eq!(advanced, Advance::Next);
            }
        }

        let outcome = session.outcome().unwrap();
        assert_eq!(outcome.score, 5);
        assert_eq!(outcome.answered_count, 5);
        assert!(!outcome.is_partial);
        assert_eq!(outcome.user_answers.len(), 5);
    }

    #[test]
    fn abandon_with_save_pads_unanswered() {
        // 场景 B：5 道题答 3 道后保存退出
        let mut session = make_session(&[0, 0, 0, 0, 0]);

        for answer in [0, 1, 0] {
            session.select_answer(answer).unwrap();
            session.advance().unwrap();
        }

        let outcome = session.abandon(AbandonMode::SavePartial).unwrap().unwrap();
        assert_eq!(outcome.user_answers, vec![0, 1, 0, UNANSWERED, UNANSWERED]);
        assert_eq!(outcome.answered_count, 3);
        assert_eq!(outcome.score, 2);
        assert!(outcome.is_partial);
        assert_eq!(session.state(), SessionState::Abandoned);
    }

    #[test]
    fn abandon_with_pending_candidate_counts_it() {
        let mut session = make_session(&[1, 0, 0]);

        session.select_answer(1).unwrap();
        session.advance().unwrap();
        // 第二题选了但还没前进
        session.select_answer(3).unwrap();

        let outcome = session.abandon(AbandonMode::SavePartial).unwrap().unwrap();
        assert_eq!(outcome.user_answers, vec![1, 3, UNANSWERED]);
        assert_eq!(outcome.answered_count, 2);
        assert_eq!(outcome.score, 1);
    }

    #[test]
    fn abandon_discard_leaves_no_outcome() {
        let mut session = make_session(&[0, 0]);
        session.select_answer(0).unwrap();
        session.advance().unwrap();

        assert!(session.abandon(AbandonMode::Discard).unwrap().is_none());
        assert_eq!(session.state(), SessionState::Abandoned);
        // 放弃后不能再操作
        assert_eq!(
            session.select_answer(0).unwrap_err(),
            SessionError::SessionFinished
        );
        assert_eq!(session.advance().unwrap_err(), SessionError::SessionFinished);
    }

    #[test]
    fn score_invariant_holds() {
        // score <= answered_count <= total
        let questions = make_questions(&[0, 1, 2, 3]);
        for answers in [
            vec![0, 1, 2, 3],
            vec![0, 0, 0, 0],
            vec![0, UNANSWERED, 2, UNANSWERED],
            vec![UNANSWERED, UNANSWERED, UNANSWERED, UNANSWERED],
        ] {
            let (score, answered) = score_answers(&answers, &questions);
            assert!(score <= answered);
            assert!(answered <= questions.len());
        }
    }

    #[test]
    fn outcome_only_after_completion() {
        let mut session = make_session(&[0, 0]);
        assert!(session.outcome().is_none());

        session.select_answer(0).unwrap();
        session.advance().unwrap();
        assert!(session.outcome().is_none());

        session.select_answer(0).unwrap();
        session.advance().unwrap();
        assert!(session.outcome().is_some());
    }
}
