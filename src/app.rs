//! 应用编排层
//!
//! 串联完整流程：配置校验 → 题目生成 → 会话作答 → 结果记录 → 历史与回顾。
//! 导航语义对齐移动端：答完直接进入回顾，回顾入口只拿 id 再回查存储。

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{SessionError, ValidationError};
use crate::infrastructure::FileKvStore;
use crate::models::question::{Difficulty, QuizConfig, MAX_EXPERIENCE_YEARS};
use crate::models::result::QuizResult;
use crate::services::{LlmService, QuestionGenerator, ResultRecorder, ResultStore};
use crate::workflow::review::{reconstruct, reconstruct_by_id, AnswerVerdict, OptionMark, QuestionReview};
use crate::workflow::session::{AbandonMode, Advance, QuizSession};

/// 应用主结构
pub struct App {
    config: Config,
    generator: QuestionGenerator<LlmService>,
    store: ResultStore<FileKvStore>,
    recorder: ResultRecorder,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        if config.llm_api_key.is_empty() {
            warn!("⚠️ 未配置 LLM_API_KEY，题目生成将直接退到本地题池");
        }

        let generator = QuestionGenerator::new(LlmService::new(&config));
        let store = ResultStore::new(FileKvStore::new(&config.data_dir));

        Ok(Self {
            config,
            generator,
            store,
            recorder: ResultRecorder::new(),
        })
    }

    /// 运行主菜单循环
    pub async fn run(&self) -> Result<()> {
        loop {
            println!();
            println!("========== AI Quiz Trainer ==========");
            println!("  [1] Take a new quiz");
            println!("  [2] Quiz history");
            println!("  [3] Review a result");
            println!("  [q] Quit");

            let choice = match read_line("> ") {
                Ok(choice) => choice,
                // 输入流关闭时直接退出
                Err(_) => break,
            };

            match choice.trim() {
                "1" => {
                    if let Err(e) = self.take_quiz().await {
                        warn!("测验流程异常结束: {}", e);
                    }
                }
                "2" => self.show_history().await,
                "3" => self.review_by_id().await,
                "q" | "Q" => break,
                "" => {}
                other => println!("Unknown choice: {}", other),
            }
        }

        info!("👋 程序退出");
        Ok(())
    }

    /// 一次完整的测验流程
    async fn take_quiz(&self) -> Result<()> {
        let Some(quiz_config) = self.prompt_quiz_config()? else {
            return Ok(());
        };

        println!(
            "\nGenerating {} questions about {}...",
            self.config.question_count, quiz_config.topic
        );

        let questions = self
            .generator
            .generate(&quiz_config, self.config.question_count)
            .await?;

        if self.config.verbose_logging {
            for q in &questions {
                debug!("题目 {}: {}", q.id, q.text);
            }
        }

        let mut session = QuizSession::new(quiz_config, questions)?;
        self.run_session(&mut session).await
    }

    /// 交互式收集并校验测验配置
    ///
    /// 校验不通过时打印提示并返回 None（不进入会话，状态不变）
    fn prompt_quiz_config(&self) -> Result<Option<QuizConfig>> {
        let topic = read_line("Topic (e.g. JavaScript, Python, React): ")?;
        if topic.trim().is_empty() {
            println!("Error: Please fill all fields");
            return Ok(None);
        }

        let labels: Vec<&str> = Difficulty::all().iter().map(|d| d.id()).collect();
        let difficulty_input = read_line(&format!("Difficulty [{}]: ", labels.join("/")))?;
        let Some(difficulty) = Difficulty::parse(&difficulty_input) else {
            println!("Error: Please fill all fields");
            return Ok(None);
        };

        let years_input = read_line(&format!(
            "Years of experience (0-{}): ",
            MAX_EXPERIENCE_YEARS
        ))?;
        let Ok(years) = years_input.trim().parse::<u32>() else {
            println!(
                "Error: Experience must be a number between 0 and {}",
                MAX_EXPERIENCE_YEARS
            );
            return Ok(None);
        };

        match QuizConfig::new(topic.trim(), difficulty, years) {
            Ok(config) => {
                println!(
                    "Difficulty: {} | Experience level: {}",
                    difficulty.name(),
                    config.experience_level().name()
                );
                Ok(Some(config))
            }
            Err(ValidationError::ExperienceOutOfRange { .. }) => {
                println!(
                    "Error: Experience must be a number between 0 and {}",
                    MAX_EXPERIENCE_YEARS
                );
                Ok(None)
            }
            Err(_) => {
                println!("Error: Please fill all fields");
                Ok(None)
            }
        }
    }

    /// 会话作答循环：一次一题，选择后前进
    async fn run_session(&self, session: &mut QuizSession) -> Result<()> {
        loop {
            let Some((text, options)) = session
                .current_question()
                .map(|q| (q.text.clone(), q.options.clone()))
            else {
                break;
            };

            println!();
            println!(
                "Question {} of {}",
                session.current_index() + 1,
                session.total_questions()
            );
            println!("{}", text);
            for (i, option) in options.iter().enumerate() {
                let marker = if session.selected_answer() == Some(i) {
                    ">"
                } else {
                    " "
                };
                println!(" {} [{}] {}", marker, i + 1, option);
            }

            let next_label = if session.is_last_question() {
                "finish quiz"
            } else {
                "next question"
            };
            let input = read_line(&format!("Select 1-4, [n] {}, [q] exit: ", next_label))?;

            match input.trim() {
                "1" | "2" | "3" | "4" => {
                    if let Ok(n) = input.trim().parse::<usize>() {
                        if let Err(e) = session.select_answer(n - 1) {
                            warn!("选择答案失败: {}", e);
                        }
                    }
                }
                "n" | "N" => match session.advance() {
                    Ok(Advance::Next) => {}
                    Ok(Advance::Finished) => {
                        self.finish_session(session).await;
                        break;
                    }
                    Err(SessionError::AnswerRequired) => {
                        println!("Answer Required: please select an answer before proceeding.");
                    }
                    Err(e) => warn!("会话操作失败: {}", e),
                },
                "q" | "Q" => {
                    if self.handle_exit(session).await {
                        break;
                    }
                }
                "" => {}
                other => println!("Unknown input: {}", other),
            }
        }
        Ok(())
    }

    /// 完成会话：打分、持久化、直接进入回顾
    async fn finish_session(&self, session: &QuizSession) {
        let Some(outcome) = session.outcome() else {
            return;
        };

        println!(
            "\nQuiz complete! Score: {}/{}",
            outcome.score,
            outcome.questions.len()
        );

        // 存储失败不致命：记一条告警，流程继续
        match self.recorder.record(&outcome, &self.store).await {
            Ok(record) => print_review_report(&record, &reconstruct(&record)),
            Err(e) => warn!("结果保存失败: {}", e),
        }
    }

    /// 退出对话框：保存并退出 / 不保存退出 / 取消
    ///
    /// # 返回
    /// 返回是否确实退出会话
    async fn handle_exit(&self, session: &mut QuizSession) -> bool {
        println!("\nDo you want to save your progress before exiting?");
        println!("  [s] Save & Exit");
        println!("  [x] Exit Without Saving");
        println!("  [c] Cancel");

        let choice = match read_line("> ") {
            Ok(choice) => choice,
            Err(_) => return true,
        };

        match choice.trim() {
            "s" | "S" => {
                if let Ok(Some(outcome)) = session.abandon(AbandonMode::SavePartial) {
                    match self.recorder.record(&outcome, &self.store).await {
                        Ok(record) => println!(
                            "Progress saved ({}/{} answered).",
                            record.answered_count, record.total_questions
                        ),
                        Err(e) => warn!("部分结果保存失败: {}", e),
                    }
                }
                true
            }
            "x" | "X" => {
                let _ = session.abandon(AbandonMode::Discard);
                true
            }
            _ => false,
        }
    }

    /// 历史列表：最近的测验排在最前
    async fn show_history(&self) {
        let results = self.store.load_all().await;

        if results.is_empty() {
            println!("\nNo quizzes taken yet. Generate your first quiz to get started!");
            return;
        }

        println!("\nPreviously taken tests ({}):", results.len());
        for record in &results {
            print_history_card(record);
        }
    }

    /// 按 id 回顾一条结果
    async fn review_by_id(&self) {
        let Ok(id) = read_line("Result id: ") else {
            return;
        };
        let id = id.trim();
        if id.is_empty() {
            return;
        }

        match reconstruct_by_id(&self.store, id).await {
            Some((record, reviews)) => print_review_report(&record, &reviews),
            None => println!("Result {} not found, returning to menu.", id),
        }
    }
}

/// 历史列表中的单条卡片
fn print_history_card(record: &QuizResult) {
    println!("{}", "─".repeat(60));

    let partial_badge = if record.is_partial { "  [Partial]" } else { "" };
    println!("{}  [{}]{}", record.topic, record.difficulty, partial_badge);
    println!("  Experience level: {}", record.experience_level);

    if record.is_partial {
        println!(
            "  Questions: {}/{} answered",
            record.answered_count, record.total_questions
        );
    } else {
        println!("  Questions: {}", record.total_questions);
    }

    println!(
        "  Score: {}/{} ({}%) {}",
        record.score,
        record.total_questions,
        record.percentage(),
        score_marker(record.percentage())
    );
    println!("  Date: {}   Id: {}", record.date_taken, record.id);
}

/// 按得分档位选择标记：≥80 高、≥60 中、其余低
fn score_marker(percentage: u32) -> &'static str {
    if percentage >= 80 {
        "🟢"
    } else if percentage >= 60 {
        "🟠"
    } else {
        "🔴"
    }
}

/// 回顾报告：汇总头 + 逐题四类选项标注
fn print_review_report(record: &QuizResult, reviews: &[QuestionReview]) {
    println!("\n========== Quiz Review ==========");
    println!("Topic: {}", record.topic);
    println!(
        "Score: {}/{} ({}%)",
        record.score,
        record.total_questions,
        record.percentage()
    );
    if record.is_partial {
        println!(
            "Status: Partial - {}/{} questions answered",
            record.answered_count, record.total_questions
        );
    }
    println!("Date: {}", record.date_taken);

    if reviews.is_empty() {
        println!("\nThis result has no stored questions to review.");
        return;
    }

    for (index, review) in reviews.iter().enumerate() {
        let badge = match review.verdict {
            AnswerVerdict::Correct => "✓ Correct",
            AnswerVerdict::Wrong => "✗ Wrong",
            AnswerVerdict::Unanswered => "? Unanswered",
        };
        println!("\nQuestion {}  [{}]", index + 1, badge);
        println!("{}", review.question.text);

        for (option, mark) in review.question.options.iter().zip(review.marks.iter()) {
            let (indicator, note) = match mark {
                OptionMark::CorrectPick => ("✓", "  ← your answer"),
                OptionMark::WrongPick => ("✗", "  ← your answer"),
                OptionMark::MissedCorrect => ("✓", "  ← correct answer"),
                OptionMark::Neutral => (" ", ""),
            };
            println!("  [{}] {}{}", indicator, option, note);
        }
    }
}

/// 读取一行输入（带提示符）
fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    let bytes = io::stdin().lock().read_line(&mut line)?;
    if bytes == 0 {
        anyhow::bail!("输入流已关闭");
    }
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - AI 测验训练模式");
    info!(
        "📊 模型: {} | 每次 {} 题 | 数据目录: {}",
        config.llm_model_name, config.question_count, config.data_dir
    );
    info!("{}", "=".repeat(60));
}
