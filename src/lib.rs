//! # AI Quiz Trainer
//!
//! 一个 AI 出题、本地刷题的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有存储资源，只暴露能力
//! - `KvStore` - 键值存储能力（文件实现 / 内存实现）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `LlmService` - LLM 出题能力
//! - `FallbackBank` - 本地兜底题池
//! - `QuestionGenerator` - 出题编排（LLM 失败静默兜底）
//! - `ResultStore` / `ResultRecorder` - 结果持久化能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次测验"的完整流程
//! - `QuizSession` - 会话状态机（选择 → 前进 → 完成/放弃）
//! - `review` - 结果回顾重建（逐题四类选项标注）
//!
//! ### ④ 编排层（App）
//! - `app` - 交互式流程：配置 → 生成 → 作答 → 记录 → 历史 → 回顾
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod services;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{GenerationError, SessionError, ValidationError};
pub use infrastructure::{FileKvStore, KvStore, MemoryKvStore};
pub use models::{Difficulty, ExperienceLevel, Question, QuizConfig, QuizResult, UNANSWERED};
pub use services::{
    FallbackBank, LlmService, QuestionGenerator, QuestionSource, ResultRecorder, ResultStore,
};
pub use workflow::{AbandonMode, Advance, QuizSession, SessionOutcome, SessionState};
