//! LLM 题目生成服务 - 业务能力层
//!
//! 只负责"调用 LLM 生成题目"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Groq, Azure, Gemini 等）

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerationError;
use crate::models::question::{Question, QuizConfig, OPTION_COUNT};

/// 生成请求的系统消息：只允许返回 JSON
const SYSTEM_MESSAGE: &str = "You are an expert quiz generator. Generate quiz questions in \
     valid JSON format only. Do not include any explanations or additional text.";

/// LLM 题目生成服务
///
/// 职责：
/// - 构建生成提示词并调用 LLM API
/// - 校验响应并转换为 Question 列表
/// - 只负责网络路径，兜底由 QuestionGenerator 编排
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

/// LLM 响应中的单个题目（外部不可信数据的宽松形状）
///
/// 源数据里的 id 被忽略，解析后统一从 1 重新编号
#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    correct_answer: usize,
}

/// 包裹形式的响应：`{ "questions": [...] }`
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    questions: Vec<RawQuestion>,
}

impl LlmService {
    /// 创建新的 LLM 题目生成服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    /// 调用 LLM 生成指定数量的题目
    ///
    /// # 参数
    /// - `quiz`: 测验配置（主题、难度、经验）
    /// - `count`: 需要的题目数量
    ///
    /// # 返回
    /// 返回解析校验后的题目列表，id 从 1 开始重新编号。
    /// 网络失败、响应为空或解析失败都会返回 Err，由调用方决定是否兜底。
    pub async fn generate_questions(
        &self,
        quiz: &QuizConfig,
        count: usize,
    ) -> Result<Vec<Question>> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!(
            "生成参数: 主题 {} | 难度 {} | 经验 {} | 数量 {}",
            quiz.topic,
            quiz.difficulty.id(),
            quiz.experience_level().name(),
            count
        );

        let user_message = self.build_generation_prompt(quiz, count);

        // 构建消息列表
        let mut messages = Vec::new();

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_MESSAGE)
            .build()?;
        messages.push(ChatCompletionRequestMessage::System(system_msg));

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.7)
            .max_tokens(2048u32)
            .build()?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            anyhow::anyhow!("LLM API 调用失败: {}", e)
        })?;

        debug!("LLM API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| GenerationError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        let questions = self.parse_generation_response(&content)?;

        debug!("LLM 生成 {} 道题目", questions.len());

        Ok(questions)
    }

    /// 构建题目生成提示词
    ///
    /// 嵌入主题、难度、经验等级和确切数量，并给出要求的 JSON 形状
    fn build_generation_prompt(&self, quiz: &QuizConfig, count: usize) -> String {
        format!(
            r#"Generate {count} multiple choice questions about {topic} for someone with {level} experience level at {difficulty} difficulty.

Requirements:
- Each question should have exactly 4 options
- Only one option should be correct
- Questions should be relevant to software engineering
- Difficulty should match the specified level
- Return ONLY valid JSON in this exact format:

{{
  "questions": [
    {{
      "id": 1,
      "question": "Question text here?",
      "options": ["Option 1", "Option 2", "Option 3", "Option 4"],
      "correctAnswer": 0
    }}
  ]
}}

The correctAnswer field should be the index (0-3) of the correct option in the options array."#,
            count = count,
            topic = quiz.topic,
            level = quiz.experience_level().name(),
            difficulty = quiz.difficulty.id(),
        )
    }

    /// 解析并校验 LLM 的生成响应
    ///
    /// 接受 `{ "questions": [...] }` 或同形状的裸数组，其他形状一律视为解析失败。
    /// 每道题必须恰好 4 个选项且正确答案下标在 [0, 3] 内。
    fn parse_generation_response(
        &self,
        content: &str,
    ) -> Result<Vec<Question>, GenerationError> {
        let cleaned = strip_code_fence(content);

        if cleaned.is_empty() {
            return Err(GenerationError::EmptyContent {
                model: self.model_name.clone(),
            });
        }

        // 先按包裹对象解析，失败再按裸数组解析
        let raw_questions = match serde_json::from_str::<GenerationResponse>(&cleaned) {
            Ok(response) => response.questions,
            Err(_) => match serde_json::from_str::<Vec<RawQuestion>>(&cleaned) {
                Ok(list) => list,
                Err(e) => {
                    return Err(GenerationError::malformed(
                        "既不是 {\"questions\": [...]} 也不是题目数组",
                        e,
                    ))
                }
            },
        };

        if raw_questions.is_empty() {
            return Err(GenerationError::MalformedResponse {
                detail: "题目列表为空".to_string(),
                source: None,
            });
        }

        // 校验并重新编号（忽略源数据中的 id）
        let mut questions = Vec::with_capacity(raw_questions.len());
        for (index, raw) in raw_questions.into_iter().enumerate() {
            if raw.question.trim().is_empty() {
                return Err(GenerationError::InvalidQuestion {
                    index,
                    reason: "题干为空".to_string(),
                });
            }
            if raw.options.len() != OPTION_COUNT {
                return Err(GenerationError::InvalidQuestion {
                    index,
                    reason: format!("选项数量为 {}，应为 {}", raw.options.len(), OPTION_COUNT),
                });
            }
            if raw.correct_answer >= OPTION_COUNT {
                return Err(GenerationError::InvalidQuestion {
                    index,
                    reason: format!(
                        "正确答案下标 {} 超出范围 [0, {}]",
                        raw.correct_answer,
                        OPTION_COUNT - 1
                    ),
                });
            }

            questions.push(Question {
                id: (index + 1) as u32,
                text: raw.question,
                options: raw.options,
                correct_answer: raw.correct_answer,
            });
        }

        Ok(questions)
    }
}

/// 去掉响应外层的 markdown 代码围栏
///
/// LLM 常把 JSON 包在 ```json ... ``` 中，取围栏内的内容；没有围栏时原样修剪
fn strip_code_fence(content: &str) -> String {
    if let Ok(re) = Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```") {
        if let Some(cap) = re.captures(content) {
            if let Some(inner) = cap.get(1) {
                return inner.as_str().trim().to_string();
            }
        }
    }
    content.trim().to_string()
}
