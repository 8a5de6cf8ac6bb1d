use std::fmt;

/// 测验会话错误
///
/// 会话状态机中调用方需要区分处理的几种失败情况
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 当前题目尚未选择答案就试图前进
    AnswerRequired,
    /// 选项下标超出范围 [0, 3]
    InvalidOption { index: usize },
    /// 会话已结束（完成或放弃），不能再操作
    SessionFinished,
    /// 题目列表为空，无法开始会话
    EmptyQuestionList,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AnswerRequired => write!(f, "当前题目尚未选择答案"),
            SessionError::InvalidOption { index } => {
                write!(f, "选项下标 {} 超出范围 [0, 3]", index)
            }
            SessionError::SessionFinished => write!(f, "会话已结束，无法继续操作"),
            SessionError::EmptyQuestionList => write!(f, "题目列表为空，无法开始会话"),
        }
    }
}

impl std::error::Error for SessionError {}

/// 题目生成错误
///
/// LLM 响应在进入兜底逻辑之前的失败分类
#[derive(Debug)]
pub enum GenerationError {
    /// LLM 返回内容为空
    EmptyContent { model: String },
    /// 响应无法解析为题目列表
    MalformedResponse {
        detail: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
    /// 单个题目不符合格式要求（选项数量、正确答案下标等）
    InvalidQuestion { index: usize, reason: String },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::EmptyContent { model } => {
                write!(f, "LLM 返回内容为空 (模型: {})", model)
            }
            GenerationError::MalformedResponse { detail, .. } => {
                write!(f, "LLM 响应无法解析为题目列表: {}", detail)
            }
            GenerationError::InvalidQuestion { index, reason } => {
                write!(f, "第 {} 个题目格式不合法: {}", index + 1, reason)
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerationError::MalformedResponse {
                source: Some(source),
                ..
            } => Some(source.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl GenerationError {
    /// 创建响应解析失败错误
    pub fn malformed(
        detail: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        GenerationError::MalformedResponse {
            detail: detail.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// 测验配置校验错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 主题为空
    EmptyTopic,
    /// 工作年限超出范围 [0, 30]
    ExperienceOutOfRange { years: u32 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyTopic => write!(f, "主题不能为空"),
            ValidationError::ExperienceOutOfRange { years } => {
                write!(f, "工作年限 {} 超出范围 [0, 30]", years)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
