use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// 单道选择题
///
/// 固定 4 个选项，`correct_answer` 为正确选项的下标（0-3）。
/// 序列化字段名与移动端存储格式保持一致（camelCase）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    #[serde(rename = "question")]
    pub text: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: usize,
}

/// 每道题的选项数量
pub const OPTION_COUNT: usize = 4;

/// 难度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// 获取存储用的标识符（小写）
    pub fn id(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }

    /// 获取展示名称
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
        }
    }

    /// 尝试从字符串解析难度（忽略大小写）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    /// 全部难度，按从易到难排列
    pub fn all() -> [Difficulty; 4] {
        [
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
            Difficulty::Expert,
        ]
    }
}

/// 经验等级，由工作年限换算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperienceLevel {
    Beginner,
    Junior,
    MidLevel,
    Senior,
    Expert,
}

impl ExperienceLevel {
    /// 按固定年限阈值换算经验等级
    ///
    /// 0 → Beginner, 1-2 → Junior, 3-5 → Mid-level, 6-10 → Senior, >10 → Expert
    pub fn from_years(years: u32) -> Self {
        match years {
            0 => ExperienceLevel::Beginner,
            1..=2 => ExperienceLevel::Junior,
            3..=5 => ExperienceLevel::MidLevel,
            6..=10 => ExperienceLevel::Senior,
            _ => ExperienceLevel::Expert,
        }
    }

    /// 获取展示名称
    pub fn name(self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::MidLevel => "Mid-level",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Expert => "Expert",
        }
    }
}

/// 可输入的最大工作年限
pub const MAX_EXPERIENCE_YEARS: u32 = 30;

/// 一次测验的配置：主题 + 难度 + 工作年限
#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    pub topic: String,
    pub difficulty: Difficulty,
    pub experience_years: u32,
}

impl QuizConfig {
    /// 创建并校验测验配置
    pub fn new(
        topic: impl Into<String>,
        difficulty: Difficulty,
        experience_years: u32,
    ) -> Result<Self, ValidationError> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        if experience_years > MAX_EXPERIENCE_YEARS {
            return Err(ValidationError::ExperienceOutOfRange {
                years: experience_years,
            });
        }
        Ok(Self {
            topic,
            difficulty,
            experience_years,
        })
    }

    /// 由工作年限派生的经验等级
    pub fn experience_level(&self) -> ExperienceLevel {
        ExperienceLevel::from_years(self.experience_years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_level_thresholds() {
        // 阈值边界：0, 1, 2, 3, 5, 6, 10, 11
        assert_eq!(ExperienceLevel::from_years(0), ExperienceLevel::Beginner);
        assert_eq!(ExperienceLevel::from_years(1), ExperienceLevel::Junior);
        assert_eq!(ExperienceLevel::from_years(2), ExperienceLevel::Junior);
        assert_eq!(ExperienceLevel::from_years(3), ExperienceLevel::MidLevel);
        assert_eq!(ExperienceLevel::from_years(5), ExperienceLevel::MidLevel);
        assert_eq!(ExperienceLevel::from_years(6), ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::from_years(10), ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::from_years(11), ExperienceLevel::Expert);
        assert_eq!(ExperienceLevel::from_years(30), ExperienceLevel::Expert);
    }

    #[test]
    fn experience_level_names() {
        assert_eq!(ExperienceLevel::MidLevel.name(), "Mid-level");
        assert_eq!(ExperienceLevel::from_years(7).name(), "Senior");
    }

    #[test]
    fn difficulty_parse() {
        assert_eq!(Difficulty::parse("beginner"), Some(Difficulty::Beginner));
        assert_eq!(Difficulty::parse("  Expert "), Some(Difficulty::Expert));
        assert_eq!(Difficulty::parse("INTERMEDIATE"), Some(Difficulty::Intermediate));
        assert_eq!(Difficulty::parse("hardcore"), None);
        assert_eq!(Difficulty::parse(""), None);
    }

    #[test]
    fn quiz_config_validation() {
        assert!(QuizConfig::new("Rust", Difficulty::Beginner, 3).is_ok());
        assert!(matches!(
            QuizConfig::new("   ", Difficulty::Beginner, 3),
            Err(ValidationError::EmptyTopic)
        ));
        assert!(matches!(
            QuizConfig::new("Rust", Difficulty::Beginner, 31),
            Err(ValidationError::ExperienceOutOfRange { years: 31 })
        ));
    }

    #[test]
    fn question_wire_format() {
        let q = Question {
            id: 1,
            text: "What is ownership?".to_string(),
            options: vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ],
            correct_answer: 2,
        };
        let json = serde_json::to_value(&q).unwrap();
        // 与移动端存储格式保持一致
        assert_eq!(json["question"], "What is ownership?");
        assert_eq!(json["correctAnswer"], 2);
        let back: Question = serde_json::from_value(json).unwrap();
        assert_eq!(back, q);
    }
}
