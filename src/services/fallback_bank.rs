//! 本地兜底题库 - 业务能力层
//!
//! 只负责"离线出题"能力：LLM 不可用时从预置题池随机取题。
//! 永不失败，是生成链路的最终安全网。

use phf::phf_map;
use rand::seq::SliceRandom;
use rand::thread_rng;
use tracing::debug;

use crate::models::question::Question;

/// 预置题目（编译期常量形式）
struct PoolQuestion {
    text: &'static str,
    options: [&'static str; 4],
    correct: usize,
}

/// 未命中主题时使用的默认题池
pub const DEFAULT_TOPIC: &str = "JavaScript";

static JAVASCRIPT_POOL: [PoolQuestion; 5] = [
    PoolQuestion {
        text: "What is the purpose of the useState hook in React?",
        options: [
            "To manage component state",
            "To handle side effects",
            "To optimize performance",
            "To create components",
        ],
        correct: 0,
    },
    PoolQuestion {
        text: "Which of the following is a valid way to declare a variable in JavaScript?",
        options: ["variable x = 5;", "var x = 5;", "declare x = 5;", "x := 5;"],
        correct: 1,
    },
    PoolQuestion {
        text: "What does the '===' operator do in JavaScript?",
        options: [
            "Assigns a value",
            "Compares values only",
            "Compares values and types",
            "Creates a function",
        ],
        correct: 2,
    },
    PoolQuestion {
        text: "Which method is used to add an element to the end of an array?",
        options: ["push()", "pop()", "shift()", "unshift()"],
        correct: 0,
    },
    PoolQuestion {
        text: "What is the difference between 'let' and 'var' in JavaScript?",
        options: [
            "No difference",
            "let has block scope, var has function scope",
            "var is newer than let",
            "let is faster than var",
        ],
        correct: 1,
    },
];

static PYTHON_POOL: [PoolQuestion; 5] = [
    PoolQuestion {
        text: "Which of the following is used to create a virtual environment in Python?",
        options: ["pip install venv", "python -m venv", "create venv", "virtual env"],
        correct: 1,
    },
    PoolQuestion {
        text: "What does the 'self' parameter represent in Python class methods?",
        options: [
            "The class itself",
            "The instance of the class",
            "A static variable",
            "The parent class",
        ],
        correct: 1,
    },
    PoolQuestion {
        text: "Which Python data structure is ordered and mutable?",
        options: ["tuple", "set", "list", "frozenset"],
        correct: 2,
    },
    PoolQuestion {
        text: "What is the correct way to handle exceptions in Python?",
        options: ["try-catch", "try-except", "catch-throw", "handle-error"],
        correct: 1,
    },
    PoolQuestion {
        text: "Which of the following is NOT a valid Python data type?",
        options: ["int", "float", "char", "str"],
        correct: 2,
    },
];

static REACT_POOL: [PoolQuestion; 5] = [
    PoolQuestion {
        text: "What is JSX in React?",
        options: [
            "A JavaScript library",
            "A syntax extension for JavaScript",
            "A CSS framework",
            "A database",
        ],
        correct: 1,
    },
    PoolQuestion {
        text: "Which hook is used for side effects in functional components?",
        options: ["useState", "useEffect", "useContext", "useReducer"],
        correct: 1,
    },
    PoolQuestion {
        text: "What is the virtual DOM?",
        options: [
            "A real DOM element",
            "A JavaScript representation of the DOM",
            "A CSS selector",
            "An HTML template",
        ],
        correct: 1,
    },
    PoolQuestion {
        text: "How do you pass data from parent to child component?",
        options: ["Using state", "Using props", "Using context", "Using refs"],
        correct: 1,
    },
    PoolQuestion {
        text: "What is the purpose of React.Fragment?",
        options: [
            "To create components",
            "To group elements without extra DOM nodes",
            "To handle state",
            "To make API calls",
        ],
        correct: 1,
    },
];

/// 按主题索引的题池
static QUESTION_POOLS: phf::Map<&'static str, &'static [PoolQuestion]> = phf_map! {
    "JavaScript" => &JAVASCRIPT_POOL,
    "Python" => &PYTHON_POOL,
    "React" => &REACT_POOL,
};

/// 默认题池（与 DEFAULT_TOPIC 对应）
static DEFAULT_POOL: &[PoolQuestion] = &JAVASCRIPT_POOL;

/// 本地兜底题库
///
/// 职责：
/// - 按主题查找预置题池，未知主题退到默认题池
/// - 打乱题池后取前 count 道；题池不够时只返回现有数量
/// - 永不失败
pub struct FallbackBank;

impl FallbackBank {
    /// 创建兜底题库
    pub fn new() -> Self {
        Self
    }

    /// 从题池中随机选取题目
    ///
    /// # 参数
    /// - `topic`: 主题，未收录时使用默认题池
    /// - `count`: 需要的题目数量
    ///
    /// # 返回
    /// 返回最多 `count` 道题目，id 从 1 开始编号
    pub fn pick(&self, topic: &str, count: usize) -> Vec<Question> {
        let pool = QUESTION_POOLS.get(topic).copied().unwrap_or_else(|| {
            debug!("主题 {} 不在预置题池中，使用默认题池 {}", topic, DEFAULT_TOPIC);
            DEFAULT_POOL
        });

        let mut shuffled: Vec<&PoolQuestion> = pool.iter().collect();
        shuffled.shuffle(&mut thread_rng());

        shuffled
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(index, q)| Question {
                id: (index + 1) as u32,
                text: q.text.to_string(),
                options: q.options.iter().map(|s| s.to_string()).collect(),
                correct_answer: q.correct,
            })
            .collect()
    }

    /// 指定主题的题池容量（未知主题按默认题池计）
    pub fn pool_size(&self, topic: &str) -> usize {
        QUESTION_POOLS
            .get(topic)
            .copied()
            .unwrap_or(DEFAULT_POOL)
            .len()
    }
}

impl Default for FallbackBank {
    fn default() -> Self {
        Self::new()
    }
}
