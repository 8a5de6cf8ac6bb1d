//! 结果存储 - 业务能力层
//!
//! 只负责"测验结果的持久化列表"能力：固定键下的整块 JSON 数组，
//! 全量读、内存改、全量写。读失败一律按"没有数据"处理（本地缓存语义），
//! 不向上抛出。

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::infrastructure::KvStore;
use crate::models::result::QuizResult;

/// 结果列表使用的固定存储键
pub const RESULTS_KEY: &str = "quiz_results";

/// 结果存储
///
/// 职责：
/// - 全量加载 / 保存结果列表
/// - 按 id 线性查找
/// - 读取或反序列化失败时吞掉错误返回空列表
///
/// 加载-修改-保存不具备原子性，后写者胜；调用方保证同一时刻
/// 只有一条逻辑控制流在操作。
pub struct ResultStore<S: KvStore> {
    kv: S,
}

impl<S: KvStore> ResultStore<S> {
    /// 创建结果存储
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// 加载全部结果记录（最近的在最前）
    ///
    /// 没有持久化数据、读取失败或反序列化失败时都返回空列表
    pub async fn load_all(&self) -> Vec<QuizResult> {
        let blob = match self.kv.get(RESULTS_KEY).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!("存储中没有结果记录");
                return Vec::new();
            }
            Err(e) => {
                warn!("读取结果记录失败，按空列表处理: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<QuizResult>>(&blob) {
            Ok(results) => results,
            Err(e) => {
                warn!("结果记录反序列化失败，按空列表处理: {}", e);
                Vec::new()
            }
        }
    }

    /// 全量保存结果列表（整体覆盖持久化数据）
    pub async fn save_all(&self, results: &[QuizResult]) -> Result<()> {
        let blob = serde_json::to_string(results).context("结果记录序列化失败")?;
        self.kv.set(RESULTS_KEY, &blob).await?;
        debug!("已保存 {} 条结果记录", results.len());
        Ok(())
    }

    /// 按 id 查找结果记录
    pub async fn find_by_id(&self, id: &str) -> Option<QuizResult> {
        self.load_all().await.into_iter().find(|r| r.id == id)
    }
}
