//! 键值存储 - 基础设施层
//!
//! 持有存储资源，只对外暴露 get / set 能力。
//! 结果存储等上层服务通过该接口读写，便于在测试中替换为内存实现。

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tokio::fs;

/// 键值存储能力
///
/// 语义对齐平台本地存储：按字符串键读写整块字符串值，
/// 读不到返回 `None`，写入整体覆盖。
pub trait KvStore {
    /// 读取指定键的值，不存在时返回 `None`
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;

    /// 写入指定键的值（整体覆盖）
    fn set(&self, key: &str, value: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 文件键值存储
///
/// 每个键对应数据目录下的一个 JSON 文件，读写均为全量操作。
pub struct FileKvStore {
    data_dir: PathBuf,
}

impl FileKvStore {
    /// 创建文件键值存储
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("无法读取存储文件: {}", path.display()))
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .await
            .with_context(|| format!("无法创建数据目录: {}", self.data_dir.display()))?;
        let path = self.path_for(key);
        fs::write(&path, value)
            .await
            .with_context(|| format!("无法写入存储文件: {}", path.display()))?;
        Ok(())
    }
}

/// 内存键值存储
///
/// 测试用实现，不落盘。
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().expect("存储锁中毒");
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().expect("存储锁中毒");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("quiz_results").await.unwrap(), None);

        store.set("quiz_results", "[]").await.unwrap();
        assert_eq!(
            store.get("quiz_results").await.unwrap(),
            Some("[]".to_string())
        );

        // 整体覆盖
        store.set("quiz_results", "[1]").await.unwrap();
        assert_eq!(
            store.get("quiz_results").await.unwrap(),
            Some("[1]".to_string())
        );
    }

    #[tokio::test]
    async fn file_store_missing_key_is_none() {
        let dir = std::env::temp_dir().join("ai_quiz_trainer_kv_test_missing");
        let store = FileKvStore::new(&dir);
        assert_eq!(store.get("nothing_here").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = std::env::temp_dir().join("ai_quiz_trainer_kv_test_rw");
        let _ = tokio::fs::remove_dir_all(&dir).await;

        let store = FileKvStore::new(&dir);
        store.set("quiz_results", r#"[{"id":"1"}]"#).await.unwrap();
        assert_eq!(
            store.get("quiz_results").await.unwrap(),
            Some(r#"[{"id":"1"}]"#.to_string())
        );

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
