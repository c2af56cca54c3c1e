//! 持久化的計算結果快取。
//!
//! 鍵是經過正規化的查詢參數（欄位依名稱排序），值以 JSON 儲存，
//! 追加寫入 `results.jsonl`。條目永不過期：它們記錄的是確定性的事實，
//! 例如地理編碼座標或特定時間的旅行時間查詢。
//!
//! 同一個鍵在未命中時的並發查詢會合併成一次計算，其他呼叫者等待同一個結果。

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;
use tokio::sync::OnceCell;

use crate::domain::model::{Location, TravelTimeQuery};
use crate::utils::error::{HouseFinderError, Result};

pub const CACHE_FILE_NAME: &str = "results.jsonl";

/// 正規化後的快取鍵：`<種類>:<欄位排序後的 JSON>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new<P: Serialize + ?Sized>(kind: &str, params: &P) -> Result<Self> {
        let value = canonicalize(serde_json::to_value(params)?);
        Ok(Self(format!("{}:{}", kind, serde_json::to_string(&value)?)))
    }

    pub fn travel_time(query: &TravelTimeQuery) -> Result<Self> {
        Self::new("travel_time", query)
    }

    pub fn geocode(name: &str) -> Result<Self> {
        Self::new("geocode", &serde_json::json!({ "name": name }))
    }

    pub fn nearest_places(location: Location, category: &str) -> Result<Self> {
        Self::new(
            "nearest_places",
            &serde_json::json!({ "location": location, "category": category }),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 遞迴地依欄位名稱排序，與建立順序無關
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            let mut sorted = Map::new();
            for (k, v) in entries {
                sorted.insert(k, canonicalize(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

#[derive(Serialize, Deserialize)]
struct CacheRecord {
    key: String,
    value: Value,
}

type Cell = Arc<OnceCell<Value>>;

pub struct ResultCache {
    cells: Mutex<HashMap<String, Cell>>,
    writer: tokio::sync::Mutex<Option<tokio::fs::File>>,
    path: Option<PathBuf>,
    hits: AtomicUsize,
    computations: AtomicUsize,
}

impl ResultCache {
    /// 只存在記憶體中的快取，不寫檔
    pub fn in_memory() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
            writer: tokio::sync::Mutex::new(None),
            path: None,
            hits: AtomicUsize::new(0),
            computations: AtomicUsize::new(0),
        }
    }

    /// 開啟（或建立）目錄中的持久化快取，並載入既有條目
    pub async fn open<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref();
        tokio::fs::create_dir_all(directory)
            .await
            .map_err(|e| HouseFinderError::cache(format!("cannot create {}: {}", directory.display(), e)))?;

        let path = directory.join(CACHE_FILE_NAME);
        let mut cells = HashMap::new();

        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| HouseFinderError::cache(format!("cannot read {}: {}", path.display(), e)))?;

            for (index, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let record: CacheRecord = serde_json::from_str(line).map_err(|e| {
                    HouseFinderError::cache(format!(
                        "corrupt entry at {}:{}: {}",
                        path.display(),
                        index + 1,
                        e
                    ))
                })?;
                // 重複的鍵以最後一筆為準
                cells.insert(record.key, Arc::new(OnceCell::new_with(Some(record.value))));
            }
        }

        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| HouseFinderError::cache(format!("cannot open {}: {}", path.display(), e)))?;

        tracing::debug!("🗄️ Loaded {} cached results from {}", cells.len(), path.display());

        Ok(Self {
            cells: Mutex::new(cells),
            writer: tokio::sync::Mutex::new(Some(file)),
            path: Some(path),
            hits: AtomicUsize::new(0),
            computations: AtomicUsize::new(0),
        })
    }

    /// 命中時回傳快取值；未命中時執行 `compute`，儲存後回傳。
    ///
    /// 同一個鍵同時只會有一個 `compute` 在執行，等待者共用其結果。
    /// `compute` 失敗時不會寫入任何條目。
    pub async fn get_or_compute<T, F, Fut>(&self, key: &CacheKey, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let cell = self.cell(key)?;

        if let Some(value) = cell.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(serde_json::from_value(value.clone())?);
        }

        let value = cell
            .get_or_try_init(|| async {
                self.computations.fetch_add(1, Ordering::Relaxed);
                let computed = compute().await?;
                let value = serde_json::to_value(&computed)?;
                self.persist(key, &value).await?;
                Ok::<Value, HouseFinderError>(value)
            })
            .await?;

        Ok(serde_json::from_value(value.clone())?)
    }

    fn cell(&self, key: &CacheKey) -> Result<Cell> {
        let mut cells = self
            .cells
            .lock()
            .map_err(|_| HouseFinderError::cache("cache index lock poisoned"))?;
        Ok(cells
            .entry(key.as_str().to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone())
    }

    async fn persist(&self, key: &CacheKey, value: &Value) -> Result<()> {
        if self.path.is_none() {
            return Ok(());
        }

        let mut line = serde_json::to_vec(&CacheRecord {
            key: key.as_str().to_string(),
            value: value.clone(),
        })?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        let file = writer
            .as_mut()
            .ok_or_else(|| HouseFinderError::cache("cache is closed"))?;

        file.write_all(&line)
            .await
            .map_err(|e| HouseFinderError::cache(format!("write failed: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| HouseFinderError::cache(format!("flush failed: {}", e)))?;

        Ok(())
    }

    /// 寫回並關閉檔案；之後的寫入會失敗
    pub async fn close(&self) -> Result<()> {
        let mut writer = self.writer.lock().await;
        if let Some(mut file) = writer.take() {
            file.flush()
                .await
                .map_err(|e| HouseFinderError::cache(format!("flush failed: {}", e)))?;
            file.sync_all()
                .await
                .map_err(|e| HouseFinderError::cache(format!("sync failed: {}", e)))?;
            tracing::debug!("🗄️ Result cache closed ({} entries)", self.len());
        }
        Ok(())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.cells
            .lock()
            .map(|cells| {
                cells
                    .get(key.as_str())
                    .map(|cell| cell.initialized())
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    /// 已完成計算的條目數
    pub fn len(&self) -> usize {
        self.cells
            .lock()
            .map(|cells| cells.values().filter(|cell| cell.initialized()).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// 實際執行過的計算次數
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{TimeOfDay, TravelMode};

    #[test]
    fn test_key_ignores_field_order() {
        let a = serde_json::json!({ "origin": "a", "destination": "b", "mode": "transit" });
        let mut b = Map::new();
        b.insert("mode".to_string(), Value::from("transit"));
        b.insert("destination".to_string(), Value::from("b"));
        b.insert("origin".to_string(), Value::from("a"));

        let key_a = CacheKey::new("travel_time", &a).unwrap();
        let key_b = CacheKey::new("travel_time", &Value::Object(b)).unwrap();
        assert_eq!(key_a, key_b);
    }

    #[test]
    fn test_key_kinds_do_not_collide() {
        let geocode = CacheKey::geocode("Leeds").unwrap();
        let nearest = CacheKey::nearest_places(Location::new(0.0, 0.0), "Leeds").unwrap();
        assert_ne!(geocode, nearest);
        assert!(geocode.as_str().starts_with("geocode:"));
    }

    #[test]
    fn test_travel_time_key_includes_time() {
        let mut query = TravelTimeQuery {
            origin: Location::new(51.5, -0.1),
            destination: Location::new(51.6, -0.2),
            mode: TravelMode::Transit,
            arrival_time: None,
            departure_time: None,
        };
        let without = CacheKey::travel_time(&query).unwrap();
        query.arrival_time = Some(TimeOfDay::new(9, 0).unwrap());
        let with = CacheKey::travel_time(&query).unwrap();

        assert_ne!(without, with);
        assert!(with.as_str().contains("09:00"));
    }

    #[tokio::test]
    async fn test_hit_after_miss() {
        let cache = ResultCache::in_memory();
        let key = CacheKey::geocode("Bath").unwrap();

        let first: u64 = cache.get_or_compute(&key, || async { Ok(42) }).await.unwrap();
        let second: u64 = cache
            .get_or_compute(&key, || async { Ok(7) })
            .await
            .unwrap();

        assert_eq!(first, 42);
        assert_eq!(second, 42);
        assert_eq!(cache.computations(), 1);
        assert_eq!(cache.hits(), 1);
        assert!(cache.contains(&key));
    }

    #[tokio::test]
    async fn test_failed_compute_is_not_stored() {
        let cache = ResultCache::in_memory();
        let key = CacheKey::geocode("Nowhere").unwrap();

        let result: Result<u64> = cache
            .get_or_compute(&key, || async {
                Err(HouseFinderError::ProcessingError {
                    message: "boom".to_string(),
                })
            })
            .await;
        assert!(result.is_err());
        assert!(!cache.contains(&key));

        let retried: u64 = cache.get_or_compute(&key, || async { Ok(1) }).await.unwrap();
        assert_eq!(retried, 1);
        assert_eq!(cache.computations(), 2);
    }
}
