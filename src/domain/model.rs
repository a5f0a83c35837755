use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// 圖層可用時間點 (epoch 毫秒)，無法解析的日期以 invalid 標記保留
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(Option<i64>);

impl Timestamp {
    pub const INVALID: Timestamp = Timestamp(None);

    pub fn from_millis(millis: i64) -> Self {
        Self(Some(millis))
    }

    pub fn millis(&self) -> Option<i64> {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Self::from_millis(millis)
    }
}

/// layer id → 可用時間點。每個 key 的時間點已去重，順序沒有意義。
///
/// 所有組合操作都回傳新的值，不修改原本的 mapping。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailableDates {
    layers: BTreeMap<String, Vec<Timestamp>>,
}

impl AvailableDates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, layer_id: &str) -> Option<&[Timestamp]> {
        self.layers.get(layer_id).map(Vec::as_slice)
    }

    pub fn contains_layer(&self, layer_id: &str) -> bool {
        self.layers.contains_key(layer_id)
    }

    pub fn layer_ids(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Timestamp])> {
        self.layers
            .iter()
            .map(|(id, dates)| (id.as_str(), dates.as_slice()))
    }

    /// 回傳加入 `dates` 後的新 mapping，與既有時間點取聯集
    pub fn with_layer_dates<I>(&self, layer_id: &str, dates: I) -> Self
    where
        I: IntoIterator<Item = Timestamp>,
    {
        let mut merged = self.clone();
        merged.union_into(layer_id, dates);
        merged
    }

    /// 深度合併：兩邊都有的 layer 取時間點聯集，不會互相覆蓋
    pub fn merge_deep(&self, other: &AvailableDates) -> Self {
        let mut merged = self.clone();
        merged.absorb(other.clone());
        merged
    }

    /// 把多個 mapping 深度合併進同一個結果，只做一次累積
    pub fn merge_all<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = AvailableDates>,
    {
        let mut merged = AvailableDates::new();
        for source in sources {
            merged.absorb(source);
        }
        merged
    }

    fn absorb(&mut self, other: AvailableDates) {
        for (layer_id, dates) in other.layers {
            self.union_into(&layer_id, dates);
        }
    }

    fn union_into<I>(&mut self, layer_id: &str, dates: I)
    where
        I: IntoIterator<Item = Timestamp>,
    {
        let entry = self.layers.entry(layer_id.to_string()).or_default();
        let mut seen: HashSet<Timestamp> = entry.iter().copied().collect();
        entry.extend(dates.into_iter().filter(|date| seen.insert(*date)));
    }
}

impl FromIterator<(String, Vec<Timestamp>)> for AvailableDates {
    fn from_iter<T: IntoIterator<Item = (String, Vec<Timestamp>)>>(iter: T) -> Self {
        let mut result = AvailableDates::new();
        for (layer_id, dates) in iter {
            result.union_into(&layer_id, dates);
        }
        result
    }
}
