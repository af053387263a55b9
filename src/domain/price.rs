// ==========================================
// 车队 TCO 分析系统 - 价格目录
// ==========================================
// 规则: 未命中的料号按 0 计价, 但需上报为 "unpriced"
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceListItem {
    pub part_number: String,
    pub description: Option<String>,
    /// None 表示价格未维护
    pub unit_price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceCatalog {
    pub price_list_id: Option<String>,
    items: BTreeMap<String, PriceListItem>,
}

impl PriceCatalog {
    pub fn new(price_list_id: impl Into<String>, items: Vec<PriceListItem>) -> Self {
        Self {
            price_list_id: Some(price_list_id.into()),
            items: items
                .into_iter()
                .map(|item| (item.part_number.trim().to_string(), item))
                .collect(),
        }
    }

    /// 查询单价; None 表示料号不存在或价格为空
    pub fn unit_price(&self, part_number: &str) -> Option<f64> {
        self.items
            .get(part_number.trim())
            .and_then(|item| item.unit_price)
    }

    pub fn items(&self) -> impl Iterator<Item = &PriceListItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
