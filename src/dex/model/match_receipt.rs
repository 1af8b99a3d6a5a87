use rbatis::crud;
use serde::{Deserialize, Serialize};

/// table: match_receipts
///
/// 撮合流水，只追加，不更新不删除。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct MatchReceiptEntity {
    pub token_id: String,
    pub ask: f64,
    pub bid: f64,
    pub asker: String,
    pub bidder: String,
    pub unit_price: f64,
    pub time: String,
    pub is_sell_match: bool,
}

crud!(MatchReceiptEntity {}, "match_receipts");
