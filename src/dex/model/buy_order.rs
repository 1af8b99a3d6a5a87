use rbatis::{crud, impl_delete, impl_select, impl_update};
use serde::{Deserialize, Serialize};

/// table: dex_buy_orders
///
/// 买单镜像，(id, token_id) 为联合主键：同一个数字 id 会在不同代币下复用。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct DexBuyOrderEntity {
    pub id: i64,
    pub token_id: String,
    pub account: String,
    pub ask: f64,
    pub bid: f64,
    pub unit_price: f64,
    pub time: String,
}

crud!(DexBuyOrderEntity {}, "dex_buy_orders");
impl_select!(DexBuyOrderEntity{select_by_key(id: i64, token_id: &str) -> Option => "`where id = #{id} and token_id = #{token_id} limit 1`"}, "dex_buy_orders");
impl_update!(DexBuyOrderEntity{update_by_key(id: i64, token_id: &str) => "`where id = #{id} and token_id = #{token_id}`"}, "dex_buy_orders");
impl_delete!(DexBuyOrderEntity{delete_by_key(id: i64, token_id: &str) => "`where id = #{id} and token_id = #{token_id}`"}, "dex_buy_orders");
impl_delete!(DexBuyOrderEntity{delete_by_token(token_id: &str) => "`where token_id = #{token_id}`"}, "dex_buy_orders");
