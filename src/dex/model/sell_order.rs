use rbatis::{crud, impl_delete, impl_select, impl_update};
use serde::{Deserialize, Serialize};

/// table: dex_sell_orders
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct DexSellOrderEntity {
    pub id: i64,
    pub token_id: String,
    pub account: String,
    pub ask: f64,
    pub bid: f64,
    pub unit_price: f64,
    pub time: String,
}

crud!(DexSellOrderEntity {}, "dex_sell_orders");
impl_select!(DexSellOrderEntity{select_by_key(id: i64, token_id: &str) -> Option => "`where id = #{id} and token_id = #{token_id} limit 1`"}, "dex_sell_orders");
impl_update!(DexSellOrderEntity{update_by_key(id: i64, token_id: &str) => "`where id = #{id} and token_id = #{token_id}`"}, "dex_sell_orders");
impl_delete!(DexSellOrderEntity{delete_by_key(id: i64, token_id: &str) => "`where id = #{id} and token_id = #{token_id}`"}, "dex_sell_orders");
impl_delete!(DexSellOrderEntity{delete_by_token(token_id: &str) => "`where token_id = #{token_id}`"}, "dex_sell_orders");
