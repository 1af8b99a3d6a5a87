use rbatis::{crud, impl_select};
use serde::{Deserialize, Serialize};

/// table: tokens
///
/// 第三方价格源的展示价，和 action 重放互不影响。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct TokenEntity {
    pub id: String,
    pub new_dex_id: Option<String>,
    pub new_dex_ask: Option<f64>,
    pub new_dex_bid: Option<f64>,
    pub whale_ex_price: Option<f64>,
}

crud!(TokenEntity {}, "tokens");
impl_select!(TokenEntity{select_with_new_dex_id() => "`where new_dex_id is not null and new_dex_id != ''`"}, "tokens");
