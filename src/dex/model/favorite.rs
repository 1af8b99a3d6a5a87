use rbatis::{crud, impl_delete, impl_select};
use serde::{Deserialize, Serialize};

/// table: favorites
///
/// (account, token_id) 唯一。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct FavoriteEntity {
    pub account: String,
    pub token_id: String,
}

crud!(FavoriteEntity {}, "favorites");
impl_select!(FavoriteEntity{select_by_key(account: &str, token_id: &str) -> Option => "`where account = #{account} and token_id = #{token_id} limit 1`"}, "favorites");
impl_delete!(FavoriteEntity{delete_by_key(account: &str, token_id: &str) => "`where account = #{account} and token_id = #{token_id}`"}, "favorites");
