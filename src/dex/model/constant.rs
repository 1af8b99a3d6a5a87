use rbatis::crud;
use serde::{Deserialize, Serialize};

/// 游标行的固定主键
pub const ACTION_POS_ID: &str = "action_pos";

/// table: constants
///
/// 单行键值表，value 存字符串形式的游标位置。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ConstantEntity {
    pub id: String,
    pub value: String,
}

crud!(ConstantEntity {}, "constants");
