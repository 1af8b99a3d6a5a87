use serde_json::Value;

use crate::error::AppError;
use crate::node::ActionRecord;

/// 链上 unit_price 按 10^8 定点缩放，入库前除回
const UNIT_PRICE_SCALE: f64 = 100_000_000.0;

/// 挂单回执：订单当前的完整剩余状态（非增量）
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReceipt {
    pub id: i64,
    pub account: String,
    pub ask_amount: f64,
    pub ask_symbol: String,
    pub bid_amount: f64,
    pub bid_symbol: String,
    pub unit_price: f64,
}

/// 撮合成交：从对手单上扣减的数量
#[derive(Debug, Clone, PartialEq)]
pub struct MatchFill {
    pub id: i64,
    pub asker: String,
    pub bidder: String,
    pub ask_amount: f64,
    pub ask_symbol: String,
    pub bid_amount: f64,
    pub bid_symbol: String,
    pub unit_price: f64,
}

/// 合约 action 的封闭变体集合
///
/// 未识别的 action 名解码为 Unknown 并被跳过，兼容合约升级新增的 action。
#[derive(Debug, Clone, PartialEq)]
pub enum DexAction {
    AddFavorite { account: String, symbol: String },
    RemoveFavorite { account: String, symbol: String },
    SellReceipt(OrderReceipt),
    BuyReceipt(OrderReceipt),
    SellMatch(MatchFill),
    BuyMatch(MatchFill),
    CancelSell { id: i64, symbol: String },
    CancelBuy { id: i64, symbol: String },
    Clean { symbol: String },
    Unknown,
}

/// 把一条原始 action 记录解码为类型化变体
///
/// payload 结构不符合该 action 名的预期字段时返回 MalformedPayload，
/// 不做默认值兜底：静默跳过损坏的成交数据是不可接受的。
pub fn decode(record: &ActionRecord) -> Result<DexAction, AppError> {
    let act = &record.action_trace.act;
    let action = match act.name.as_str() {
        "addfav" => DexAction::AddFavorite {
            account: first_actor(record)?,
            symbol: field_str(&act.data, "symbol")?,
        },
        "removefav" => DexAction::RemoveFavorite {
            account: first_actor(record)?,
            symbol: field_str(&act.data, "symbol")?,
        },
        // 回执/撮合在线上同时存在两种 payload 形态：平铺字段，
        // 或嵌套在子键下（卖单与撮合为 "t"，买单回执为 "o"）。
        // 两种适配到同一个规范变体，嵌套形态优先。
        "sellreceipt" => DexAction::SellReceipt(decode_receipt(&act.data, "t")?),
        "buyreceipt" => DexAction::BuyReceipt(decode_receipt(&act.data, "o")?),
        "sellmatch" => DexAction::SellMatch(decode_match(&act.data)?),
        "buymatch" => DexAction::BuyMatch(decode_match(&act.data)?),
        "cancelsell" => {
            let (id, symbol) = decode_cancel(&act.data)?;
            DexAction::CancelSell { id, symbol }
        }
        "cancelbuy" => {
            let (id, symbol) = decode_cancel(&act.data)?;
            DexAction::CancelBuy { id, symbol }
        }
        "clean" => DexAction::Clean {
            symbol: field_str(&act.data, "symbol")?,
        },
        _ => DexAction::Unknown,
    };
    Ok(action)
}

fn decode_receipt(data: &Value, nested_key: &str) -> Result<OrderReceipt, AppError> {
    let data = payload(data, nested_key);
    let (ask_amount, ask_symbol) = field_asset(data, "ask")?;
    let (bid_amount, bid_symbol) = field_asset(data, "bid")?;
    Ok(OrderReceipt {
        id: field_i64(data, "id")?,
        account: field_str(data, "account")?,
        ask_amount,
        ask_symbol,
        bid_amount,
        bid_symbol,
        unit_price: field_i64(data, "unit_price")? as f64 / UNIT_PRICE_SCALE,
    })
}

fn decode_match(data: &Value) -> Result<MatchFill, AppError> {
    let data = payload(data, "t");
    let (ask_amount, ask_symbol) = field_asset(data, "ask")?;
    let (bid_amount, bid_symbol) = field_asset(data, "bid")?;
    Ok(MatchFill {
        id: field_i64(data, "id")?,
        asker: field_str(data, "asker")?,
        bidder: field_str(data, "bidder")?,
        ask_amount,
        ask_symbol,
        bid_amount,
        bid_symbol,
        unit_price: field_i64(data, "unit_price")? as f64 / UNIT_PRICE_SCALE,
    })
}

fn decode_cancel(data: &Value) -> Result<(i64, String), AppError> {
    Ok((field_i64(data, "id")?, field_str(data, "symbol")?))
}

/// 嵌套形态优先：子键存在且为对象时读取子对象，否则按平铺字段读取
fn payload<'a>(data: &'a Value, nested_key: &str) -> &'a Value {
    match data.get(nested_key) {
        Some(inner) if inner.is_object() => inner,
        _ => data,
    }
}

fn first_actor(record: &ActionRecord) -> Result<String, AppError> {
    record
        .action_trace
        .act
        .authorization
        .first()
        .map(|a| a.actor.clone())
        .ok_or_else(|| malformed(&record.action_trace.act.name, "empty authorization"))
}

fn field_str(data: &Value, key: &str) -> Result<String, AppError> {
    match data.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(malformed(key, "missing or non-string field")),
    }
}

/// 数值字段线上既有 JSON number 也有数字字符串两种写法
fn field_i64(data: &Value, key: &str) -> Result<i64, AppError> {
    match data.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| malformed(key, "not an integer")),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| malformed(key, "not an integer")),
        _ => Err(malformed(key, "missing integer field")),
    }
}

fn field_asset(data: &Value, key: &str) -> Result<(f64, String), AppError> {
    parse_asset(&field_str(data, key)?)
        .ok_or_else(|| malformed(key, "bad asset string"))
}

/// 拆分 "12.5000 EOS" 形式的数量字符串为 (数量, 符号)
fn parse_asset(s: &str) -> Option<(f64, String)> {
    let mut parts = s.split_whitespace();
    let amount = parts.next()?.parse::<f64>().ok()?;
    let symbol = parts.next()?;
    if symbol.is_empty() || parts.next().is_some() {
        return None;
    }
    Some((amount, symbol.to_string()))
}

fn malformed(what: &str, reason: &str) -> AppError {
    AppError::MalformedPayload(format!("{}: {}", what, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_asset() {
        assert_eq!(parse_asset("12.5000 EOS"), Some((12.5, "EOS".to_string())));
        assert_eq!(parse_asset("0.0001 KBY"), Some((0.0001, "KBY".to_string())));
        assert_eq!(parse_asset("12.5000"), None);
        assert_eq!(parse_asset("EOS 12.5"), None);
        assert_eq!(parse_asset("1.0 EOS extra"), None);
        assert_eq!(parse_asset(""), None);
    }

    #[test]
    fn test_payload_prefers_nested_object() {
        let flat = serde_json::json!({"id": 1});
        assert!(payload(&flat, "t").get("id").is_some());

        let nested = serde_json::json!({"t": {"id": 2}});
        assert_eq!(payload(&nested, "t").get("id").and_then(|v| v.as_i64()), Some(2));

        // 子键存在但不是对象时按平铺处理
        let odd = serde_json::json!({"t": "x", "id": 3});
        assert_eq!(payload(&odd, "t").get("id").and_then(|v| v.as_i64()), Some(3));
    }

    #[test]
    fn test_field_i64_accepts_numeric_string() {
        let data = serde_json::json!({"id": "42", "n": 7});
        assert_eq!(field_i64(&data, "id").unwrap(), 42);
        assert_eq!(field_i64(&data, "n").unwrap(), 7);
        assert!(field_i64(&data, "missing").is_err());
    }
}
