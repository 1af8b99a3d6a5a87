use tracing::debug;

use crate::dex::action::{DexAction, MatchFill};
use crate::dex::model::{
    DexBuyOrderEntity, DexSellOrderEntity, FavoriteEntity, MatchReceiptEntity,
};
use crate::dex::store::DexStore;
use crate::error::AppError;

/// 把一条已解码 action 应用到订单簿镜像
///
/// 每个分支都可安全重放：回执是整单替换，撤单与清理缺单即空操作，
/// 撮合找不到对手单时只追加流水。order 的状态机只有
/// absent -> open -> {open(减量), absent} 这几条边。
pub async fn apply_action<S: DexStore + ?Sized>(
    store: &S,
    action: &DexAction,
    time: &str,
) -> Result<(), AppError> {
    match action {
        DexAction::AddFavorite { account, symbol } => {
            if !store.has_favorite(account, symbol).await? {
                store
                    .insert_favorite(&FavoriteEntity {
                        account: account.clone(),
                        token_id: symbol.clone(),
                    })
                    .await?;
            }
        }
        DexAction::RemoveFavorite { account, symbol } => {
            store.delete_favorite(account, symbol).await?;
        }
        DexAction::SellReceipt(receipt) => {
            // 卖单的代币符号取自 bid 侧
            let token_id = receipt.bid_symbol.clone();
            store.delete_sell_order(receipt.id, &token_id).await?;
            store
                .insert_sell_order(&DexSellOrderEntity {
                    id: receipt.id,
                    token_id,
                    account: receipt.account.clone(),
                    ask: receipt.ask_amount,
                    bid: receipt.bid_amount,
                    unit_price: receipt.unit_price,
                    time: time.to_string(),
                })
                .await?;
        }
        DexAction::BuyReceipt(receipt) => {
            // 买单的代币符号取自 ask 侧
            let token_id = receipt.ask_symbol.clone();
            store.delete_buy_order(receipt.id, &token_id).await?;
            store
                .insert_buy_order(&DexBuyOrderEntity {
                    id: receipt.id,
                    token_id,
                    account: receipt.account.clone(),
                    ask: receipt.ask_amount,
                    bid: receipt.bid_amount,
                    unit_price: receipt.unit_price,
                    time: time.to_string(),
                })
                .await?;
        }
        DexAction::CancelSell { id, symbol } => {
            store.delete_sell_order(*id, symbol).await?;
        }
        DexAction::CancelBuy { id, symbol } => {
            store.delete_buy_order(*id, symbol).await?;
        }
        DexAction::SellMatch(fill) => {
            apply_sell_match(store, fill, time).await?;
        }
        DexAction::BuyMatch(fill) => {
            apply_buy_match(store, fill, time).await?;
        }
        DexAction::Clean { symbol } => {
            store.delete_buy_orders_by_token(symbol).await?;
            store.delete_sell_orders_by_token(symbol).await?;
        }
        DexAction::Unknown => {}
    }
    Ok(())
}

/// 卖方发起的撮合：扣减对应买单，任一余量归零即删单，流水必记
async fn apply_sell_match<S: DexStore + ?Sized>(
    store: &S,
    fill: &MatchFill,
    time: &str,
) -> Result<(), AppError> {
    let token_id = &fill.bid_symbol;
    if let Some(mut order) = store.find_buy_order(fill.id, token_id).await? {
        order.ask -= fill.ask_amount;
        order.bid -= fill.bid_amount;
        if order.ask <= 0.0 || order.bid <= 0.0 {
            store.delete_buy_order(fill.id, token_id).await?;
        } else {
            store.update_buy_order(&order).await?;
        }
    } else {
        // 对手单可能已被先前的 action 撮完或撤掉
        debug!("sellmatch without buy order id={} token={}", fill.id, token_id);
    }
    store
        .insert_match_receipt(&receipt_of(fill, token_id, time, true))
        .await?;
    Ok(())
}

/// 买方发起的撮合，与 apply_sell_match 对称，符号取自 ask 侧
async fn apply_buy_match<S: DexStore + ?Sized>(
    store: &S,
    fill: &MatchFill,
    time: &str,
) -> Result<(), AppError> {
    let token_id = &fill.ask_symbol;
    if let Some(mut order) = store.find_sell_order(fill.id, token_id).await? {
        order.ask -= fill.ask_amount;
        order.bid -= fill.bid_amount;
        if order.ask <= 0.0 || order.bid <= 0.0 {
            store.delete_sell_order(fill.id, token_id).await?;
        } else {
            store.update_sell_order(&order).await?;
        }
    } else {
        debug!("buymatch without sell order id={} token={}", fill.id, token_id);
    }
    store
        .insert_match_receipt(&receipt_of(fill, token_id, time, false))
        .await?;
    Ok(())
}

fn receipt_of(fill: &MatchFill, token_id: &str, time: &str, is_sell_match: bool) -> MatchReceiptEntity {
    MatchReceiptEntity {
        token_id: token_id.to_string(),
        ask: fill.ask_amount,
        bid: fill.bid_amount,
        asker: fill.asker.clone(),
        bidder: fill.bidder.clone(),
        unit_price: fill.unit_price,
        time: time.to_string(),
        is_sell_match,
    }
}
