//! 测试公共设施：内存版镜像网关、脚本化的 action 源、action 构造器。

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use dex_sync::dex::model::{
    DexBuyOrderEntity, DexSellOrderEntity, FavoriteEntity, MatchReceiptEntity, TokenEntity,
};
use dex_sync::dex::store::DexStore;
use dex_sync::error::AppError;
use dex_sync::node::{Act, ActionRecord, ActionSource, ActionTrace, Authorization};

/// 镜像的内存快照，可整体比较做幂等性断言
#[derive(Default, Debug, Clone, PartialEq)]
pub struct MemState {
    pub cursor: Option<i64>,
    pub buy_orders: HashMap<(i64, String), DexBuyOrderEntity>,
    pub sell_orders: HashMap<(i64, String), DexSellOrderEntity>,
    pub match_receipts: Vec<MatchReceiptEntity>,
    pub favorites: HashMap<(String, String), FavoriteEntity>,
    pub tokens: HashMap<String, TokenEntity>,
}

/// 内存实现的 DexStore
///
/// 主键冲突的 insert 会报错，贴近真实库的联合唯一约束；
/// fail_token 指定后，涉及该代币的订单写入返回 PersistenceFailed，
/// 用于模拟页中途的落库失败。
#[derive(Default)]
pub struct MemStore {
    pub state: Mutex<MemState>,
    pub fail_token: Option<String>,
}

impl MemStore {
    pub fn new() -> Self {
        MemStore::default()
    }

    pub fn failing_on(token: &str) -> Self {
        MemStore {
            state: Mutex::new(MemState::default()),
            fail_token: Some(token.to_string()),
        }
    }

    pub fn snapshot(&self) -> MemState {
        self.state.lock().unwrap().clone()
    }

    fn check_token(&self, token_id: &str) -> Result<(), AppError> {
        match &self.fail_token {
            Some(t) if t == token_id => Err(AppError::PersistenceFailed(format!(
                "injected failure for token {}",
                token_id
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl DexStore for MemStore {
    async fn cursor_position(&self) -> Result<i64, AppError> {
        self.state
            .lock()
            .unwrap()
            .cursor
            .ok_or(AppError::NotInitialized)
    }

    async fn init_cursor(&self, position: i64) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        if state.cursor.is_some() {
            return Err(AppError::PersistenceFailed(
                "cursor already initialized".to_string(),
            ));
        }
        state.cursor = Some(position);
        Ok(())
    }

    async fn advance_cursor(&self, position: i64) -> Result<(), AppError> {
        self.state.lock().unwrap().cursor = Some(position);
        Ok(())
    }

    async fn find_buy_order(
        &self,
        id: i64,
        token_id: &str,
    ) -> Result<Option<DexBuyOrderEntity>, AppError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .buy_orders
            .get(&(id, token_id.to_string()))
            .cloned())
    }

    async fn insert_buy_order(&self, order: &DexBuyOrderEntity) -> Result<(), AppError> {
        self.check_token(&order.token_id)?;
        let mut state = self.state.lock().unwrap();
        let key = (order.id, order.token_id.clone());
        if state.buy_orders.contains_key(&key) {
            return Err(AppError::PersistenceFailed(format!(
                "duplicate buy order key {:?}",
                key
            )));
        }
        state.buy_orders.insert(key, order.clone());
        Ok(())
    }

    async fn update_buy_order(&self, order: &DexBuyOrderEntity) -> Result<(), AppError> {
        self.check_token(&order.token_id)?;
        self.state
            .lock()
            .unwrap()
            .buy_orders
            .insert((order.id, order.token_id.clone()), order.clone());
        Ok(())
    }

    async fn delete_buy_order(&self, id: i64, token_id: &str) -> Result<(), AppError> {
        self.state
            .lock()
            .unwrap()
            .buy_orders
            .remove(&(id, token_id.to_string()));
        Ok(())
    }

    async fn delete_buy_orders_by_token(&self, token_id: &str) -> Result<(), AppError> {
        self.state
            .lock()
            .unwrap()
            .buy_orders
            .retain(|(_, t), _| t != token_id);
        Ok(())
    }

    async fn find_sell_order(
        &self,
        id: i64,
        token_id: &str,
    ) -> Result<Option<DexSellOrderEntity>, AppError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .sell_orders
            .get(&(id, token_id.to_string()))
            .cloned())
    }

    async fn insert_sell_order(&self, order: &DexSellOrderEntity) -> Result<(), AppError> {
        self.check_token(&order.token_id)?;
        let mut state = self.state.lock().unwrap();
        let key = (order.id, order.token_id.clone());
        if state.sell_orders.contains_key(&key) {
            return Err(AppError::PersistenceFailed(format!(
                "duplicate sell order key {:?}",
                key
            )));
        }
        state.sell_orders.insert(key, order.clone());
        Ok(())
    }

    async fn update_sell_order(&self, order: &DexSellOrderEntity) -> Result<(), AppError> {
        self.check_token(&order.token_id)?;
        self.state
            .lock()
            .unwrap()
            .sell_orders
            .insert((order.id, order.token_id.clone()), order.clone());
        Ok(())
    }

    async fn delete_sell_order(&self, id: i64, token_id: &str) -> Result<(), AppError> {
        self.state
            .lock()
            .unwrap()
            .sell_orders
            .remove(&(id, token_id.to_string()));
        Ok(())
    }

    async fn delete_sell_orders_by_token(&self, token_id: &str) -> Result<(), AppError> {
        self.state
            .lock()
            .unwrap()
            .sell_orders
            .retain(|(_, t), _| t != token_id);
        Ok(())
    }

    async fn insert_match_receipt(&self, receipt: &MatchReceiptEntity) -> Result<(), AppError> {
        self.check_token(&receipt.token_id)?;
        self.state
            .lock()
            .unwrap()
            .match_receipts
            .push(receipt.clone());
        Ok(())
    }

    async fn has_favorite(&self, account: &str, token_id: &str) -> Result<bool, AppError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .favorites
            .contains_key(&(account.to_string(), token_id.to_string())))
    }

    async fn insert_favorite(&self, favorite: &FavoriteEntity) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        let key = (favorite.account.clone(), favorite.token_id.clone());
        if state.favorites.contains_key(&key) {
            return Err(AppError::PersistenceFailed(format!(
                "duplicate favorite key {:?}",
                key
            )));
        }
        state.favorites.insert(key, favorite.clone());
        Ok(())
    }

    async fn delete_favorite(&self, account: &str, token_id: &str) -> Result<(), AppError> {
        self.state
            .lock()
            .unwrap()
            .favorites
            .remove(&(account.to_string(), token_id.to_string()));
        Ok(())
    }

    async fn tokens_with_new_dex_id(&self) -> Result<Vec<TokenEntity>, AppError> {
        let state = self.state.lock().unwrap();
        let mut tokens: Vec<TokenEntity> = state
            .tokens
            .values()
            .filter(|t| t.new_dex_id.as_deref().map_or(false, |id| !id.is_empty()))
            .cloned()
            .collect();
        tokens.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(tokens)
    }

    async fn update_token(&self, token: &TokenEntity) -> Result<(), AppError> {
        self.state
            .lock()
            .unwrap()
            .tokens
            .insert(token.id.clone(), token.clone());
        Ok(())
    }
}

/// 按调用顺序吐出预置页的 action 源；页耗尽后返回空页
pub struct ScriptedFetcher {
    pages: Mutex<VecDeque<Result<Vec<ActionRecord>, AppError>>>,
}

impl ScriptedFetcher {
    pub fn new(pages: Vec<Result<Vec<ActionRecord>, AppError>>) -> Self {
        ScriptedFetcher {
            pages: Mutex::new(pages.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ActionSource for ScriptedFetcher {
    async fn fetch(
        &self,
        _account: &str,
        _position: i64,
        _page_limit: usize,
    ) -> Result<Vec<ActionRecord>, AppError> {
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn block_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// 构造一条原始 action 记录
pub fn raw_action(seq: i64, name: &str, data: Value) -> ActionRecord {
    raw_action_by(seq, name, data, &[])
}

pub fn raw_action_by(seq: i64, name: &str, data: Value, actors: &[&str]) -> ActionRecord {
    ActionRecord {
        account_action_seq: seq,
        block_time: block_time(),
        action_trace: ActionTrace {
            act: Act {
                name: name.to_string(),
                data,
                authorization: actors
                    .iter()
                    .map(|a| Authorization {
                        actor: a.to_string(),
                    })
                    .collect(),
            },
        },
    }
}
