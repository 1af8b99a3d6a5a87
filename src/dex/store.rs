use async_trait::async_trait;
use rbatis::RBatis;

use crate::dex::model::constant::ACTION_POS_ID;
use crate::dex::model::{
    ConstantEntity, DexBuyOrderEntity, DexSellOrderEntity, FavoriteEntity, MatchReceiptEntity,
    TokenEntity,
};
use crate::error::AppError;

/// 镜像库的事务网关
///
/// 重放核心只依赖这组按联合主键的点查与原子增删改；每个方法对应一条
/// 独立语句，页中途崩溃后镜像仍停留在某个已应用前缀上。
#[async_trait]
pub trait DexStore: Send + Sync {
    /// 读取游标位置，行不存在时返回 NotInitialized
    async fn cursor_position(&self) -> Result<i64, AppError>;
    /// 首次运行播种游标行
    async fn init_cursor(&self, position: i64) -> Result<(), AppError>;
    /// 仅在 position 之前的 action 全部落库后调用
    async fn advance_cursor(&self, position: i64) -> Result<(), AppError>;

    async fn find_buy_order(
        &self,
        id: i64,
        token_id: &str,
    ) -> Result<Option<DexBuyOrderEntity>, AppError>;
    async fn insert_buy_order(&self, order: &DexBuyOrderEntity) -> Result<(), AppError>;
    async fn update_buy_order(&self, order: &DexBuyOrderEntity) -> Result<(), AppError>;
    async fn delete_buy_order(&self, id: i64, token_id: &str) -> Result<(), AppError>;
    async fn delete_buy_orders_by_token(&self, token_id: &str) -> Result<(), AppError>;

    async fn find_sell_order(
        &self,
        id: i64,
        token_id: &str,
    ) -> Result<Option<DexSellOrderEntity>, AppError>;
    async fn insert_sell_order(&self, order: &DexSellOrderEntity) -> Result<(), AppError>;
    async fn update_sell_order(&self, order: &DexSellOrderEntity) -> Result<(), AppError>;
    async fn delete_sell_order(&self, id: i64, token_id: &str) -> Result<(), AppError>;
    async fn delete_sell_orders_by_token(&self, token_id: &str) -> Result<(), AppError>;

    async fn insert_match_receipt(&self, receipt: &MatchReceiptEntity) -> Result<(), AppError>;

    async fn has_favorite(&self, account: &str, token_id: &str) -> Result<bool, AppError>;
    async fn insert_favorite(&self, favorite: &FavoriteEntity) -> Result<(), AppError>;
    async fn delete_favorite(&self, account: &str, token_id: &str) -> Result<(), AppError>;

    async fn tokens_with_new_dex_id(&self) -> Result<Vec<TokenEntity>, AppError>;
    async fn update_token(&self, token: &TokenEntity) -> Result<(), AppError>;
}

/// MySQL 实现，持有 rbatis 连接池句柄
pub struct DbDexStore {
    db: RBatis,
}

impl DbDexStore {
    pub fn new(db: RBatis) -> Self {
        DbDexStore { db }
    }
}

#[async_trait]
impl DexStore for DbDexStore {
    async fn cursor_position(&self) -> Result<i64, AppError> {
        let rows = ConstantEntity::select_by_column(&self.db, "id", ACTION_POS_ID).await?;
        let row = rows.into_iter().next().ok_or(AppError::NotInitialized)?;
        row.value
            .trim()
            .parse::<i64>()
            .map_err(|e| AppError::PersistenceFailed(format!("bad cursor value: {}", e)))
    }

    async fn init_cursor(&self, position: i64) -> Result<(), AppError> {
        let row = ConstantEntity {
            id: ACTION_POS_ID.to_string(),
            value: position.to_string(),
        };
        ConstantEntity::insert(&self.db, &row).await?;
        Ok(())
    }

    async fn advance_cursor(&self, position: i64) -> Result<(), AppError> {
        let row = ConstantEntity {
            id: ACTION_POS_ID.to_string(),
            value: position.to_string(),
        };
        ConstantEntity::update_by_column(&self.db, &row, "id").await?;
        Ok(())
    }

    async fn find_buy_order(
        &self,
        id: i64,
        token_id: &str,
    ) -> Result<Option<DexBuyOrderEntity>, AppError> {
        Ok(DexBuyOrderEntity::select_by_key(&self.db, id, token_id).await?)
    }

    async fn insert_buy_order(&self, order: &DexBuyOrderEntity) -> Result<(), AppError> {
        DexBuyOrderEntity::insert(&self.db, order).await?;
        Ok(())
    }

    async fn update_buy_order(&self, order: &DexBuyOrderEntity) -> Result<(), AppError> {
        DexBuyOrderEntity::update_by_key(&self.db, order, order.id, &order.token_id).await?;
        Ok(())
    }

    async fn delete_buy_order(&self, id: i64, token_id: &str) -> Result<(), AppError> {
        DexBuyOrderEntity::delete_by_key(&self.db, id, token_id).await?;
        Ok(())
    }

    async fn delete_buy_orders_by_token(&self, token_id: &str) -> Result<(), AppError> {
        DexBuyOrderEntity::delete_by_token(&self.db, token_id).await?;
        Ok(())
    }

    async fn find_sell_order(
        &self,
        id: i64,
        token_id: &str,
    ) -> Result<Option<DexSellOrderEntity>, AppError> {
        Ok(DexSellOrderEntity::select_by_key(&self.db, id, token_id).await?)
    }

    async fn insert_sell_order(&self, order: &DexSellOrderEntity) -> Result<(), AppError> {
        DexSellOrderEntity::insert(&self.db, order).await?;
        Ok(())
    }

    async fn update_sell_order(&self, order: &DexSellOrderEntity) -> Result<(), AppError> {
        DexSellOrderEntity::update_by_key(&self.db, order, order.id, &order.token_id).await?;
        Ok(())
    }

    async fn delete_sell_order(&self, id: i64, token_id: &str) -> Result<(), AppError> {
        DexSellOrderEntity::delete_by_key(&self.db, id, token_id).await?;
        Ok(())
    }

    async fn delete_sell_orders_by_token(&self, token_id: &str) -> Result<(), AppError> {
        DexSellOrderEntity::delete_by_token(&self.db, token_id).await?;
        Ok(())
    }

    async fn insert_match_receipt(&self, receipt: &MatchReceiptEntity) -> Result<(), AppError> {
        MatchReceiptEntity::insert(&self.db, receipt).await?;
        Ok(())
    }

    async fn has_favorite(&self, account: &str, token_id: &str) -> Result<bool, AppError> {
        Ok(FavoriteEntity::select_by_key(&self.db, account, token_id)
            .await?
            .is_some())
    }

    async fn insert_favorite(&self, favorite: &FavoriteEntity) -> Result<(), AppError> {
        FavoriteEntity::insert(&self.db, favorite).await?;
        Ok(())
    }

    async fn delete_favorite(&self, account: &str, token_id: &str) -> Result<(), AppError> {
        FavoriteEntity::delete_by_key(&self.db, account, token_id).await?;
        Ok(())
    }

    async fn tokens_with_new_dex_id(&self) -> Result<Vec<TokenEntity>, AppError> {
        Ok(TokenEntity::select_with_new_dex_id(&self.db).await?)
    }

    async fn update_token(&self, token: &TokenEntity) -> Result<(), AppError> {
        TokenEntity::update_by_column(&self.db, token, "id").await?;
        Ok(())
    }
}
