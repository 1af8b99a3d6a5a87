use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::dex::store::DexStore;
use crate::error::AppError;

#[derive(Deserialize, Debug)]
struct NewDexPriceResponse {
    #[serde(rename = "symbolInfo")]
    symbol_info: NewDexSymbolInfo,
}

#[derive(Deserialize, Debug)]
struct NewDexSymbolInfo {
    #[serde(rename = "askPrice")]
    ask_price: f64,
    #[serde(rename = "bidPrice")]
    bid_price: f64,
}

/// NewDex 展示价任务：逐个代币查询买一卖一价
///
/// 单个代币失败只记日志不中断整轮，价格展示落后一轮无碍。
pub struct NewDexPriceJob {
    client: Client,
    base_url: String,
}

impl NewDexPriceJob {
    pub fn new(client: Client, base_url: String) -> Self {
        NewDexPriceJob { client, base_url }
    }

    pub async fn run_once<S: DexStore>(&self, store: &S) -> Result<(), AppError> {
        let tokens = store.tokens_with_new_dex_id().await?;
        for mut token in tokens {
            let new_dex_id = match token.new_dex_id.clone() {
                Some(id) if !id.is_empty() => id,
                _ => continue,
            };
            match self.get_symbol_info(&new_dex_id).await {
                Ok((ask, bid)) => {
                    token.new_dex_ask = Some(ask);
                    token.new_dex_bid = Some(bid);
                    if let Err(e) = store.update_token(&token).await {
                        error!("update newdex price for {} failed: {}", token.id, e);
                    }
                }
                Err(e) => error!("fetch newdex price for {} failed: {}", token.id, e),
            }
        }
        Ok(())
    }

    async fn get_symbol_info(&self, symbol: &str) -> Result<(f64, f64), AppError> {
        let url = format!("{}/api/symbol/getSymbolInfo", self.base_url);
        let response = self
            .client
            .post(&url)
            .form(&[("symbol", symbol)])
            .send()
            .await?;
        let body = response.text().await?;
        let result: NewDexPriceResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::FetchFailed(format!("bad newdex response: {}", e)))?;
        Ok((result.symbol_info.ask_price, result.symbol_info.bid_price))
    }
}

#[derive(Deserialize, Debug)]
struct WhaleExPriceItem {
    #[serde(rename = "baseCurrency")]
    base_currency: String,
    #[serde(rename = "lastPrice")]
    last_price: f64,
}

/// WhaleEx 最新价任务：一次拉全量符号表再逐个回填
pub struct WhaleExPriceJob {
    client: Client,
    base_url: String,
}

impl WhaleExPriceJob {
    pub fn new(client: Client, base_url: String) -> Self {
        WhaleExPriceJob { client, base_url }
    }

    pub async fn run_once<S: DexStore>(&self, store: &S) -> Result<(), AppError> {
        let items = self.get_symbols().await?;
        let tokens = store.tokens_with_new_dex_id().await?;
        for mut token in tokens {
            let item = match items.iter().find(|x| x.base_currency == token.id) {
                Some(item) => item,
                None => {
                    debug!("no whaleex symbol for {}", token.id);
                    continue;
                }
            };
            token.whale_ex_price = Some(item.last_price);
            if let Err(e) = store.update_token(&token).await {
                error!("update whaleex price for {} failed: {}", token.id, e);
            }
        }
        Ok(())
    }

    async fn get_symbols(&self) -> Result<Vec<WhaleExPriceItem>, AppError> {
        let url = format!("{}/BUSINESS/api/public/symbol", self.base_url);
        let response = self.client.get(&url).send().await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| AppError::FetchFailed(format!("bad whaleex response: {}", e)))
    }
}
