use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::AppError;

/// 节点历史接口的一页 action 查询请求
///
/// offset 为包含区间偏移：pos..=pos+offset，取一页 N 条时 offset = N - 1。
#[derive(Serialize, Debug)]
struct GetActionsRequest<'a> {
    account_name: &'a str,
    pos: i64,
    offset: i64,
}

#[derive(Deserialize, Debug)]
pub struct GetActionsResponse {
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
}

/// 账户 action 流中的一条记录，payload 保持松散类型
#[derive(Deserialize, Debug, Clone)]
pub struct ActionRecord {
    pub account_action_seq: i64,
    pub block_time: NaiveDateTime,
    pub action_trace: ActionTrace,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ActionTrace {
    pub act: Act,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Act {
    pub name: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub authorization: Vec<Authorization>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Authorization {
    pub actor: String,
}

/// action 流的抓取边界，按序返回一页记录
///
/// 返回条数少于 page_limit 即表示日志在当前位置已读完，这是唯一的追平信号。
#[async_trait]
pub trait ActionSource: Send + Sync {
    async fn fetch(
        &self,
        account: &str,
        position: i64,
        page_limit: usize,
    ) -> Result<Vec<ActionRecord>, AppError>;
}

/// 节点查询客户端，显式持有 reqwest::Client，不使用全局单例
pub struct NodeApiClient {
    client: Client,
    base_url: String,
}

impl NodeApiClient {
    pub fn new(client: Client, base_url: String) -> Self {
        NodeApiClient { client, base_url }
    }
}

#[async_trait]
impl ActionSource for NodeApiClient {
    async fn fetch(
        &self,
        account: &str,
        position: i64,
        page_limit: usize,
    ) -> Result<Vec<ActionRecord>, AppError> {
        let url = format!("{}/v1/history/get_actions", self.base_url);
        let body = serde_json::to_string(&GetActionsRequest {
            account_name: account,
            pos: position,
            offset: page_limit as i64 - 1,
        })
        .map_err(|e| AppError::FetchFailed(e.to_string()))?;

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let status_code = response.status();
        let response_body = response.text().await?;
        debug!("get_actions account={} pos={} status={}", account, position, status_code);

        if status_code != StatusCode::OK {
            return Err(AppError::FetchFailed(format!(
                "get_actions returned {}: {}",
                status_code, response_body
            )));
        }

        let result: GetActionsResponse = serde_json::from_str(&response_body)
            .map_err(|e| AppError::FetchFailed(format!("bad get_actions response: {}", e)))?;
        Ok(result.actions)
    }
}
