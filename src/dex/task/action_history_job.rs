use tracing::{error, info};

use crate::dex::action::{self, DexAction};
use crate::dex::replay;
use crate::dex::store::DexStore;
use crate::error::AppError;
use crate::node::ActionSource;

/// 节点每页返回的 action 条数；整页即说明后面还有
pub const PAGE_LIMIT: usize = 100;

/// action 重放任务
///
/// 每个 tick 从游标位置循环拉页、逐条应用、推进游标，直到某页不满
/// PAGE_LIMIT 为止。页内严格按 sequence 升序应用，后面的 action 依赖
/// 前面留下的状态，不重排也不并行。
pub struct ActionHistoryJob<F, S> {
    pub fetcher: F,
    pub store: S,
    pub account: String,
    pub start_position: i64,
}

impl<F: ActionSource, S: DexStore> ActionHistoryJob<F, S> {
    pub fn new(fetcher: F, store: S, account: String, start_position: i64) -> Self {
        ActionHistoryJob {
            fetcher,
            store,
            account,
            start_position,
        }
    }

    /// 单次 tick：追平 account 的 action 流
    ///
    /// 任何一条 action 解码或落库失败都中断本次 tick，游标停在最后一条
    /// 成功 action 之后，失败的 action 及其后续在下个 tick 重试。
    pub async fn run_once(&self) -> Result<(), AppError> {
        loop {
            let position = self.current_position().await?;
            let actions = self
                .fetcher
                .fetch(&self.account, position, PAGE_LIMIT)
                .await?;
            let count = actions.len();
            info!("{} actions at pos {} in {}", count, position, self.account);

            for record in &actions {
                let seq = record.account_action_seq;
                let name = record.action_trace.act.name.as_str();

                let decoded = action::decode(record).map_err(|e| {
                    error!("decode failed pos={} act={}: {}", seq, name, e);
                    e
                })?;
                if !matches!(decoded, DexAction::Unknown) {
                    info!("handling action log pos={} act={}", seq, name);
                }

                let time = record.block_time.format("%Y-%m-%d %H:%M:%S").to_string();
                replay::apply_action(&self.store, &decoded, &time)
                    .await
                    .map_err(|e| {
                        error!("apply failed pos={} act={}: {}", seq, name, e);
                        e
                    })?;

                self.store.advance_cursor(seq + 1).await?;
            }

            if count < PAGE_LIMIT {
                break;
            }
        }
        Ok(())
    }

    async fn current_position(&self) -> Result<i64, AppError> {
        match self.store.cursor_position().await {
            Ok(position) => Ok(position),
            Err(AppError::NotInitialized) => {
                info!("seeding action cursor at {}", self.start_position);
                self.store.init_cursor(self.start_position).await?;
                Ok(self.start_position)
            }
            Err(e) => Err(e),
        }
    }
}
