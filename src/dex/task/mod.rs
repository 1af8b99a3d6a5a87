pub mod action_history_job;
pub mod price_job;

pub use action_history_job::ActionHistoryJob;
pub use price_job::{NewDexPriceJob, WhaleExPriceJob};
