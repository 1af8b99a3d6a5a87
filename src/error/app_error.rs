use thiserror::Error;

/// 应用错误
///
/// 每个变体对应同步过程的一类失败：节点请求、payload 解码、
/// 数据库写入、游标未初始化。调度循环按变体决定日志与中断行为。
#[derive(Error, Debug)]
pub enum AppError {
    /// 节点查询接口请求失败（网络/传输/响应格式）
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    /// action payload 不符合预期结构
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// 数据库读写失败
    #[error("persistence failed: {0}")]
    PersistenceFailed(String),

    /// 游标行不存在（首次运行需要先播种）
    #[error("action cursor is not initialized")]
    NotInitialized,
}

impl From<rbatis::Error> for AppError {
    fn from(err: rbatis::Error) -> Self {
        AppError::PersistenceFailed(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchFailed(err.to_string())
    }
}
