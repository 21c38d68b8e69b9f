// ==========================================
// 镜片订单管理系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 引擎内无致命错误, 全部以类型化结果返回调用方
// ==========================================

use crate::domain::types::{OrderStatus, SequenceEntryStatus};
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 状态机错误 =====
    #[error("非法状态转换: from={from} to={to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    // ===== 并发控制错误 =====
    #[error("乐观锁冲突: {entity} id={id}, expected={expected}, actual={actual}")]
    StaleState {
        entity: &'static str,
        id: String,
        expected: String,
        actual: String,
    },

    // ===== 参照数据错误 =====
    #[error("参照数据缺失: {entity} id={id}")]
    MissingReference { entity: &'static str, id: String },

    // ===== 序号台账错误 =====
    #[error("无效单号区间: start={start} end={end}")]
    InvalidRange { start: i64, end: i64 },

    #[error("缺口已处理: store={store_id} number={number} status={status}")]
    AlreadyResolved {
        store_id: String,
        number: i64,
        status: SequenceEntryStatus,
    },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
