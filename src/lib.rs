// ==========================================
// 眼镜镜片订单管理系统 - 核心库
// ==========================================
// 定位: 订单生命周期与 SLA 智能引擎
// 边界: 纯计算与校验层; 持久化/界面/打印由外部协作方承担
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 业务策略
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    JustificationType, OrderStatus, Priority, SequenceEntryStatus, SequenceOrigin, SlaStatus,
};

// 领域实体
pub use domain::{
    ExpectedSequenceEntry, Lab, LensClass, Order, ReferenceData, SequenceStats, SlaProfile,
    StatusEvent, Store, Treatment,
};

// 引擎
pub use engine::{
    BusinessCalendar, EngineError, EngineResult, InMemoryOrderIndex, RegisteredOrderLookup,
    RiskAssessment, RiskEngine, SequenceEngine, SlaEngine, Timeline, TimelineEngine,
    TimelineStage, TransitionEngine,
};

// 配置
pub use config::SlaPolicy;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "眼镜镜片订单管理系统";
