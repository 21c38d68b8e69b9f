// ==========================================
// 镜片订单管理系统 - 配置层
// ==========================================
// 职责: 业务策略参数, 支持 JSON 快照注入
// ==========================================

pub mod sla_policy;

// 重导出核心策略
pub use sla_policy::{policy_keys, SlaPolicy};
