// ==========================================
// 镜片订单管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、封闭枚举、派生结构
// 红线: 不含数据访问逻辑, 不含引擎逻辑
// ==========================================

pub mod order;
pub mod reference;
pub mod sequence;
pub mod sla;
pub mod types;

// 重导出核心类型
pub use order::{Order, StatusEvent};
pub use reference::{Lab, LensClass, ReferenceData, Store, Treatment};
pub use sequence::{ExpectedSequenceEntry, SequenceStats};
pub use sla::SlaProfile;
pub use types::{
    JustificationType, OrderStatus, Priority, SequenceEntryStatus, SequenceOrigin, SlaStatus,
};
