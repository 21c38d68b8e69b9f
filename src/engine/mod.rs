// ==========================================
// 镜片订单管理系统 - 引擎层
// ==========================================
// 职责: 订单生命周期与 SLA 智能的业务规则引擎
// 红线: 时间一律注入; 所有规则必须输出 reason
// ==========================================

pub mod calendar;
pub mod error;
pub mod lookup;
pub mod risk;
pub mod sequence;
pub mod sla;
pub mod timeline;
pub mod transition;

// 重导出核心引擎
pub use calendar::BusinessCalendar;
pub use error::{EngineError, EngineResult};
pub use lookup::{InMemoryOrderIndex, RegisteredOrderLookup};
pub use risk::{RiskAssessment, RiskEngine};
pub use sequence::SequenceEngine;
pub use sla::SlaEngine;
pub use timeline::{Timeline, TimelineEngine, TimelineStage};
pub use transition::TransitionEngine;
