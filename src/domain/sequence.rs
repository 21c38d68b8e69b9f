// ==========================================
// 镜片订单管理系统 - 序号台账实体
// ==========================================
// 职责: 门店物理单号的预期序列台账
// 红线: 台账只增不删, 是序列完整性的永久账本
// ==========================================

use crate::domain::types::{JustificationType, SequenceEntryStatus, SequenceOrigin};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 预期序号条目 (ExpectedSequenceEntry)
///
/// 每门店每物理单号一条。铺号时创建为 NOT_LOGGED,
/// 对账命中转 LOGGED, 人工说明转 JUSTIFIED, 永不删除。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedSequenceEntry {
    /// 所属门店 ID
    pub store_id: String,

    /// 物理单号
    pub number: i64,

    /// 预期出现时间 (铺号时刻)
    pub expected_at: DateTime<Utc>,

    /// 台账来源
    pub origin: SequenceOrigin,

    /// 条目状态
    pub status: SequenceEntryStatus,

    /// 说明类型 (仅 JUSTIFIED 后有值)
    pub justification_type: Option<JustificationType>,

    /// 说明文本
    pub justification_text: Option<String>,

    /// 处理人
    pub resolved_by: Option<String>,

    /// 处理时间
    pub resolved_at: Option<DateTime<Utc>>,

    /// 乐观锁修订号
    pub revision: i64,

    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

impl ExpectedSequenceEntry {
    /// 创建未登记条目
    pub fn not_logged(
        store_id: &str,
        number: i64,
        origin: SequenceOrigin,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            store_id: store_id.to_string(),
            number,
            expected_at: now,
            origin,
            status: SequenceEntryStatus::NotLogged,
            justification_type: None,
            justification_text: None,
            resolved_by: None,
            resolved_at: None,
            revision: 0,
            updated_at: now,
        }
    }

    /// 是否需要人工关注 (缺口尚未解决)
    pub fn needs_attention(&self) -> bool {
        matches!(
            self.status,
            SequenceEntryStatus::NotLogged | SequenceEntryStatus::PendingJustification
        )
    }

    /// 是否已解决 (命中或已说明)
    pub fn is_resolved(&self) -> bool {
        matches!(
            self.status,
            SequenceEntryStatus::Logged | SequenceEntryStatus::Justified
        )
    }
}

/// 序列完整性统计 (SequenceStats)
///
/// 按门店聚合的台账读模型。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceStats {
    /// 门店 ID
    pub store_id: String,
    /// 预期单号总数
    pub total_expected: i64,
    /// 已登记数
    pub total_logged: i64,
    /// 未登记数
    pub total_not_logged: i64,
    /// 已说明数
    pub total_justified: i64,
    /// 待处理数 (未登记 + 待说明)
    pub total_pending: i64,
    /// 登记率 (0-100)
    pub logged_percent: f64,
}
