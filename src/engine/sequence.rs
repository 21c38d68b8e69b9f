// ==========================================
// 镜片订单管理系统 - 序号对账引擎
// ==========================================
// 职责: 门店物理单号的铺号 / 对账 / 缺口说明工作流
// 红线: 台账只增不删; 对账单向 (LOGGED 不回退)
// 红线: justify 按修订号 CAS, 防止两人同时说明同一缺口
// ==========================================

use crate::domain::sequence::{ExpectedSequenceEntry, SequenceStats};
use crate::domain::types::{JustificationType, SequenceEntryStatus, SequenceOrigin};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::lookup::RegisteredOrderLookup;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, info};

// ==========================================
// SequenceEngine - 序号对账引擎
// ==========================================
pub struct SequenceEngine {
    // 无状态引擎, 台账集合由调用方持有
}

impl SequenceEngine {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 铺号: 声明门店的预期单号区间
    ///
    /// 为 [range_start, range_end] 内每个整数创建一条 NOT_LOGGED
    /// 条目; 已存在的单号跳过 (重复铺号幂等)。
    ///
    /// # 错误
    /// - `InvalidRange`: range_start > range_end 或下界非正数
    pub fn populate(
        &self,
        store_id: &str,
        range_start: i64,
        range_end: i64,
        origin: SequenceOrigin,
        now: DateTime<Utc>,
        existing_numbers: &HashSet<i64>,
    ) -> EngineResult<Vec<ExpectedSequenceEntry>> {
        if range_start > range_end || range_start <= 0 {
            return Err(EngineError::InvalidRange {
                start: range_start,
                end: range_end,
            });
        }

        let mut created = Vec::new();
        for number in range_start..=range_end {
            if existing_numbers.contains(&number) {
                continue;
            }
            created.push(ExpectedSequenceEntry::not_logged(
                store_id, number, origin, now,
            ));
        }

        info!(
            store_id = %store_id,
            range_start,
            range_end,
            created = created.len(),
            "铺号完成"
        );

        Ok(created)
    }

    /// 对账: 批量核销已登记的单号
    ///
    /// 对每条 NOT_LOGGED 条目查询订单索引, 命中则转 LOGGED。
    /// 幂等: 已 LOGGED / JUSTIFIED 的条目不再触碰, 重复执行无副作用。
    ///
    /// # 返回
    /// 本次核销的条目数
    pub fn reconcile(
        &self,
        entries: &mut [ExpectedSequenceEntry],
        lookup: &dyn RegisteredOrderLookup,
        now: DateTime<Utc>,
    ) -> usize {
        let mut matched = 0;

        for entry in entries.iter_mut() {
            if entry.status != SequenceEntryStatus::NotLogged
                && entry.status != SequenceEntryStatus::PendingJustification
            {
                continue;
            }

            if lookup.order_exists(&entry.store_id, entry.number) {
                entry.status = SequenceEntryStatus::Logged;
                entry.revision += 1;
                entry.updated_at = now;
                matched += 1;
                debug!(store_id = %entry.store_id, number = entry.number, "对账命中");
            }
        }

        info!(matched, "对账批次完成");
        matched
    }

    /// 人工说明缺口
    ///
    /// 仅 NOT_LOGGED / PENDING_JUSTIFICATION 条目合法; 转 JUSTIFIED
    /// 并盖章处理人/处理时间。按修订号 CAS, 输掉竞争的调用方
    /// 收到 StaleState 而不是二次说明。
    ///
    /// # 错误
    /// - `AlreadyResolved`: 条目已 LOGGED 或已 JUSTIFIED
    /// - `StaleState`: 修订号不匹配 (并发说明竞争)
    pub fn justify(
        &self,
        entry: &mut ExpectedSequenceEntry,
        expected_revision: i64,
        justification_type: JustificationType,
        justification_text: &str,
        actor_id: &str,
        now: DateTime<Utc>,
    ) -> EngineResult<()> {
        if entry.revision != expected_revision {
            return Err(EngineError::StaleState {
                entity: "ExpectedSequenceEntry",
                id: format!("{}#{}", entry.store_id, entry.number),
                expected: expected_revision.to_string(),
                actual: entry.revision.to_string(),
            });
        }

        if !entry.status.can_justify() {
            return Err(EngineError::AlreadyResolved {
                store_id: entry.store_id.clone(),
                number: entry.number,
                status: entry.status,
            });
        }

        entry.status = SequenceEntryStatus::Justified;
        entry.justification_type = Some(justification_type);
        entry.justification_text = Some(justification_text.to_string());
        entry.resolved_by = Some(actor_id.to_string());
        entry.resolved_at = Some(now);
        entry.revision += 1;
        entry.updated_at = now;

        info!(
            store_id = %entry.store_id,
            number = entry.number,
            justification = %justification_type,
            actor = %actor_id,
            "缺口已说明"
        );

        Ok(())
    }

    /// 待处理缺口列表
    ///
    /// NOT_LOGGED 条目按单号升序, 支撑"逐个处理"的
    /// 稳定上一条/下一条/跳过导航。
    pub fn list_pending<'a>(
        &self,
        entries: &'a [ExpectedSequenceEntry],
        store_id: Option<&str>,
    ) -> Vec<&'a ExpectedSequenceEntry> {
        let mut pending: Vec<&ExpectedSequenceEntry> = entries
            .iter()
            .filter(|e| e.status == SequenceEntryStatus::NotLogged)
            .filter(|e| store_id.map(|s| e.store_id == s).unwrap_or(true))
            .collect();

        pending.sort_by_key(|e| (e.store_id.clone(), e.number));
        pending
    }

    /// 门店序列完整性统计
    pub fn stats(&self, entries: &[ExpectedSequenceEntry], store_id: &str) -> SequenceStats {
        let mut total_expected = 0;
        let mut total_logged = 0;
        let mut total_not_logged = 0;
        let mut total_justified = 0;
        let mut total_pending = 0;

        for entry in entries.iter().filter(|e| e.store_id == store_id) {
            total_expected += 1;
            match entry.status {
                SequenceEntryStatus::Logged => total_logged += 1,
                SequenceEntryStatus::NotLogged => {
                    total_not_logged += 1;
                    total_pending += 1;
                }
                SequenceEntryStatus::PendingJustification => total_pending += 1,
                SequenceEntryStatus::Justified => total_justified += 1,
            }
        }

        let logged_percent = if total_expected > 0 {
            total_logged as f64 / total_expected as f64 * 100.0
        } else {
            0.0
        };

        SequenceStats {
            store_id: store_id.to_string(),
            total_expected,
            total_logged,
            total_not_logged,
            total_justified,
            total_pending,
            logged_percent,
        }
    }
}

impl Default for SequenceEngine {
    fn default() -> Self {
        Self::new()
    }
}
