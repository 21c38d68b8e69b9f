// ==========================================
// 镜片订单管理系统 - SLA 截止日计算引擎
// ==========================================
// 职责: 实验室内部截止日 + 客户承诺日期计算
// 输入: 订单 + 参照数据 (类别/实验室/门店/工艺)
// 输出: SlaProfile (含全部计算输入, 可解释)
// 红线: 参照数据缺失整体失败, 禁止静默兜底
// ==========================================

use crate::config::SlaPolicy;
use crate::domain::reference::{Lab, LensClass, ReferenceData, Store, Treatment};
use crate::domain::order::Order;
use crate::domain::sla::SlaProfile;
use crate::domain::types::Priority;
use crate::engine::calendar::BusinessCalendar;
use crate::engine::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use tracing::warn;

// ==========================================
// SlaEngine - SLA 计算引擎
// ==========================================
pub struct SlaEngine {
    policy: SlaPolicy,
}

impl SlaEngine {
    /// 构造函数 (默认策略)
    pub fn new() -> Self {
        Self {
            policy: SlaPolicy::default(),
        }
    }

    /// 指定策略构造
    pub fn with_policy(policy: SlaPolicy) -> Self {
        Self { policy }
    }

    /// 按订单计算 SLA 档案
    ///
    /// 从参照数据解析类别/实验室/门店/工艺, 任一缺失返回
    /// MissingReference, 不做部分计算。
    pub fn compute_for_order(
        &self,
        today: NaiveDate,
        order: &Order,
        refs: &ReferenceData,
    ) -> EngineResult<SlaProfile> {
        let lens_class =
            refs.lens_class(&order.lens_class_id)
                .ok_or_else(|| EngineError::MissingReference {
                    entity: "LensClass",
                    id: order.lens_class_id.clone(),
                })?;

        let lab = refs
            .lab(&order.lab_id)
            .ok_or_else(|| EngineError::MissingReference {
                entity: "Lab",
                id: order.lab_id.clone(),
            })?;

        let store = refs
            .store(&order.store_id)
            .ok_or_else(|| EngineError::MissingReference {
                entity: "Store",
                id: order.store_id.clone(),
            })?;

        let mut treatments = Vec::with_capacity(order.treatment_ids.len());
        for treatment_id in &order.treatment_ids {
            let treatment =
                refs.treatment(treatment_id)
                    .ok_or_else(|| EngineError::MissingReference {
                        entity: "Treatment",
                        id: treatment_id.clone(),
                    })?;
            treatments.push(treatment);
        }

        Ok(self.compute(
            today,
            lens_class,
            lab,
            store,
            &treatments,
            order.priority,
            order.manual_promised_date,
        ))
    }

    /// 核心计算 (参照数据已解析)
    ///
    /// # 算法
    /// 1. 基准天数: 实验室×类别覆写优先, 否则 max(实验室默认, 类别基准)
    /// 2. 累加工艺追加天数
    /// 3. 优先级修正, 下限保护 (优先级可压缩但不能消灭 SLA)
    /// 4. 实验室截止日 = 今天 + lab_days 个工作日
    /// 5. 承诺日期 = 今天 + (lab_days + 安全边际) 个工作日;
    ///    人工覆写时原样采用并做软预警校验
    pub fn compute(
        &self,
        today: NaiveDate,
        lens_class: &LensClass,
        lab: &Lab,
        store: &Store,
        treatments: &[&Treatment],
        priority: Priority,
        manual_promised_date: Option<NaiveDate>,
    ) -> SlaProfile {
        // 1. 基准天数
        let base_days = match lab.class_override(&lens_class.lens_class_id) {
            Some(days) => days,
            None => lab.default_sla_days.max(lens_class.base_sla_days),
        };

        // 2. 工艺追加
        let treatment_extra_days: i64 = treatments.iter().map(|t| t.extra_days).sum();

        // 3. 优先级修正 + 下限保护
        let priority_modifier_days = priority.sla_modifier_days();
        let lab_days = (base_days + treatment_extra_days + priority_modifier_days)
            .max(self.policy.min_lab_days);

        // 4. 实验室截止日 (按实验室日历)
        let calendar = BusinessCalendar::for_lab(lab);
        let lab_deadline = calendar.add_business_days(today, lab_days);

        // 5. 承诺日期
        let safety_margin_days = store.safety_margin_days.max(0);
        let recommended_promise_date =
            calendar.add_business_days(today, lab_days + safety_margin_days);

        let (customer_promise_date, manual_override) = match manual_promised_date {
            Some(manual) => (manual, true),
            None => (recommended_promise_date, false),
        };

        let promise_before_lab_deadline = manual_override && customer_promise_date < lab_deadline;
        if promise_before_lab_deadline {
            warn!(
                lens_class = %lens_class.lens_class_id,
                lab = %lab.lab_id,
                promise = %customer_promise_date,
                lab_deadline = %lab_deadline,
                "人工承诺日期早于实验室截止日, 存在延误风险"
            );
        }

        SlaProfile {
            base_days,
            treatment_extra_days,
            priority_modifier_days,
            lab_days,
            safety_margin_days,
            lab_deadline,
            recommended_promise_date,
            customer_promise_date,
            manual_override,
            promise_before_lab_deadline,
        }
    }
}

impl Default for SlaEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_class(base_days: i64) -> LensClass {
        LensClass {
            lens_class_id: "MULTIFOCAL".to_string(),
            name: "渐进多焦点".to_string(),
            base_sla_days: base_days,
        }
    }

    fn test_lab(default_days: i64, overrides: HashMap<String, i64>) -> Lab {
        Lab {
            lab_id: "LAB01".to_string(),
            name: "中心实验室".to_string(),
            default_sla_days: default_days,
            works_saturdays: false,
            class_sla_overrides: overrides,
        }
    }

    fn test_store(margin: i64) -> Store {
        Store {
            store_id: "S001".to_string(),
            name: "旗舰店".to_string(),
            safety_margin_days: margin,
            promise_alert_days: 3,
        }
    }

    fn test_treatment(id: &str, extra_days: i64) -> Treatment {
        Treatment {
            treatment_id: id.to_string(),
            name: id.to_string(),
            extra_days,
            extra_cost: 50.0,
        }
    }

    #[test]
    fn test_lab_override_wins_over_max_rule() {
        // 类别基准 5 天, 实验室覆写 4 天, 一项工艺 +2 天, HIGH -1 天
        // lab_days = 4 + 2 - 1 = 5
        let engine = SlaEngine::new();
        let class = test_class(5);
        let mut overrides = HashMap::new();
        overrides.insert("MULTIFOCAL".to_string(), 4);
        let lab = test_lab(3, overrides);
        let store = test_store(2);
        let treatment = test_treatment("AR_COATING", 2);

        let friday = date(2026, 3, 6);
        let profile = engine.compute(
            friday,
            &class,
            &lab,
            &store,
            &[&treatment],
            Priority::High,
            None,
        );

        assert_eq!(profile.base_days, 4);
        assert_eq!(profile.lab_days, 5);
        // 周五 + 5 工作日 = 下周五
        assert_eq!(profile.lab_deadline, date(2026, 3, 13));
    }

    #[test]
    fn test_no_override_takes_max_of_lab_and_class() {
        let engine = SlaEngine::new();
        let class = test_class(5);
        let lab = test_lab(3, HashMap::new());
        let store = test_store(2);

        let profile = engine.compute(
            date(2026, 3, 2),
            &class,
            &lab,
            &store,
            &[],
            Priority::Normal,
            None,
        );
        assert_eq!(profile.base_days, 5); // max(3, 5)
    }

    #[test]
    fn test_urgent_never_below_floor() {
        let engine = SlaEngine::new();
        let class = test_class(2);
        let lab = test_lab(1, HashMap::new());
        let store = test_store(2);

        let profile = engine.compute(
            date(2026, 3, 2),
            &class,
            &lab,
            &store,
            &[],
            Priority::Urgent,
            None,
        );
        // 2 - 3 = -1 → 下限 1
        assert_eq!(profile.lab_days, 1);
    }

    #[test]
    fn test_urgent_not_slower_than_normal() {
        let engine = SlaEngine::new();
        let class = test_class(5);
        let lab = test_lab(3, HashMap::new());
        let store = test_store(2);
        let today = date(2026, 3, 2);

        let normal = engine.compute(today, &class, &lab, &store, &[], Priority::Normal, None);
        let urgent = engine.compute(today, &class, &lab, &store, &[], Priority::Urgent, None);

        assert!(urgent.lab_days <= normal.lab_days);
        assert!(urgent.lab_days >= 1);
    }

    #[test]
    fn test_promise_never_before_lab_deadline_without_override() {
        let engine = SlaEngine::new();
        let class = test_class(5);
        let lab = test_lab(3, HashMap::new());
        let store = test_store(2);

        let profile = engine.compute(
            date(2026, 3, 2),
            &class,
            &lab,
            &store,
            &[],
            Priority::Normal,
            None,
        );

        assert!(profile.lab_deadline <= profile.customer_promise_date);
        assert!(!profile.manual_override);
        assert!(!profile.promise_before_lab_deadline);
    }

    #[test]
    fn test_manual_override_used_verbatim_with_soft_warning() {
        let engine = SlaEngine::new();
        let class = test_class(5);
        let lab = test_lab(3, HashMap::new());
        let store = test_store(2);

        let manual = date(2026, 3, 4); // 早于实验室截止日
        let profile = engine.compute(
            date(2026, 3, 2),
            &class,
            &lab,
            &store,
            &[],
            Priority::Normal,
            Some(manual),
        );

        assert!(profile.manual_override);
        assert_eq!(profile.customer_promise_date, manual);
        assert!(profile.promise_before_lab_deadline);
    }

    #[test]
    fn test_missing_reference_fails_whole_computation() {
        let engine = SlaEngine::new();
        let refs = ReferenceData::new(); // 空参照数据

        let order = Order::new(
            "S001",
            "LAB01",
            "MULTIFOCAL",
            1001,
            date(2026, 3, 2),
            chrono::Utc::now(),
        );

        let result = engine.compute_for_order(date(2026, 3, 2), &order, &refs);
        assert!(matches!(
            result,
            Err(EngineError::MissingReference { entity: "LensClass", .. })
        ));
    }

    #[test]
    fn test_missing_treatment_fails() {
        let engine = SlaEngine::new();
        let mut refs = ReferenceData::new();
        refs.add_lens_class(test_class(5));
        refs.add_lab(test_lab(3, HashMap::new()));
        refs.add_store(test_store(2));

        let mut order = Order::new(
            "S001",
            "LAB01",
            "MULTIFOCAL",
            1001,
            date(2026, 3, 2),
            chrono::Utc::now(),
        );
        order.treatment_ids.push("UNKNOWN_COATING".to_string());

        let result = engine.compute_for_order(date(2026, 3, 2), &order, &refs);
        assert!(matches!(
            result,
            Err(EngineError::MissingReference { entity: "Treatment", .. })
        ));
    }

    #[test]
    fn test_saturday_lab_shortens_calendar_span() {
        let engine = SlaEngine::new();
        let class = test_class(5);
        let mut lab = test_lab(5, HashMap::new());
        let store = test_store(0);
        let friday = date(2026, 3, 6);

        let weekends_off = engine.compute(friday, &class, &lab, &store, &[], Priority::Normal, None);

        lab.works_saturdays = true;
        let with_saturdays =
            engine.compute(friday, &class, &lab, &store, &[], Priority::Normal, None);

        assert!(with_saturdays.lab_deadline < weekends_off.lab_deadline);
    }
}
