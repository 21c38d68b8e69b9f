// ==========================================
// 镜片订单管理系统 - 基础参照数据
// ==========================================
// 职责: 门店 / 实验室 / 镜片类别 / 处理工艺 主数据
// 说明: 持久化由外部协作方负责, 引擎只消费明文结构
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 门店 (Store)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// 门店 ID
    pub store_id: String,
    /// 门店名称
    pub name: String,
    /// 安全边际 (工作日): 在实验室 SLA 之上追加后才承诺客户
    pub safety_margin_days: i64,
    /// 承诺日期预警窗口 (工作日)
    pub promise_alert_days: i64,
}

/// 实验室 (Lab)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    /// 实验室 ID
    pub lab_id: String,
    /// 实验室名称
    pub name: String,
    /// 默认 SLA 天数 (类别无覆写时与类别基准取较大值)
    pub default_sla_days: i64,
    /// 周六是否生产
    pub works_saturdays: bool,
    /// 类别级 SLA 覆写 (lens_class_id -> 天数), 存在时优先
    pub class_sla_overrides: HashMap<String, i64>,
}

impl Lab {
    /// 查询类别级 SLA 覆写
    pub fn class_override(&self, lens_class_id: &str) -> Option<i64> {
        self.class_sla_overrides.get(lens_class_id).copied()
    }
}

/// 镜片类别 (Lens Class)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensClass {
    /// 类别 ID
    pub lens_class_id: String,
    /// 类别名称
    pub name: String,
    /// 基准 SLA 天数
    pub base_sla_days: i64,
}

/// 处理工艺 (Treatment)
///
/// 镀膜 / 染色 / 防蓝光等, 每项追加生产天数与费用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    /// 工艺 ID
    pub treatment_id: String,
    /// 工艺名称
    pub name: String,
    /// 追加天数
    pub extra_days: i64,
    /// 追加费用
    pub extra_cost: f64,
}

/// 参照数据集合 (ReferenceData)
///
/// 聚合 SLA 计算所需的全部主数据, 简化引擎入参。
/// 查询返回 Option, 缺失由引擎层转换为 MissingReference 错误。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceData {
    /// 门店主数据
    pub stores: HashMap<String, Store>,
    /// 实验室主数据
    pub labs: HashMap<String, Lab>,
    /// 镜片类别主数据
    pub lens_classes: HashMap<String, LensClass>,
    /// 处理工艺主数据
    pub treatments: HashMap<String, Treatment>,
}

impl ReferenceData {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册门店
    pub fn add_store(&mut self, store: Store) {
        self.stores.insert(store.store_id.clone(), store);
    }

    /// 注册实验室
    pub fn add_lab(&mut self, lab: Lab) {
        self.labs.insert(lab.lab_id.clone(), lab);
    }

    /// 注册镜片类别
    pub fn add_lens_class(&mut self, class: LensClass) {
        self.lens_classes.insert(class.lens_class_id.clone(), class);
    }

    /// 注册处理工艺
    pub fn add_treatment(&mut self, treatment: Treatment) {
        self.treatments.insert(treatment.treatment_id.clone(), treatment);
    }

    /// 查询门店
    pub fn store(&self, store_id: &str) -> Option<&Store> {
        self.stores.get(store_id)
    }

    /// 查询实验室
    pub fn lab(&self, lab_id: &str) -> Option<&Lab> {
        self.labs.get(lab_id)
    }

    /// 查询镜片类别
    pub fn lens_class(&self, lens_class_id: &str) -> Option<&LensClass> {
        self.lens_classes.get(lens_class_id)
    }

    /// 查询处理工艺
    pub fn treatment(&self, treatment_id: &str) -> Option<&Treatment> {
        self.treatments.get(treatment_id)
    }
}
