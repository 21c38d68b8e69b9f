// ==========================================
// 镜片订单管理系统 - 工作日日历
// ==========================================
// 职责: 工作日推算 (跳过非工作日)
// 规则: 周日固定休息; 周六按实验室配置; 不含法定节假日
// 红线: 纯函数, 给定 (起始日, 天数) 结果确定
// ==========================================

use crate::domain::reference::Lab;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// 工作日日历 (BusinessCalendar)
///
/// 每个实验室一份日历, 唯一的配置维度是周六是否生产。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    works_saturdays: bool,
}

impl BusinessCalendar {
    /// 标准日历: 周六周日休息
    pub fn weekends_off() -> Self {
        Self {
            works_saturdays: false,
        }
    }

    /// 周六生产的日历
    pub fn with_saturdays() -> Self {
        Self {
            works_saturdays: true,
        }
    }

    /// 按实验室配置构造
    pub fn for_lab(lab: &Lab) -> Self {
        Self {
            works_saturdays: lab.works_saturdays,
        }
    }

    /// 是否工作日
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        match date.weekday() {
            Weekday::Sun => false,
            Weekday::Sat => self.works_saturdays,
            _ => true,
        }
    }

    /// 从起始日推进 n 个工作日
    ///
    /// 逐日前进, 只有落在工作日才计数; n <= 0 时返回起始日。
    pub fn add_business_days(&self, start: NaiveDate, n: i64) -> NaiveDate {
        let mut date = start;
        let mut added = 0;

        while added < n {
            date += Duration::days(1);
            if self.is_business_day(date) {
                added += 1;
            }
        }

        date
    }

    /// 统计 [start, end) 区间内的工作日数
    ///
    /// end <= start 时返回 0。
    pub fn count_business_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let mut count = 0;
        let mut current = start;

        while current < end {
            if self.is_business_day(current) {
                count += 1;
            }
            current += Duration::days(1);
        }

        count
    }

    /// 距截止日剩余工作日数 (截止日不晚于今天时为 0)
    pub fn remaining_business_days(&self, today: NaiveDate, deadline: NaiveDate) -> i64 {
        if deadline <= today {
            return 0;
        }
        self.count_business_days(today, deadline)
    }
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self::weekends_off()
    }
}
