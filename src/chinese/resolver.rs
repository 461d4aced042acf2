use std::fmt::Debug;

use tracing::debug;

use super::{ChineseCalendar, LunarDate, SolarTerm, SolarTermPeriod};
use crate::date::Date;

/// 由公曆日期求夏曆日期。
pub trait LunarCalendarResolver: Send + Sync + Debug {
    fn to_lunar_date(&self, date: Date) -> LunarDate;
}

/// 由公曆日期求所在節氣。
pub trait SolarTermResolver: Send + Sync + Debug {
    fn solar_term_period(&self, date: Date) -> SolarTermPeriod;
}

impl LunarCalendarResolver for ChineseCalendar {
    fn to_lunar_date(&self, date: Date) -> LunarDate {
        let lunar = self.lunar_date(date);
        debug!(%date, %lunar, "resolved lunar date");
        lunar
    }
}

impl SolarTermResolver for ChineseCalendar {
    fn solar_term_period(&self, date: Date) -> SolarTermPeriod {
        let period = self.solar_term_on(date);
        debug!(%date, term = period.name(), "resolved solar term");
        period
    }
}

/// 不作推算的佔位實現，供測試或無須曆法信息時使用。
///
/// 夏曆日期照抄公曆年月日；節氣按月份粗略對應（二月為立春、三月為驚蟄……），
/// 不給交節日期。
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ApproximateCalendar;

impl LunarCalendarResolver for ApproximateCalendar {
    fn to_lunar_date(&self, date: Date) -> LunarDate {
        let (year, month, day) = date.gregorian();
        LunarDate {
            year,
            month,
            day,
            is_leap_month: false,
        }
    }
}

impl SolarTermResolver for ApproximateCalendar {
    fn solar_term_period(&self, date: Date) -> SolarTermPeriod {
        let (_, month, _) = date.gregorian();
        SolarTermPeriod {
            term: SolarTerm::from_index((month as usize + 10) % 12 * 2),
            began_on: None,
        }
    }
}
