//! Chinese calendar
//!
//! Note: 為方便處理諸多術語，本模塊文檔用中文。
//!
//! 本程序以天文算法即時推算朔及節氣時刻（見 [`astro`]），再依現行規則編排夏曆。
//! 對外以 [`LunarCalendarResolver`] 及 [`SolarTermResolver`] 兩特質提供，
//! 可換用其他實現（如權威曆表）而不影響其餘部分。

use std::fmt::{self as std_fmt, Display, Formatter};

use serde::Serialize;
use tracing::trace;

use crate::date::Date;
use crate::time_scales::{Tt, Ut};

pub mod astro;
pub mod fmt;
mod resolver;

pub use resolver::{ApproximateCalendar, LunarCalendarResolver, SolarTermResolver};

/// 北京時間（UTC+8）相對 UTC 的分鐘數，現行夏曆以此定日。
pub const BEIJING_OFFSET_MINUTES: i32 = 480;

/// 月名，`Common` 為平月，`Leap` 為閏月。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub enum Month {
    Common(u32),
    Leap(u32),
}
impl Month {
    /// 取得月序號，無論平閏。
    pub fn num(&self) -> u32 {
        use Month::*;
        *match self {
            Common(v) | Leap(v) => v,
        }
    }
    /// 閏月為 `true`，平月為 `false`
    pub fn is_leap(&self) -> bool {
        matches!(self, Self::Leap(_))
    }
    /// 取得月名的文本形式，十一、十二月稱「冬月」「臘月」。
    pub fn name(&self) -> String {
        fmt::month(*self)
    }
}

/// 夏曆日期。`year` 為該日所在農曆年對應的公元年（正月起算）。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub is_leap_month: bool,
}

impl LunarDate {
    pub fn new(year: i32, month: Month, day: u32) -> Self {
        Self {
            year,
            month: month.num(),
            day,
            is_leap_month: month.is_leap(),
        }
    }
    pub fn month(&self) -> Month {
        if self.is_leap_month {
            Month::Leap(self.month)
        } else {
            Month::Common(self.month)
        }
    }
}

/// 形如「1999年冬月廿五」。
impl Display for LunarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std_fmt::Result {
        write!(
            f,
            "{}年{}{}",
            self.year,
            fmt::month(self.month()),
            fmt::day(self.day)
        )
    }
}

/// 二十四節氣，序號 `0..=23` 依次為立春到大寒。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
pub enum SolarTerm {
    StartOfSpring,
    RainWater,
    AwakeningOfInsects,
    SpringEquinox,
    PureBrightness,
    GrainRain,
    StartOfSummer,
    GrainFull,
    GrainInEar,
    SummerSolstice,
    MinorHeat,
    MajorHeat,
    StartOfAutumn,
    EndOfHeat,
    WhiteDew,
    AutumnEquinox,
    ColdDew,
    FrostDescent,
    StartOfWinter,
    MinorSnow,
    MajorSnow,
    WinterSolstice,
    MinorCold,
    MajorCold,
}

impl SolarTerm {
    pub const ALL: [SolarTerm; 24] = {
        use SolarTerm::*;
        [
            StartOfSpring,
            RainWater,
            AwakeningOfInsects,
            SpringEquinox,
            PureBrightness,
            GrainRain,
            StartOfSummer,
            GrainFull,
            GrainInEar,
            SummerSolstice,
            MinorHeat,
            MajorHeat,
            StartOfAutumn,
            EndOfHeat,
            WhiteDew,
            AutumnEquinox,
            ColdDew,
            FrostDescent,
            StartOfWinter,
            MinorSnow,
            MajorSnow,
            WinterSolstice,
            MinorCold,
            MajorCold,
        ]
    };

    /// 序號對 24 取餘後對應的節氣。
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 24]
    }
    pub fn index(&self) -> usize {
        *self as usize
    }
    /// 節氣名，如「立春」。
    pub fn name(&self) -> &'static str {
        fmt::SOLAR_TERM_NAMES[self.index()]
    }
    /// 交節時太陽視黃經（度），立春為 315°。
    pub fn longitude(&self) -> f64 {
        astro::normalize_360(315.0 + 15.0 * self.index() as f64)
    }
    /// 是否為中氣（春分、冬至等黃經為 30° 倍數者）。
    pub fn is_principal(&self) -> bool {
        self.index() % 2 == 1
    }
    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

impl Display for SolarTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std_fmt::Result {
        f.write_str(self.name())
    }
}

/// 某日所在節氣。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
pub struct SolarTermPeriod {
    pub term: SolarTerm,
    /// 交節所在日期，若實現無從得知則為 `None`。
    pub began_on: Option<Date>,
}

impl SolarTermPeriod {
    pub fn name(&self) -> &'static str {
        self.term.name()
    }
    pub fn index(&self) -> usize {
        self.term.index()
    }
}

/// 「歲」，相鄰兩冬至間的時段，或自冬至所在月（十一月）至下一冬至前月（十月或閏十月）的時段。
///
/// 注意：「歲」與「年」在曆法上不同，年以正月為首，但曆法編算須以兩冬至間的「歲」為基礎，本程序亦以「歲」編排，並依日期計算所在「年」。
///
/// # 用例
///
/// ```
/// use sajutempo::Date;
/// use sajutempo::chinese::{Annus, BEIJING_OFFSET_MINUTES, Month::*};
///
/// let date = Date::from_gregorian(2000, 1, 1).unwrap();
/// let annus = Annus::from_date(date, BEIJING_OFFSET_MINUTES);
///
/// assert_eq!(Ok((1999, Common(11), 25)), annus.ymd_for(date));
/// ```
#[derive(Debug, Clone)]
pub struct Annus {
    /// 序號，為該歲大部分時段所在的公元年
    pub annus: i32,
    /// 定日所用時區，為東於 UTC 的分鐘數
    pub tz_offset_minutes: i32,
    /// 從冬至開始的各節氣交節日期，亦含次歲冬至以便計算末日
    pub solar_terms: [Date; 25],
    /// 全部月首，包括次一歲首月用以標記本歲最末日
    pub months: Vec<NewMoon>,
}
/// 月首信息
#[derive(Debug, Copy, Clone)]
pub struct NewMoon {
    /// 月名
    pub month: Month,
    /// 月首所在日期
    pub date: Date,
}

impl Annus {
    /// 推算與公元 `annus` 年對應的歲，日期依東於 UTC `tz_offset_minutes` 分鐘的時區判定。
    ///
    /// # 用例
    ///
    /// ```
    /// use sajutempo::chinese::{Annus, BEIJING_OFFSET_MINUTES, Month};
    ///
    /// let annus = Annus::new(2017, BEIJING_OFFSET_MINUTES);
    /// assert_eq!(14, annus.months.len());
    /// assert_eq!(Month::Leap(6), annus.months[8].month);
    /// ```
    pub fn new(annus: i32, tz_offset_minutes: i32) -> Self {
        use Month::*;

        let local = |tt: Tt| Ut::from_tt(tt).date_in_timezone(tz_offset_minutes);

        // 前一年 12 月 21 日前後
        let mut guess = Tt(2451545.0 + (annus - 2001) as f64 * 365.2422 + 354.0);
        let mut instants = [Tt(0.0); 25];
        for (i, slot) in instants.iter_mut().enumerate() {
            *slot = astro::solar_longitude_crossing(270.0 + 15.0 * i as f64, guess);
            guess = Tt(slot.0 + 15.0 * astro::DAYS_PER_DEGREE);
        }
        let solar_terms = instants.map(local);
        let ws = solar_terms[0];
        let ws_next = solar_terms[24];

        let mut k = astro::mean_lunation_before(instants[0]) - 1;
        let mut new_moon_dates = Vec::with_capacity(16);
        loop {
            let date = local(astro::new_moon(k));
            new_moon_dates.push(date);
            if date > ws_next {
                break;
            }
            k += 1;
        }

        let m11_idx = new_moon_dates.partition_point(|date| date <= &ws) - 1;
        let m11n_idx = new_moon_dates.partition_point(|date| date <= &ws_next) - 1;
        let mut needs_leap = m11n_idx - m11_idx > 12;

        let mut months = Vec::with_capacity(m11n_idx - m11_idx + 1);
        let mut month = 10;
        let mut term = 0;
        for i in m11_idx..=m11n_idx {
            // 下月首不晚於本月應有的中氣，即本月無中氣
            if needs_leap && new_moon_dates[i + 1] <= solar_terms[term] {
                months.push(NewMoon {
                    month: Leap(month),
                    date: new_moon_dates[i],
                });
                needs_leap = false;
                continue;
            }
            month = month % 12 + 1;
            months.push(NewMoon {
                month: Common(month),
                date: new_moon_dates[i],
            });
            term += 2;
        }
        trace!(annus, months = months.len(), "computed annus");

        Annus {
            annus,
            tz_offset_minutes,
            solar_terms,
            months,
        }
    }
    /// 依特定日期取得其所在歲。
    ///
    /// # 用例
    ///
    /// ```
    /// use sajutempo::Date;
    /// use sajutempo::chinese::{Annus, BEIJING_OFFSET_MINUTES};
    ///
    /// let date = Date::from_gregorian(1999, 12, 31).unwrap();
    /// let annus = Annus::from_date(date, BEIJING_OFFSET_MINUTES);
    ///
    /// assert_eq!(2000, annus.annus);
    /// ```
    pub fn from_date(date: Date, tz_offset_minutes: i32) -> Self {
        Self::locate(date, tz_offset_minutes).0
    }

    fn locate(date: Date, tz_offset_minutes: i32) -> (Self, (i32, Month, u32)) {
        let mut annus = Self::new(date.gregorian().0, tz_offset_minutes);
        loop {
            let y = match annus.ymd_for(date) {
                Ok(ymd) => return (annus, ymd),
                Err(OtherAnnus::Before) => annus.annus - 1,
                Err(OtherAnnus::After) => annus.annus + 1,
            };
            annus = Self::new(y, tz_offset_minutes);
        }
    }

    /// 本歲首日，即冬至所在月首。
    pub fn begin(&self) -> Date {
        self.months[0].date
    }
    /// 次歲首日。
    pub fn end(&self) -> Date {
        self.months[self.months.len() - 1].date
    }

    /// 取得給定日期在該歲的年月日，返回格式為 `(年, 月, 日)`。
    ///
    /// 若所給日期不在該歲，則回報 `Err` 並指出該日期在該歲之前還是之後。
    pub fn ymd_for(&self, date: Date) -> Result<(i32, Month, u32), OtherAnnus> {
        if date < self.begin() {
            return Err(OtherAnnus::Before);
        } else if date >= self.end() {
            return Err(OtherAnnus::After);
        }

        let idx = self.months.partition_point(|m| m.date <= date) - 1;
        let m = self.months[idx];
        let d = (date - m.date + 1) as u32;
        let y = if m.month.num() >= 11 {
            self.annus - 1
        } else {
            self.annus
        };
        Ok((y, m.month, d))
    }
}

/// 表示給定日期不在該歲，並指出其在前還是在後。
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OtherAnnus {
    Before,
    After,
}

/// 以天文推算編排的夏曆。
///
/// 默認以北京時間定日，即現行中國農曆；[`with_timezone`](Self::with_timezone)
/// 可改用他區時間（如 UTC+9 的韓國、日本曆法）。
///
/// # 用例
///
/// ```
/// use sajutempo::Date;
/// use sajutempo::chinese::{ChineseCalendar, SolarTerm};
///
/// let calendar = ChineseCalendar::new();
/// let date = Date::from_gregorian(2024, 2, 10).unwrap();
/// assert_eq!("2024年正月初一", calendar.lunar_date(date).to_string());
/// assert_eq!(SolarTerm::StartOfSpring, calendar.solar_term_on(date).term);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ChineseCalendar {
    tz_offset_minutes: i32,
}

impl ChineseCalendar {
    pub fn new() -> Self {
        Self::with_timezone(BEIJING_OFFSET_MINUTES)
    }
    pub fn with_timezone(tz_offset_minutes: i32) -> Self {
        Self { tz_offset_minutes }
    }
    pub fn tz_offset_minutes(&self) -> i32 {
        self.tz_offset_minutes
    }

    pub fn lunar_date(&self, date: Date) -> LunarDate {
        let (_, (y, m, d)) = Annus::locate(date, self.tz_offset_minutes);
        LunarDate::new(y, m, d)
    }

    /// 取得當日所在節氣：當日結束前最後一次交節者。
    pub fn solar_term_on(&self, date: Date) -> SolarTermPeriod {
        let end = Tt::from_ut(Ut::end_of_day(date, self.tz_offset_minutes));
        let lon = astro::apparent_solar_longitude(end);
        let term = SolarTerm::from_index((astro::normalize_360(lon - 315.0) / 15.0) as usize);
        let since = astro::normalize_360(lon - term.longitude());
        let start = astro::solar_longitude_crossing(
            term.longitude(),
            Tt(end.0 - since * astro::DAYS_PER_DEGREE),
        );
        let began_on = Ut::from_tt(start)
            .date_in_timezone(self.tz_offset_minutes)
            .min(date);
        SolarTermPeriod {
            term,
            began_on: Some(began_on),
        }
    }
}

impl Default for ChineseCalendar {
    fn default() -> Self {
        Self::new()
    }
}
