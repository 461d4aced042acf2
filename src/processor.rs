//! The single entry point: date, hour and birthplace in, normalized record
//! out.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::adjustment::LocalTimeAdjustmentCalculator;
use crate::chinese::{
    ChineseCalendar, LunarCalendarResolver, LunarDate, SolarTermPeriod, SolarTermResolver,
};
use crate::civil::CivilDateTime;
use crate::date::Date;
use crate::dst;
use crate::error::{Error, Result};
use crate::geo::{CoordinateRegistry, GeoCoordinate};
use crate::options::{OptionsUpdate, ProcessingOptions};

/// Where a person was born, either by registered name or by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Birthplace {
    Name(String),
    Coordinate(GeoCoordinate),
}

impl From<&str> for Birthplace {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for Birthplace {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<GeoCoordinate> for Birthplace {
    fn from(coordinate: GeoCoordinate) -> Self {
        Self::Coordinate(coordinate)
    }
}

/// How the birthplace of a request was resolved.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BirthplaceResolution {
    NotGiven,
    /// Name found in the registry.
    Found(String),
    /// Coordinate passed directly.
    Explicit,
    /// Name not in the registry; no correction was applied.
    NotFound(String),
}

/// Result of one [`DateTimeProcessor::process`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedDateTime {
    pub original_date: Date,
    /// Wall-clock time as given.
    pub civil: CivilDateTime,
    /// Wall-clock time after the local time adjustment.
    pub adjusted_civil: CivilDateTime,
    pub local_time_adjustment_minutes: i32,
    pub coordinates: Option<GeoCoordinate>,
    pub birthplace: BirthplaceResolution,
    pub summer_time_applied: bool,
    /// Lunar date of the adjusted day.
    pub lunar_date: LunarDate,
    /// Solar term of the adjusted day.
    pub solar_term_period: SolarTermPeriod,
}

/// Turns a birth date and clock time into true local time plus its
/// calendrical context.
///
/// The processor is `Send + Sync`; share it behind an [`Arc`] and call
/// [`process`](Self::process) from any number of threads. Options can be
/// changed at any time and affect only later calls.
///
/// # Example
///
/// ```
/// use sajutempo::{Date, DateTimeProcessor, ProcessingOptions};
///
/// let processor = DateTimeProcessor::new(ProcessingOptions::default());
/// let date = Date::from_gregorian(1991, 3, 15).unwrap();
/// let result = processor.process(date, 10.5, Some("東京".into())).unwrap();
///
/// assert_eq!(18, result.local_time_adjustment_minutes);
/// assert_eq!("1991-03-15T10:48", result.adjusted_civil.to_string());
/// assert_eq!((1991, 1, 29), (result.lunar_date.year, result.lunar_date.month, result.lunar_date.day));
/// ```
#[derive(Debug)]
pub struct DateTimeProcessor {
    registry: Arc<CoordinateRegistry>,
    calculator: LocalTimeAdjustmentCalculator,
    lunar: Arc<dyn LunarCalendarResolver>,
    solar_terms: Arc<dyn SolarTermResolver>,
    options: RwLock<ProcessingOptions>,
}

impl DateTimeProcessor {
    /// A processor with the seeded registry, default bands and the
    /// astronomical calendar.
    pub fn new(options: ProcessingOptions) -> Self {
        Self::builder().options(options).build()
    }

    pub fn builder() -> DateTimeProcessorBuilder {
        DateTimeProcessorBuilder::default()
    }

    pub fn registry(&self) -> &Arc<CoordinateRegistry> {
        &self.registry
    }

    pub fn calculator(&self) -> &LocalTimeAdjustmentCalculator {
        &self.calculator
    }

    pub fn options(&self) -> ProcessingOptions {
        *self.options.read()
    }

    /// Replaces the fields set in `update` and returns the resulting options.
    ///
    /// # Example
    ///
    /// ```
    /// use sajutempo::{DateTimeProcessor, OptionsUpdate, ProcessingOptions};
    ///
    /// let processor = DateTimeProcessor::new(ProcessingOptions::default());
    /// let options = processor.update_options(OptionsUpdate {
    ///     use_dst: Some(true),
    ///     ..Default::default()
    /// });
    /// assert!(options.use_local_time && options.use_dst);
    /// ```
    pub fn update_options(&self, update: OptionsUpdate) -> ProcessingOptions {
        let mut guard = self.options.write();
        let merged = guard.merged(update);
        *guard = merged;
        info!(?merged, "updated processing options");
        merged
    }

    /// Normalizes `date` at `hour_with_minutes` (e.g. `10.5` for 10:30) for
    /// the given birthplace.
    ///
    /// The hour must lie in `[0, 24)`, and a coordinate birthplace must be a
    /// valid position. A name missing from the registry is not an error; it
    /// is reported as [`BirthplaceResolution::NotFound`] with no correction.
    /// An adjusted time that falls before the first day [`Date`] can hold
    /// is rejected with [`Error::DateOutOfRange`].
    pub fn process(
        &self,
        date: Date,
        hour_with_minutes: f64,
        birthplace: Option<Birthplace>,
    ) -> Result<ProcessedDateTime> {
        if !(0.0..24.0).contains(&hour_with_minutes) {
            return Err(Error::HourOutOfRange(hour_with_minutes));
        }
        let (birthplace, coordinates) = match birthplace {
            None => (BirthplaceResolution::NotGiven, None),
            Some(Birthplace::Coordinate(coordinate)) => {
                (BirthplaceResolution::Explicit, Some(coordinate.validated()?))
            }
            Some(Birthplace::Name(name)) => match self.registry.lookup(&name) {
                Some(coordinate) => (BirthplaceResolution::Found(name), Some(coordinate)),
                None => {
                    warn!(%name, "birthplace not registered, local time left unadjusted");
                    (BirthplaceResolution::NotFound(name), None)
                }
            },
        };

        let options = self.options();
        let civil = CivilDateTime::from_date_and_hour(date, hour_with_minutes);

        let mut minutes = 0;
        let mut summer_time_applied = false;
        if let Some(coordinate) = coordinates.filter(|_| options.use_local_time) {
            let adjustment = self.calculator.resolve(coordinate);
            minutes = adjustment.minutes;
            if options.use_dst {
                if let Some(region) = adjustment.region {
                    if civil
                        .date()
                        .is_some_and(|day| dst::in_summer_time(region, day))
                    {
                        minutes += dst::SUMMER_TIME_MINUTES;
                        summer_time_applied = true;
                    }
                }
            }
        }

        let adjusted_civil = civil.shift_minutes(minutes);
        let day = adjusted_civil
            .date()
            .ok_or(Error::DateOutOfRange(adjusted_civil))?;
        let lunar_date = self.lunar.to_lunar_date(day);
        let solar_term_period = self.solar_terms.solar_term_period(day);
        debug!(
            input = %civil,
            minutes,
            summer_time_applied,
            adjusted = %adjusted_civil,
            "processed birth time"
        );

        Ok(ProcessedDateTime {
            original_date: date,
            civil,
            adjusted_civil,
            local_time_adjustment_minutes: minutes,
            coordinates,
            birthplace,
            summer_time_applied,
            lunar_date,
            solar_term_period,
        })
    }
}

impl Default for DateTimeProcessor {
    fn default() -> Self {
        Self::new(ProcessingOptions::default())
    }
}

/// Builder for a [`DateTimeProcessor`] with injected parts.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sajutempo::{CoordinateRegistry, DateTimeProcessor, GeoCoordinate};
/// use sajutempo::chinese::ApproximateCalendar;
///
/// let registry = Arc::new(CoordinateRegistry::new());
/// registry.register("Home", GeoCoordinate::new(127.0, 37.5)).unwrap();
///
/// let processor = DateTimeProcessor::builder()
///     .registry(Arc::clone(&registry))
///     .lunar_resolver(Arc::new(ApproximateCalendar))
///     .solar_term_resolver(Arc::new(ApproximateCalendar))
///     .build();
/// assert!(processor.registry().lookup("Home").is_some());
/// ```
#[derive(Debug, Default)]
pub struct DateTimeProcessorBuilder {
    registry: Option<Arc<CoordinateRegistry>>,
    calculator: Option<LocalTimeAdjustmentCalculator>,
    lunar: Option<Arc<dyn LunarCalendarResolver>>,
    solar_terms: Option<Arc<dyn SolarTermResolver>>,
    options: ProcessingOptions,
}

impl DateTimeProcessorBuilder {
    pub fn registry(mut self, registry: Arc<CoordinateRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn calculator(mut self, calculator: LocalTimeAdjustmentCalculator) -> Self {
        self.calculator = Some(calculator);
        self
    }

    pub fn lunar_resolver(mut self, resolver: Arc<dyn LunarCalendarResolver>) -> Self {
        self.lunar = Some(resolver);
        self
    }

    pub fn solar_term_resolver(mut self, resolver: Arc<dyn SolarTermResolver>) -> Self {
        self.solar_terms = Some(resolver);
        self
    }

    pub fn options(mut self, options: ProcessingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> DateTimeProcessor {
        let calendar = Arc::new(ChineseCalendar::new());
        let lunar: Arc<dyn LunarCalendarResolver> = calendar.clone();
        let solar_terms: Arc<dyn SolarTermResolver> = calendar;
        DateTimeProcessor {
            registry: self.registry.unwrap_or_default(),
            calculator: self.calculator.unwrap_or_default(),
            lunar: self.lunar.unwrap_or(lunar),
            solar_terms: self.solar_terms.unwrap_or(solar_terms),
            options: RwLock::new(self.options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chinese::{ApproximateCalendar, SolarTerm};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_gregorian(y, m, d).unwrap()
    }

    fn approximate(options: ProcessingOptions) -> DateTimeProcessor {
        DateTimeProcessor::builder()
            .lunar_resolver(Arc::new(ApproximateCalendar))
            .solar_term_resolver(Arc::new(ApproximateCalendar))
            .options(options)
            .build()
    }

    #[test]
    fn tokyo() {
        let processor = DateTimeProcessor::default();
        let result = processor
            .process(date(1991, 3, 15), 10.5, Some("東京".into()))
            .unwrap();
        assert_eq!(CivilDateTime::new(1991, 3, 15, 10, 30).unwrap(), result.civil);
        assert_eq!(18, result.local_time_adjustment_minutes);
        assert_eq!(
            CivilDateTime::new(1991, 3, 15, 10, 48).unwrap(),
            result.adjusted_civil
        );
        assert_eq!(Some(GeoCoordinate::new(139.6917, 35.6895)), result.coordinates);
        assert_eq!(BirthplaceResolution::Found("東京".into()), result.birthplace);
        assert!(!result.summer_time_applied);
        assert_eq!(
            (1991, 1, 29, false),
            (
                result.lunar_date.year,
                result.lunar_date.month,
                result.lunar_date.day,
                result.lunar_date.is_leap_month
            )
        );
        assert_eq!(SolarTerm::AwakeningOfInsects, result.solar_term_period.term);
    }

    #[test]
    fn midnight_rollover() {
        let processor = DateTimeProcessor::default();
        let result = processor
            .process(
                date(2025, 1, 31),
                23.9,
                Some(GeoCoordinate::new(150.0, 0.0).into()),
            )
            .unwrap();
        assert_eq!("2025-01-31T23:54", result.civil.to_string());
        assert_eq!(60, result.local_time_adjustment_minutes);
        assert_eq!("2025-02-01T00:54", result.adjusted_civil.to_string());
        assert_eq!(BirthplaceResolution::Explicit, result.birthplace);
        // 正月初四，仍在大寒
        assert_eq!((2025, 1, 4), (result.lunar_date.year, result.lunar_date.month, result.lunar_date.day));
        assert_eq!(SolarTerm::MajorCold, result.solar_term_period.term);
    }

    #[test]
    fn without_birthplace() {
        let processor = approximate(ProcessingOptions::default());
        let result = processor.process(date(2024, 6, 1), 8.25, None).unwrap();
        assert_eq!(0, result.local_time_adjustment_minutes);
        assert_eq!(result.civil, result.adjusted_civil);
        assert_eq!("2024-06-01T08:15", result.adjusted_civil.to_string());
        assert_eq!(None, result.coordinates);
        assert_eq!(BirthplaceResolution::NotGiven, result.birthplace);
    }

    #[test]
    fn unknown_birthplace() {
        let processor = approximate(ProcessingOptions::default());
        let result = processor
            .process(date(2024, 6, 1), 8.0, Some("Atlantis".into()))
            .unwrap();
        assert_eq!(0, result.local_time_adjustment_minutes);
        assert_eq!(None, result.coordinates);
        assert_eq!(
            BirthplaceResolution::NotFound("Atlantis".into()),
            result.birthplace
        );
    }

    #[test]
    fn local_time_disabled() {
        let processor = approximate(ProcessingOptions {
            use_local_time: false,
            use_dst: true,
        });
        for place in ["東京", "서울", "London", "Sydney"] {
            let result = processor
                .process(date(1988, 7, 1), 23.5, Some(place.into()))
                .unwrap();
            assert_eq!(0, result.local_time_adjustment_minutes, "{place}");
            assert_eq!(result.civil, result.adjusted_civil, "{place}");
            assert!(!result.summer_time_applied);
            // coordinates are still reported
            assert!(result.coordinates.is_some());
        }
    }

    #[test]
    fn summer_time() {
        let processor = approximate(ProcessingOptions::default());
        let seoul = || Some(Birthplace::from("서울"));

        let result = processor.process(date(1988, 7, 1), 12.0, seoul()).unwrap();
        assert_eq!(-32, result.local_time_adjustment_minutes);
        assert!(!result.summer_time_applied);

        processor.update_options(OptionsUpdate {
            use_dst: Some(true),
            ..Default::default()
        });
        let result = processor.process(date(1988, 7, 1), 12.0, seoul()).unwrap();
        assert_eq!(-92, result.local_time_adjustment_minutes);
        assert!(result.summer_time_applied);
        assert_eq!("1988-07-01T10:28", result.adjusted_civil.to_string());

        // outside any period
        let result = processor.process(date(1990, 7, 1), 12.0, seoul()).unwrap();
        assert_eq!(-32, result.local_time_adjustment_minutes);
        // no summer time record for the linear formula
        let result = processor
            .process(date(1988, 7, 1), 12.0, Some("Sydney".into()))
            .unwrap();
        assert!(!result.summer_time_applied);
    }

    #[test]
    fn rejects_bad_input() {
        let processor = approximate(ProcessingOptions::default());
        let day = date(2024, 1, 1);
        for hour in [24.0, -0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                processor.process(day, hour, None),
                Err(Error::HourOutOfRange(_))
            ));
        }
        for (lon, lat) in [(181.0, 0.0), (0.0, -90.5), (f64::NAN, 0.0)] {
            assert!(matches!(
                processor.process(day, 12.0, Some(GeoCoordinate::new(lon, lat).into())),
                Err(Error::InvalidCoordinate { .. })
            ));
        }
        assert!(processor.process(day, 0.0, None).is_ok());
        assert!(processor.process(day, 23.99, None).is_ok());
    }

    #[test]
    fn registered_after_construction() {
        let processor = approximate(ProcessingOptions::default());
        processor
            .registry()
            .register("Ulaanbaatar", GeoCoordinate::new(106.9057, 47.8864))
            .unwrap();
        let result = processor
            .process(date(2024, 1, 1), 12.0, Some("Ulaanbaatar".into()))
            .unwrap();
        // round((106.9057 - 135) * 4)
        assert_eq!(-112, result.local_time_adjustment_minutes);
    }

    #[test]
    fn options_update_keeps_earlier_results() {
        let processor = approximate(ProcessingOptions::default());
        let before = processor
            .process(date(2024, 1, 1), 12.0, Some("東京".into()))
            .unwrap();
        let options = processor.update_options(OptionsUpdate {
            use_local_time: Some(false),
            use_dst: None,
        });
        assert_eq!(options, processor.options());
        assert!(!options.use_local_time);
        let after = processor
            .process(date(2024, 1, 1), 12.0, Some("東京".into()))
            .unwrap();
        assert_eq!(18, before.local_time_adjustment_minutes);
        assert_eq!(0, after.local_time_adjustment_minutes);
    }

    #[test]
    fn shared_between_threads() {
        let processor = Arc::new(approximate(ProcessingOptions::default()));
        std::thread::scope(|s| {
            for i in 0..8 {
                let processor = Arc::clone(&processor);
                s.spawn(move || {
                    for d in 1..=28 {
                        let result = processor
                            .process(date(2024, 2, d), (i * 3) as f64, Some("東京".into()))
                            .unwrap();
                        assert_eq!(18, result.local_time_adjustment_minutes);
                        assert!(result.adjusted_civil.is_valid());
                    }
                });
            }
        });
    }

    #[test]
    fn before_first_day() {
        let processor = approximate(ProcessingOptions::default());
        let first = Date::from_jdn(0);
        match processor.process(first, 0.0, Some("서울".into())) {
            Err(Error::DateOutOfRange(adjusted)) => {
                assert_eq!("-4713-11-23T23:28", adjusted.to_string());
            }
            other => panic!("unexpected {other:?}"),
        }
        // eastward shifts stay in range
        let result = processor
            .process(first, 0.0, Some("東京".into()))
            .unwrap();
        assert_eq!(Some(first), result.adjusted_civil.date());
        assert_eq!(
            (-4713, 11, 24),
            (result.lunar_date.year, result.lunar_date.month, result.lunar_date.day)
        );
    }

    #[test]
    fn writes_during_reads() {
        let processor = approximate(ProcessingOptions::default());
        let seeded = processor.registry().len();
        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..200 {
                    processor
                        .registry()
                        .register(format!("place {i}"), GeoCoordinate::new(100.0, 10.0))
                        .unwrap();
                    processor.update_options(OptionsUpdate {
                        use_local_time: Some(i % 2 == 1),
                        use_dst: Some(i % 3 == 0),
                    });
                }
            });
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..200 {
                        let result = processor
                            .process(date(2024, 5, 5), 12.0, Some("東京".into()))
                            .unwrap();
                        let minutes = result.local_time_adjustment_minutes;
                        assert!(minutes == 0 || minutes == 18, "{minutes}");
                        assert_eq!(result.civil.shift_minutes(minutes), result.adjusted_civil);
                        assert!(!result.summer_time_applied);
                        assert_eq!(BirthplaceResolution::Found("東京".into()), result.birthplace);
                    }
                });
            }
        });
        let names = processor.registry().names();
        assert_eq!(seeded + 200, names.len());
        assert_eq!("place 199", names[names.len() - 1]);
        assert_eq!(
            ProcessingOptions {
                use_local_time: true,
                use_dst: false
            },
            processor.options()
        );
    }

    #[test]
    fn serializes() {
        let processor = DateTimeProcessor::default();
        let result = processor
            .process(date(1991, 3, 15), 10.5, Some("東京".into()))
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!("1991-03-15", json["original_date"]);
        assert_eq!(10, json["adjusted_civil"]["hour"]);
        assert_eq!(48, json["adjusted_civil"]["minute"]);
        assert_eq!("東京", json["birthplace"]["found"]);
        assert_eq!("AwakeningOfInsects", json["solar_term_period"]["term"]);
        assert_eq!(139.6917, json["coordinates"]["longitude"]);
    }
}
