use std::sync::Arc;

use approx::assert_abs_diff_eq;
use sajutempo::chinese::{ChineseCalendar, SolarTerm, SolarTermResolver};
use sajutempo::{
    BirthplaceResolution, CivilDateTime, CoordinateRegistry, Date, DateTimeProcessor,
    GeoCoordinate, LocalTimeAdjustmentCalculator, LongitudeBand, ProcessingOptions, Region,
};

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_gregorian(y, m, d).unwrap()
}

#[test]
fn adjusted_time_is_always_valid() {
    let processor = DateTimeProcessor::default();
    let places = [
        GeoCoordinate::new(-180.0, 0.0),
        GeoCoordinate::new(-0.1276, 51.5072),
        GeoCoordinate::new(126.978, 37.5665),
        GeoCoordinate::new(180.0, 0.0),
    ];
    for (y, m, d) in [(2024, 2, 29), (2023, 12, 31), (2024, 1, 1), (2100, 3, 1)] {
        for place in places {
            for hour in [0.0, 0.25, 11.5, 23.99] {
                let result = processor
                    .process(date(y, m, d), hour, Some(place.into()))
                    .unwrap();
                assert!(result.adjusted_civil.is_valid(), "{:?}", result);
                let shift = result.adjusted_civil.date().unwrap() - result.civil.date().unwrap();
                assert!(shift.abs() <= 1);
            }
        }
    }
}

#[test]
fn custom_bands_and_shared_registry() {
    let registry = Arc::new(CoordinateRegistry::new());
    registry
        .register("Vladivostok", GeoCoordinate::new(131.8869, 43.1155))
        .unwrap();
    let calculator = LocalTimeAdjustmentCalculator::with_bands(vec![LongitudeBand {
        region: Region::Korea,
        min_longitude: 120.0,
        max_longitude: 135.0,
        offset_minutes: -30,
    }]);
    let processor = DateTimeProcessor::builder()
        .registry(Arc::clone(&registry))
        .calculator(calculator)
        .build();

    let result = processor
        .process(date(2024, 5, 5), 6.0, Some("Vladivostok".into()))
        .unwrap();
    assert_eq!(-30, result.local_time_adjustment_minutes);

    // seeded names are absent from an empty registry
    let result = processor
        .process(date(2024, 5, 5), 6.0, Some("東京".into()))
        .unwrap();
    assert_eq!(BirthplaceResolution::NotFound("東京".into()), result.birthplace);

    // registrations through the shared handle are visible to the processor
    registry
        .register("東京", GeoCoordinate::new(139.6917, 35.6895))
        .unwrap();
    let result = processor
        .process(date(2024, 5, 5), 6.0, Some("東京".into()))
        .unwrap();
    // 139.6917 falls outside the custom table
    assert_eq!(19, result.local_time_adjustment_minutes);
}

#[test]
fn lunar_context_follows_adjusted_day() {
    let processor = DateTimeProcessor::default();
    // 2024-02-09 23:50 in Tokyo becomes 2024-02-10 00:08, Lunar New Year.
    let result = processor
        .process(date(2024, 2, 9), 23.0 + 50.0 / 60.0, Some("東京".into()))
        .unwrap();
    assert_eq!(
        CivilDateTime::new(2024, 2, 10, 0, 8).unwrap(),
        result.adjusted_civil
    );
    assert_eq!("2024年正月初一", result.lunar_date.to_string());
    assert_eq!(SolarTerm::StartOfSpring, result.solar_term_period.term);
    assert_eq!(Some(date(2024, 2, 4)), result.solar_term_period.began_on);
}

#[test]
fn korean_reckoning() {
    let calendar = ChineseCalendar::with_timezone(540);
    let period = calendar.solar_term_period(date(2024, 3, 20));
    assert_eq!("春分", period.name());
    assert_eq!(3, period.index());
}

#[test]
fn options_from_json() {
    let options: ProcessingOptions = serde_json::from_str(r#"{"use_local_time": false}"#).unwrap();
    let processor = DateTimeProcessor::new(options);
    let result = processor
        .process(date(2024, 5, 5), 6.5, Some(GeoCoordinate::new(100.0, 10.0).into()))
        .unwrap();
    assert_eq!(0, result.local_time_adjustment_minutes);
    let coordinates = result.coordinates.unwrap();
    assert_abs_diff_eq!(100.0, coordinates.longitude);
}
