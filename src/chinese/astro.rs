//! 日月視位置及朔、交節時刻的推算
//!
//! 太陽視黃經用低精度太陽理論（Meeus《Astronomical Algorithms》第 25 章），
//! 誤差約 0.01°；合朔用同書第 49 章級數（含行星攝動項），誤差在數分鐘內。
//! 兩者皆以力學時（TT）計。

use tracing::trace;

use crate::time_scales::Tt;

const J2000: f64 = 2451545.0;
/// 平朔望月日數
const SYNODIC_MONTH: f64 = 29.530588861;
/// 第 0 次平朔（2000 年 1 月 6 日）
const NEW_MOON_EPOCH: f64 = 2451550.09766;
/// 太陽每行一度約需日數，僅供迭代步長估計
pub const DAYS_PER_DEGREE: f64 = 365.2422 / 360.0;

/// 將角度化入 `[0, 360)`。
pub fn normalize_360(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// 將角度化入 `[-180, 180)`。
fn normalize_pm180(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

fn sin_deg(deg: f64) -> f64 {
    deg.to_radians().sin()
}

/// 太陽地心視黃經（度，`[0, 360)`），已計章動及光行差。
pub fn apparent_solar_longitude(tt: Tt) -> f64 {
    let t = (tt.0 - J2000) / 36525.0;
    let l0 = 280.46646 + 36000.76983 * t + 0.0003032 * t * t;
    let m = 357.52911 + 35999.05029 * t - 0.0001537 * t * t;
    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * sin_deg(m)
        + (0.019993 - 0.000101 * t) * sin_deg(2.0 * m)
        + 0.000289 * sin_deg(3.0 * m);
    let omega = 125.04 - 1934.136 * t;
    normalize_360(l0 + c - 0.00569 - 0.00478 * sin_deg(omega))
}

/// 求太陽視黃經達 `target` 度的時刻，自 `guess` 起迭代，取最近一次。
pub fn solar_longitude_crossing(target: f64, guess: Tt) -> Tt {
    let mut jd = guess.0;
    for _ in 0..12 {
        let diff = normalize_pm180(target - apparent_solar_longitude(Tt(jd)));
        jd += diff * DAYS_PER_DEGREE;
        if diff.abs() < 1e-8 {
            break;
        }
    }
    trace!(target, jd, "solar longitude crossing");
    Tt(jd)
}

/// 第 `k` 次合朔時刻，`k = 0` 為 2000 年 1 月 6 日之朔。
pub fn new_moon(k: i64) -> Tt {
    let k = k as f64;
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let jde = NEW_MOON_EPOCH + SYNODIC_MONTH * k + 0.00015437 * t2 - 0.000000150 * t3
        + 0.00000000073 * t4;
    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;
    let m = 2.5534 + 29.10535670 * k - 0.0000014 * t2 - 0.00000011 * t3;
    let mp = 201.5643 + 385.81693528 * k + 0.0107582 * t2 + 0.00001238 * t3
        - 0.000000058 * t4;
    let f = 160.7108 + 390.67050284 * k - 0.0016118 * t2 - 0.00000227 * t3
        + 0.000000011 * t4;
    let omega = 124.7746 - 1.56375588 * k + 0.0020672 * t2 + 0.00000215 * t3;

    let periodic = -0.40720 * sin_deg(mp)
        + 0.17241 * e * sin_deg(m)
        + 0.01608 * sin_deg(2.0 * mp)
        + 0.01039 * sin_deg(2.0 * f)
        + 0.00739 * e * sin_deg(mp - m)
        - 0.00514 * e * sin_deg(mp + m)
        + 0.00208 * e * e * sin_deg(2.0 * m)
        - 0.00111 * sin_deg(mp - 2.0 * f)
        - 0.00057 * sin_deg(mp + 2.0 * f)
        + 0.00056 * e * sin_deg(2.0 * mp + m)
        - 0.00042 * sin_deg(3.0 * mp)
        + 0.00042 * e * sin_deg(m + 2.0 * f)
        + 0.00038 * e * sin_deg(m - 2.0 * f)
        - 0.00024 * e * sin_deg(2.0 * mp - m)
        - 0.00017 * sin_deg(omega)
        - 0.00007 * sin_deg(mp + 2.0 * m)
        + 0.00004 * sin_deg(2.0 * mp - 2.0 * f)
        + 0.00004 * sin_deg(3.0 * m)
        + 0.00003 * sin_deg(mp + m - 2.0 * f)
        + 0.00003 * sin_deg(2.0 * mp + 2.0 * f)
        - 0.00003 * sin_deg(mp + m + 2.0 * f)
        + 0.00003 * sin_deg(mp - m + 2.0 * f)
        - 0.00002 * sin_deg(mp - m - 2.0 * f)
        - 0.00002 * sin_deg(3.0 * mp + m)
        + 0.00002 * sin_deg(4.0 * mp);

    // 行星攝動，(係數, 常數項, k 的係數)
    const PLANETARY: [(f64, f64, f64); 14] = [
        (0.000325, 299.77, 0.107408),
        (0.000165, 251.88, 0.016321),
        (0.000164, 251.83, 26.651886),
        (0.000126, 349.42, 36.412478),
        (0.000110, 84.66, 18.206239),
        (0.000062, 141.74, 53.303771),
        (0.000060, 207.14, 2.453732),
        (0.000056, 154.84, 7.306860),
        (0.000047, 34.52, 27.261239),
        (0.000042, 207.19, 0.121824),
        (0.000040, 291.34, 1.844379),
        (0.000037, 161.72, 24.198154),
        (0.000035, 239.56, 25.513099),
        (0.000023, 331.55, 3.592518),
    ];
    let planetary: f64 = PLANETARY
        .iter()
        .enumerate()
        .map(|(i, &(coef, a0, a1))| {
            // 首項另有 T² 項
            let arg = a0 + a1 * k - if i == 0 { 0.009173 * t2 } else { 0.0 };
            coef * sin_deg(arg)
        })
        .sum();

    Tt(jde + periodic + planetary)
}

/// 平朔在 `tt` 之前（或同時）的最後一次序號。真朔可與平朔差十餘小時，調用方須自行校正。
pub fn mean_lunation_before(tt: Tt) -> i64 {
    ((tt.0 - NEW_MOON_EPOCH) / SYNODIC_MONTH).floor() as i64
}
