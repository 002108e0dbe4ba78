use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;

const START_YEAR: i32 = 2011;
const N_DAYS: u64 = 731;

/// Zero-mean Gaussian jitter of the given spread.
fn jitter(std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(0.0, std_dev).with_context(|| format!("invalid spread {std_dev}"))
}

fn season_label(date: NaiveDate) -> &'static str {
    match (date.month(), date.day()) {
        (3, 21..) | (4..=5, _) | (6, ..=20) => "Spring",
        (6, _) | (7..=8, _) | (9, ..=22) => "Summer",
        (9, _) | (10..=11, _) | (12, ..=20) => "Fall",
        _ => "Winter",
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let out = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "dataclean_analisis.csv".to_string());

    let mut rng = StdRng::seed_from_u64(42);
    let temp_noise = jitter(0.05)?;
    let atemp_noise = jitter(0.02)?;
    let hum_noise = jitter(0.14)?;
    let wind_noise = jitter(0.07)?;
    let casual_noise = jitter(120.0)?;
    let registered_noise = jitter(300.0)?;
    let start = NaiveDate::from_ymd_opt(START_YEAR, 1, 1).context("invalid start date")?;

    let mut writer = csv::Writer::from_path(&out).with_context(|| format!("creating {out}"))?;
    writer.write_record([
        "instant", "dteday", "season", "yr", "mnth", "holiday", "weekday", "workingday",
        "weathersit", "temp", "atemp", "hum", "windspeed", "casual", "registered", "cnt",
    ])?;

    for i in 0..N_DAYS {
        let date = start
            .checked_add_days(Days::new(i))
            .context("date overflow")?;
        let yr = date.year() - START_YEAR;
        let weekday = date.weekday();
        let holiday = matches!((date.month(), date.day()), (1, 1) | (7, 4) | (12, 25));
        let workingday = !holiday && !matches!(weekday, Weekday::Sat | Weekday::Sun);

        // Warm in July, cold in January.
        let phase = (f64::from(date.ordinal()) - 200.0) / 365.0 * 2.0 * std::f64::consts::PI;
        let temp = (0.5 + 0.3 * phase.cos() + rng.sample(temp_noise)).clamp(0.05, 0.95);
        let atemp = (temp * 0.95 + rng.sample(atemp_noise)).clamp(0.05, 0.95);
        let hum = (0.62 + rng.sample(hum_noise)).clamp(0.2, 0.97);
        let windspeed = (0.19 + rng.sample(wind_noise)).clamp(0.02, 0.5);
        let weathersit = match hum {
            h if h > 0.85 => 3,
            h if h > 0.7 => 2,
            _ => 1,
        };

        let growth = 1.0 + 0.6 * f64::from(yr);
        let weather = 1.0 - 0.25 * f64::from(weathersit - 1);
        let casual_base = if workingday { 450.0 } else { 1300.0 };
        let casual = (casual_base * (temp * 1.6) * weather * growth + rng.sample(casual_noise)).max(2.0);
        let registered_base = if workingday { 3600.0 } else { 2700.0 };
        let registered =
            (registered_base * (0.6 + temp) * weather * growth * 0.8 + rng.sample(registered_noise)).max(20.0);
        let (casual, registered) = (casual.round() as u32, registered.round() as u32);

        writer.write_record([
            (i + 1).to_string(),
            date.format("%Y-%m-%d").to_string(),
            season_label(date).to_string(),
            yr.to_string(),
            date.month().to_string(),
            u8::from(holiday).to_string(),
            weekday.num_days_from_sunday().to_string(),
            u8::from(workingday).to_string(),
            weathersit.to_string(),
            format!("{temp:.6}"),
            format!("{atemp:.6}"),
            format!("{hum:.6}"),
            format!("{windspeed:.6}"),
            casual.to_string(),
            registered.to_string(),
            (casual + registered).to_string(),
        ])?;
    }
    writer.flush()?;

    log::info!("Wrote {N_DAYS} days to {out}");
    println!("Wrote {N_DAYS} days to {out}");
    Ok(())
}
