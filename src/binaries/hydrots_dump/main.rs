use clap::Parser;
use serde::Deserialize;
use serde::Serialize;

use hydrots_base::identifier::Identifier;
use hydrots_base::interval::{Interval, Resolution};
use hydrots_tsdb::engine::regular::store::TimeSeriesStore;
use hydrots_utils::time::now;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Parser)]
#[clap(about, version, author)]
struct Config {
    /// Resolution: minute, hour, day or month.
    #[clap(long, default_value = "day")]
    pub resolution: String,

    /// Interval multiplier, e.g. 15 for 15-minute.
    #[clap(long, default_value_t = 1)]
    pub multiplier: u32,

    /// Inclusive period start, "YYYY-MM-DD HH:MM".
    #[clap(long)]
    pub start: String,

    /// Inclusive period end, "YYYY-MM-DD HH:MM".
    #[clap(long)]
    pub end: String,

    /// Series units label.
    #[clap(long, default_value = "CFS")]
    pub units: String,

    /// Fill every cell with a ramp starting at this value instead of
    /// leaving the store missing.
    #[clap(long)]
    pub ramp: Option<f64>,
}

fn parse_resolution(name: &str) -> anyhow::Result<Resolution> {
    match name.to_ascii_lowercase().as_str() {
        "minute" => Ok(Resolution::Minute),
        "hour" => Ok(Resolution::Hour),
        "day" => Ok(Resolution::Day),
        "month" => Ok(Resolution::Month),
        other => Err(anyhow::anyhow!("unknown resolution: {}", other)),
    }
}

fn parse_time(s: &str) -> anyhow::Result<chrono::NaiveDateTime> {
    if let Ok(t) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Ok(t);
    }
    let date = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap())
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    println!("config: {:?}", config);

    let interval = Interval::new(parse_resolution(&config.resolution)?, config.multiplier);
    let id = Identifier::new("DUMP", "CLI", "VALUE", interval, "DEMO");

    let started = now();
    let mut store = TimeSeriesStore::for_identifier(&id);
    store.set_units(config.units.clone());
    store.set_period(parse_time(&config.start)?, parse_time(&config.end)?);
    store.allocate()?;

    if let Some(base) = config.ramp {
        let mut value = base;
        let times: Vec<_> = store.iter().map(|p| p.timestamp).collect();
        for t in times {
            store.set(t, value);
            value += 1.0;
        }
    }

    let mut i = 0;
    for point in store.iter() {
        println!("{}>{} {} {} {}", i, point.timestamp, point.value, point.flag, point.units);
        i += 1;
    }

    let limits = store.limits();
    println!("series: {}", id);
    println!(
        "limits: min={:?} max={:?} first={:?} last={:?} coverage={}/{}",
        limits.min_value,
        limits.max_value,
        limits.first_time,
        limits.last_time,
        limits.non_missing,
        limits.total
    );
    println!("elapsed: {:?}", now() - started);

    Ok(())
}
