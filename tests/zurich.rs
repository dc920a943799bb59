use chrono::{TimeZone, Utc};
use pvgrid::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn are_close(x: Float, y: Float, precision: Float) -> bool {
    if (x - y).abs() < precision {
        return true;
    }
    println!("x = {}, y = {}", x, y);
    false
}

/// A clear-ish summer day, zero outside of 06:00-18:00 UTC
fn profile() -> Vec<Float> {
    (0..24)
        .map(|h| {
            if (5..=18).contains(&h) {
                let x = (h as Float - 11.5) / 6.5;
                800. * (1. - x * x).max(0.)
            } else {
                0.
            }
        })
        .collect()
}

fn station() -> StationConfig {
    let mut station = StationConfig::new(1000., Technology::CSi);
    station.tilt = Tilt::Constant(35.);
    station.azimuth = 180.;
    station.tracking = Tracking::Fixed;
    station
}

fn series() -> CellSeries {
    let start = Utc.with_ymd_and_hms(2020, 6, 21, 0, 0, 0).unwrap();
    CellSeries::new(TimeIndex::hourly(start, 24), profile())
        .unwrap()
        .with_diffuse_fraction(vec![0.3; 24])
        .unwrap()
}

#[test]
fn test_zurich_summer_day() {
    // cargo test --package pvgrid --test zurich -- test_zurich_summer_day --exact --nocapture
    let config = station()
        .for_cell(&Location::new(47.36, 8.55).unwrap())
        .unwrap();
    let mut rng = SmallRng::seed_from_u64(0);
    let out = run_cell(&series(), &config, &PipelineOptions::default(), None, &mut rng).unwrap();

    assert_eq!(out.unit(), "Wh");
    let total: Float = out.values.iter().sum();
    assert!(are_close(total, 5469.4745, 0.1));

    // Hour by hour
    assert!(are_close(out.values[6], 147.6293, 0.01));
    assert!(are_close(out.values[11], 670.2027, 0.01));
    assert!(are_close(out.values[17], 83.8976, 0.01));
    assert!(out.values[..6].iter().all(|v| *v == 0.));
    assert!(out.values[18..].iter().all(|v| *v == 0.));

    // Reproducible
    let again = run_cell(&series(), &config, &PipelineOptions::default(), None, &mut rng).unwrap();
    assert_eq!(out, again);
}

#[test]
fn test_zurich_tracking() {
    let location = Location::new(47.36, 8.55).unwrap();
    let mut rng = SmallRng::seed_from_u64(0);
    let mut totals = Vec::new();
    for tracking in [Tracking::Fixed, Tracking::SingleAxis, Tracking::DualAxis] {
        let mut station = station();
        station.tracking = tracking;
        let config = station.for_cell(&location).unwrap();
        let out =
            run_cell(&series(), &config, &PipelineOptions::default(), None, &mut rng).unwrap();
        assert!(out.values.iter().all(|v| *v >= 0. && *v <= 900.));
        totals.push(out.values.iter().sum::<Float>());
    }
    // Following the sun pays off
    assert!(totals[2] > totals[0], "{:?}", totals);
    assert!(totals[1] > 0.);
}

#[test]
fn test_zurich_inverter_and_losses() {
    let location = Location::new(47.36, 8.55).unwrap();
    let mut rng = SmallRng::seed_from_u64(0);

    let mut lossless = station();
    lossless.system_loss = 0.;
    let config = lossless.for_cell(&location).unwrap();
    let a = run_cell(&series(), &config, &PipelineOptions::default(), None, &mut rng).unwrap();
    let total_a: Float = a.values.iter().sum();
    assert!(are_close(total_a, 5469.4745 / 0.9, 0.2));

    // A small inverter clips the peak
    lossless.inverter = Some(Inverter::new(500.).unwrap());
    let config = lossless.for_cell(&location).unwrap();
    let b = run_cell(&series(), &config, &PipelineOptions::default(), None, &mut rng).unwrap();
    assert!(b.values.iter().all(|v| *v <= 500.));
    assert!(b.values.iter().zip(&a.values).all(|(b, a)| b <= a));

    // Out of range losses are rejected before anything is calculated
    let mut station = station();
    station.system_loss = -0.1;
    assert!(station.for_cell(&location).is_err());
    assert!(station.validate().unwrap_err().is_configuration());
}
