use chrono::{TimeZone, Utc};
use pvgrid::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn monthly_grid() -> GridDataset {
    let stamps = (1..=3)
        .map(|m| Utc.with_ymd_and_hms(2019, m, 1, 0, 0, 0).unwrap())
        .collect();
    let times = TimeIndex::from_utc(stamps).unwrap();
    // [t][lat][lon], 2 latitudes and 1 longitude
    let ghi = vec![120., 60., 160., 90., 200., 130.];
    GridDataset::new(times, vec![10., 40.], vec![5.], ghi)
        .unwrap()
        .with_temperature(vec![25., 0., 26., 2., 27., 7.])
        .unwrap()
}

fn table(spread: Float) -> PdfTable {
    let months = (0..12)
        .map(|_| MonthlyPdf::new(vec![100. - spread, 100., 100. + spread], vec![0.25, 0.5, 0.25]))
        .collect();
    PdfTable::new(months).unwrap()
}

fn dataset() -> PdfDataset {
    PdfDataset::new(vec![
        PdfCell {
            latitude: 11.,
            longitude: 4.,
            table: table(10.),
        },
        PdfCell {
            latitude: 38.,
            longitude: 6.,
            table: table(90.),
        },
    ])
}

fn station() -> StationConfig {
    StationConfig::from_json5(
        "{
            // Fixed, equator-facing panels
            tilt: 'optimal',
            azimuth: 180,
            tracking: 0,
            capacity: 1000,
            technology: 'csi',
            system_loss: 0.14,
        }",
    )
    .unwrap()
}

#[test]
fn test_grid_with_pdfs() {
    // cargo test --package pvgrid --test grid -- test_grid_with_pdfs --exact --nocapture
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let data = monthly_grid();
    let pdfs = dataset();
    let options = PipelineOptions {
        use_pdfs: true,
        seed: Some(5),
        ..PipelineOptions::default()
    };

    let a = run_grid(&data, &station(), &options, Some(&pdfs)).unwrap();
    assert!(a.is_complete());
    assert_eq!(a.frequency, Frequency::Monthly);
    assert_eq!(a.unit(), "Wh/day");
    assert!(a.values.iter().all(|v| v.is_finite() && *v > 0.));

    // Same seed, same result
    let b = run_grid(&data, &station(), &options, Some(&pdfs)).unwrap();
    assert_eq!(a, b);

    // Each cell uses `seed + index`, and its nearest distributions
    let config = station()
        .for_cell(&Location::new(40., 5.).unwrap())
        .unwrap();
    let series = data.cell_series(1, 0).unwrap();
    let mut rng = SmallRng::seed_from_u64(6);
    let alone = run_cell(
        &series,
        &config,
        &PipelineOptions {
            frequency: Some(Frequency::Monthly),
            ..options.clone()
        },
        pdfs.nearest(40., 5.),
        &mut rng,
    )
    .unwrap();
    for t in 0..3 {
        assert_eq!(a.get(t, 1, 0), Some(alone.values[t]));
    }

    // Another seed draws other days
    let options = PipelineOptions {
        seed: Some(6),
        ..options
    };
    let c = run_grid(&data, &station(), &options, Some(&pdfs)).unwrap();
    assert_ne!(a.values, c.values);
}

#[test]
fn test_grid_without_pdfs() {
    let data = monthly_grid();
    let out = run_grid(&data, &station(), &PipelineOptions::default(), None).unwrap();
    assert!(out.is_complete());
    // More irradiance, more energy
    assert!(out.get(0, 0, 0) < out.get(2, 0, 0));
    assert!(out.get(0, 1, 0) < out.get(2, 1, 0));
}

#[test]
fn test_grid_configuration_errors() {
    let data = monthly_grid();

    let mut bad = station();
    bad.system_loss = 1.5;
    let err = run_grid(&data, &bad, &PipelineOptions::default(), None).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("1.5"), "{}", err);

    // A frequency that contradicts the data
    let options = PipelineOptions {
        frequency: Some(Frequency::Daily),
        ..PipelineOptions::default()
    };
    let err = run_grid(&data, &station(), &options, None).unwrap_err();
    assert!(err.is_configuration());

    // PDFs for hourly data
    let start = Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap();
    let hourly = GridDataset::new(
        TimeIndex::hourly(start, 24),
        vec![10., 40.],
        vec![5.],
        vec![100.; 48],
    )
    .unwrap();
    let options = PipelineOptions {
        use_pdfs: true,
        ..PipelineOptions::default()
    };
    assert_eq!(
        run_grid(&hourly, &station(), &options, Some(&dataset())),
        Err(Error::PdfsNotSupported {
            frequency: Frequency::Hourly
        })
    );

    // Shapes
    assert!(matches!(
        hourly.clone().with_temperature(vec![20.; 47]),
        Err(Error::LengthMismatch {
            field: "temperature",
            ..
        })
    ));

    // Non-UTC timestamps are rejected when building the index
    let r = TimeIndex::parse_rfc3339(&["2019-06-01T00:00:00+02:00"]);
    assert!(r.is_err());
}
