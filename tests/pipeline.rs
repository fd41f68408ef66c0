use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use film_absorption::cli::run;
use film_absorption::config::{Axis, RunConfig, ValueScale};
use film_absorption::data::loader::{parse_csv, LoadOptions};
use film_absorption::{analyse, AbsorptionError, PointValue};
use serde_json::Value;
use tempfile::TempDir;

const TWO_FILMS: &str = "\
filmA,,filmA,,Baseline 100%T,,filmB,,filmB,
Wavelength (nm),%T,Wavelength (nm),%R,Wavelength (nm),%T,Wavelength (nm),%T,Wavelength (nm),%R
620.0,60.0,620.0,10.0,620.0,100.0,620.0,30.0,620.0,-50.0
1240.0,10.0,1240.0,5.0,1240.0,100.0,1240.0,50.0,1240.0,20.0
";

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent directory should be created");
    }
    fs::write(path, contents).expect("file should be written");
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("output should exist")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn loaded_table_flows_through_the_core() {
    let rows = parse_csv(TWO_FILMS.as_bytes(), &LoadOptions::default()).unwrap();
    let report = analyse(&rows, None).unwrap();

    assert_eq!(report.sample_names(), ["filmA", "filmB"]);

    let a = &report.samples[0].series;
    assert_relative_eq!(a.absorptance[0], 0.3, epsilon = 1e-12);
    assert_relative_eq!(a.absorbance[0].value().unwrap(), -(0.7f64.ln()), epsilon = 1e-12);
    assert_relative_eq!(a.absorptance[1], 0.85, epsilon = 1e-12);

    // filmB at 620 nm: T=0.3, R=-0.5 → undefined absorbance, absorptance 1.2
    let b = &report.samples[1].series;
    assert!(matches!(b.absorbance[0], PointValue::Invalid(_)));
    assert_relative_eq!(b.absorptance[0], 1.2, epsilon = 1e-12);
    assert!(b.is_valid(1));
}

#[test]
fn full_run_writes_all_quantities() {
    let temp = TempDir::new().expect("tempdir should be created");
    let data_path = temp.path().join("tr.csv");
    write_file(&data_path, TWO_FILMS);

    let cfg = RunConfig {
        data_path: Some(data_path),
        thickness_cm: Some(0.0002),
        ..Default::default()
    };
    let report = run(&cfg).expect("run should succeed");
    assert_eq!(report.total_invalid_points(), 1);

    let out = temp.path().join("processed");
    for name in ["absorptance.csv", "absorbance.csv", "alpha.csv", "summary.json"] {
        assert!(out.join(name).is_file(), "{name} missing");
    }

    let absorbance = read_lines(&out.join("absorbance.csv"));
    assert_eq!(
        absorbance[0],
        "Energy (eV),Sample filmA,Energy (eV),Sample filmB"
    );
    // 620 nm → 2 eV; filmB's first point is undefined and left blank.
    assert_eq!(absorbance[1], "2.000,0.357,2.000,");
    assert_eq!(absorbance.len(), 3);

    let alpha = read_lines(&out.join("alpha.csv"));
    assert!(alpha[1].starts_with("2.000,1783.375,"), "{}", alpha[1]);

    let summary: Value =
        serde_json::from_str(&fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["thickness_cm"], 0.0002);
    assert_eq!(summary["samples"][1]["name"], "filmB");
    assert_eq!(summary["samples"][1]["invalid_indices"][0], 0);
    assert_eq!(summary["samples"][0]["invalid_points"], 0);
}

#[test]
fn wavelength_axis_without_thickness() {
    let temp = TempDir::new().expect("tempdir should be created");
    let data_path = temp.path().join("tr.csv");
    write_file(&data_path, TWO_FILMS);
    let out = temp.path().join("results");

    let cfg = RunConfig {
        data_path: Some(data_path),
        output_dir: Some(out.clone()),
        axis: Axis::Wavelength,
        ..Default::default()
    };
    run(&cfg).expect("run should succeed");

    assert!(!out.join("alpha.csv").exists());
    let absorptance = read_lines(&out.join("absorptance.csv"));
    assert_eq!(
        absorptance[0],
        "Wavelength (nm),Sample filmA,Wavelength (nm),Sample filmB"
    );
    assert_eq!(absorptance[1], "620.000,0.300,620.000,1.200");
}

#[test]
fn structural_errors_write_nothing() {
    let temp = TempDir::new().expect("tempdir should be created");
    let data_path = temp.path().join("tr.csv");
    // filmB has no reflectance column.
    write_file(
        &data_path,
        "filmA,,filmA,,filmB,\nnm,%T,nm,%R,nm,%T\n500,60,500,10,500,40\n",
    );

    let cfg = RunConfig {
        data_path: Some(data_path),
        ..Default::default()
    };
    let err = run(&cfg).unwrap_err();
    assert_eq!(
        err.downcast_ref::<AbsorptionError>(),
        Some(&AbsorptionError::IncompleteSample {
            name: "filmB".into(),
            missing: film_absorption::MeasurementKind::Reflectance,
        })
    );
    assert!(!temp.path().join("processed").exists());
}

#[test]
fn invalid_thickness_is_rejected_before_matching() {
    let temp = TempDir::new().expect("tempdir should be created");
    let data_path = temp.path().join("tr.csv");
    // Duplicate T column for filmA; the thickness error must win.
    write_file(
        &data_path,
        "filmA,,filmA,\nnm,%T,nm,%T\n500,60,500,61\n",
    );

    let cfg = RunConfig {
        data_path: Some(data_path),
        thickness_cm: Some(-3.0),
        ..Default::default()
    };
    let err = run(&cfg).unwrap_err();
    assert_eq!(
        err.downcast_ref::<AbsorptionError>(),
        Some(&AbsorptionError::InvalidThickness(-3.0))
    );
}

#[test]
fn config_file_is_honoured() {
    let temp = TempDir::new().expect("tempdir should be created");
    let data_path = temp.path().join("tr.csv");
    write_file(
        &data_path,
        "filmA,,filmA,\nnm,%T,nm,%R\n500,0.6,500,0.1\n",
    );
    let config_path = temp.path().join("run.json");
    write_file(
        &config_path,
        &format!(
            r#"{{ "data_path": {:?}, "value_scale": "fraction", "thickness_cm": 0.0002 }}"#,
            data_path.to_str().unwrap()
        ),
    );

    let cfg = RunConfig::from_file(&config_path).unwrap();
    assert_eq!(cfg.value_scale, ValueScale::Fraction);

    let report = run(&cfg).expect("run should succeed");
    let alpha = report.samples[0].series.absorption_coefficient.as_ref().unwrap();
    assert_relative_eq!(alpha[0].value().unwrap(), 1783.4, epsilon = 0.1);
}
