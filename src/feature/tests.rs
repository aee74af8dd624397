use super::*;
use std::io::{BufReader, Cursor};
use std::io::Write as _;

use super::apml::ApmlReader;

const SMALL_APML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SUPERHIRN_OUTPUT>
  <LC_MS_RUN number_of_features="2" tr_min="10.0" tr_max="60.0" m_z_min="400.0" m_z_max="1600.0">
    <LC_MS_FEATURES>
      <MS1_FEATURE Tr="12.34" m_z="500.10">
        <LC_INFO AREA="750"/>
      </MS1_FEATURE>
      <MS1_FEATURE Tr="55.5" m_z="1200.3">
        <LC_INFO AREA="12.5"/>
      </MS1_FEATURE>
    </LC_MS_FEATURES>
  </LC_MS_RUN>
</SUPERHIRN_OUTPUT>"#;

fn read_str(xml: &str) -> Result<FeatureList, FeatureError> {
    ApmlReader::new(BufReader::new(Cursor::new(xml.as_bytes().to_vec()))).read("sample")
}

#[test]
fn test_read_small_apml() {
    let list = read_str(SMALL_APML).unwrap();

    assert_eq!(list.name, "sample");
    assert_eq!(list.len(), 2);
    assert_eq!(list.declared_count, Some(2));
    assert_eq!(list.format, SourceFormat::Apml);
    assert_eq!(list.bounds.tr_min, "10.0".parse::<Decimal>().unwrap());
    assert_eq!(list.bounds.mz_max, "1600".parse::<Decimal>().unwrap());

    let first = &list.features[0];
    assert_eq!(first.retention_time.to_string(), "12.34");
    assert_eq!(first.mz.precision(), 2);
    assert!((first.intensity - 750.0).abs() < 1e-9);
    assert!((list.features[1].intensity - 12.5).abs() < 1e-9);
}

#[test]
fn test_count_mismatch_is_not_an_error() {
    let xml = SMALL_APML.replace("number_of_features=\"2\"", "number_of_features=\"5\"");
    let list = read_str(&xml).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list.declared_count, Some(5));
}

#[test]
fn test_missing_run_is_format_error() {
    let err = read_str("<root><LC_MS_FEATURES/></root>").unwrap_err();
    assert!(matches!(err, FeatureError::Format(_)));
}

#[test]
fn test_missing_feature_list_is_format_error() {
    let xml = r#"<LC_MS_RUN number_of_features="0" tr_min="1" tr_max="2" m_z_min="1" m_z_max="2"/>"#;
    assert!(matches!(read_str(xml).unwrap_err(), FeatureError::Format(_)));
}

#[test]
fn test_missing_area_is_reported() {
    let xml = SMALL_APML.replace("<LC_INFO AREA=\"750\"/>", "");
    match read_str(&xml).unwrap_err() {
        FeatureError::MissingAttribute(name) => assert!(name.contains("AREA")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_non_numeric_coordinate_is_parse_error() {
    let xml = SMALL_APML.replace("Tr=\"12.34\"", "Tr=\"abc\"");
    match read_str(&xml).unwrap_err() {
        FeatureError::Parse { field, value } => {
            assert_eq!(field, "MS1_FEATURE/@Tr");
            assert_eq!(value, "abc");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_negative_area_is_parse_error() {
    let xml = SMALL_APML.replace("AREA=\"750\"", "AREA=\"-1\"");
    assert!(matches!(read_str(&xml).unwrap_err(), FeatureError::Parse { .. }));
}

#[test]
fn test_nested_lc_info_is_ignored() {
    let xml = r#"<LC_MS_RUN number_of_features="1" tr_min="0" tr_max="10" m_z_min="0" m_z_max="10">
  <LC_MS_FEATURES>
    <MS1_FEATURE Tr="1.5" m_z="2.5">
      <MS2_INFO><LC_INFO AREA="999"/></MS2_INFO>
      <LC_INFO AREA="3"/>
    </MS1_FEATURE>
  </LC_MS_FEATURES>
</LC_MS_RUN>"#;
    let list = read_str(xml).unwrap();
    assert_eq!(list.len(), 1);
    assert!((list.features[0].intensity - 3.0).abs() < 1e-9);
}

#[test]
fn test_csv_table() {
    let csv = "#,m/z,Retention Time (min)\n1,500.10,12.34\n2,,20.5\n3,650.5,11\n";
    let list = table::from_reader(Cursor::new(csv), "run").unwrap();

    assert_eq!(list.len(), 3);
    assert_eq!(list.declared_count, None);
    assert_eq!(list.format, SourceFormat::Csv);
    assert_eq!(list.features[1].mz, Decimal::ZERO);
    assert!(list.intensities().all(|v| v == 1.0));
    assert_eq!(list.bounds.mz_min, Decimal::ZERO);
    assert_eq!(list.bounds.mz_max.to_string(), "650.5");
    assert_eq!(list.bounds.tr_min.to_string(), "11");
    assert_eq!(list.bounds.tr_max.to_string(), "20.5");
}

#[test]
fn test_csv_intensity_column() {
    let csv = "#,m/z,Retention Time (min),Intensity\n1,500.1,12.3,40\n2,501.1,13.3,\n";
    let list = table::from_reader(Cursor::new(csv), "run").unwrap();
    let values: Vec<f64> = list.intensities().collect();
    assert_eq!(values, vec![40.0, 0.0]);
}

#[test]
fn test_csv_missing_column() {
    let csv = "#,mass,Retention Time (min)\n1,500.1,12.3\n";
    let err = table::from_reader(Cursor::new(csv), "run").unwrap_err();
    assert!(matches!(err, FeatureError::MissingAttribute(_)));
}

#[test]
fn test_source_format_from_extension() {
    assert_eq!(
        SourceFormat::from_path(Path::new("a/b.XML")).unwrap(),
        SourceFormat::Apml
    );
    assert_eq!(
        SourceFormat::from_path(Path::new("b.csv")).unwrap(),
        SourceFormat::Csv
    );
    assert!(matches!(
        SourceFormat::from_path(Path::new("b.txt")),
        Err(FeatureError::Format(_))
    ));
}

#[test]
fn test_quartiles_linear_interpolation() {
    let q = Quartiles::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
    assert!((q.q1 - 1.75).abs() < 1e-12);
    assert!((q.q2 - 2.5).abs() < 1e-12);
    assert!((q.q3 - 3.25).abs() < 1e-12);

    let single = Quartiles::from_values(&[7.0]).unwrap();
    assert_eq!(single, Quartiles::new(7.0, 7.0, 7.0));
}

#[test]
fn test_quartiles_empty_input() {
    assert!(matches!(
        Quartiles::from_values(&[]),
        Err(FeatureError::EmptyCorpus(_))
    ));
}

#[test]
fn test_quartile_classes() {
    let q = Quartiles::new(10.0, 20.0, 30.0);
    assert_eq!(q.class_of(5.0), 1);
    assert_eq!(q.class_of(10.0), 2);
    assert_eq!(q.class_of(25.0), 3);
    assert_eq!(q.class_of(30.0), 4);
    assert_eq!(q.class_of(1e9), 4);
}

#[test]
fn test_local_quartiles_uses_sample_name() {
    let list = table::from_reader(Cursor::new("#,m/z,Retention Time (min)\n"), "empty").unwrap();
    match list.local_quartiles().unwrap_err() {
        FeatureError::EmptyCorpus(name) => assert_eq!(name, "empty"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_directory_scan_skips_hidden_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.xml"), SMALL_APML).unwrap();
    let mut f = std::fs::File::create(dir.path().join("a.csv")).unwrap();
    writeln!(f, "#,m/z,Retention Time (min),AREA").unwrap();
    writeln!(f, "1,400.5,10.5,3").unwrap();
    std::fs::write(dir.path().join(".hidden.xml"), "not xml at all").unwrap();

    let files = scan::sample_files(dir.path()).unwrap();
    let names: Vec<String> = files.iter().map(|p| sample_name(p)).collect();
    assert_eq!(names, vec!["a", "b"]);

    let values = scan::directory_intensities(dir.path()).unwrap();
    assert_eq!(values, vec![3.0, 750.0, 12.5]);

    let q = Quartiles::from_directory(dir.path()).unwrap();
    assert!((q.q2 - 12.5).abs() < 1e-12);
}

#[test]
fn test_directory_scan_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.xml"), SMALL_APML).unwrap();
    std::fs::write(dir.path().join("b.txt"), "notes").unwrap();

    match scan::directory_intensities(dir.path()).unwrap_err() {
        FeatureError::InFile { path, source } => {
            assert!(path.ends_with("b.txt"));
            assert!(matches!(*source, FeatureError::Format(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_enclosing_bounds() {
    let features = vec![
        Feature::parse("3.5", "100.25", 1.0).unwrap(),
        Feature::parse("1.25", "300", 1.0).unwrap(),
    ];
    let bounds = RunBounds::enclosing(&features).unwrap();
    assert_eq!(bounds.tr_min.to_string(), "1.25");
    assert_eq!(bounds.tr_max.to_string(), "3.5");
    assert_eq!(bounds.mz_min.to_string(), "100.25");
    assert_eq!(bounds.mz_max.to_string(), "300");
    assert!(RunBounds::enclosing(&[]).is_none());
}
