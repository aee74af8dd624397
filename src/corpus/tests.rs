use super::*;
use std::fs;

fn apml(features: &[(&str, &str, f64)]) -> String {
    let body: String = features
        .iter()
        .map(|(rt, mz, area)| {
            format!("<MS1_FEATURE Tr=\"{rt}\" m_z=\"{mz}\"><LC_INFO AREA=\"{area}\"/></MS1_FEATURE>\n")
        })
        .collect();
    format!(
        "<LC_MS_RUN number_of_features=\"{}\" tr_min=\"0\" tr_max=\"1.0\" m_z_min=\"100\" m_z_max=\"101.0\">\n\
         <LC_MS_FEATURES>\n{body}</LC_MS_FEATURES>\n</LC_MS_RUN>\n",
        features.len()
    )
}

fn corpus_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("beta.xml"),
        apml(&[("0.1", "100.1", 1.0), ("0.2", "100.2", 2.0)]),
    )
    .unwrap();
    fs::write(
        dir.path().join("alpha.xml"),
        apml(&[("0.3", "100.3", 3.0), ("0.4", "100.4", 4.0)]),
    )
    .unwrap();
    dir
}

#[test]
fn test_load_sorts_by_name() {
    let dir = corpus_dir();
    fs::write(dir.path().join(".hidden"), "ignored").unwrap();
    let corpus = Corpus::load(dir.path()).unwrap();
    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus.names().collect::<Vec<_>>(), vec!["alpha", "beta"]);
    assert_eq!(corpus.feature_count(), 4);
}

#[test]
fn test_unsupported_sibling_fails_load() {
    let dir = corpus_dir();
    fs::write(dir.path().join("README.md"), "not a sample").unwrap();
    match Corpus::load(dir.path()) {
        Err(CorpusError::Feature(FeatureError::InFile { path, source })) => {
            assert!(path.ends_with("README.md"));
            assert!(matches!(*source, FeatureError::Format(_)));
        }
        other => panic!("expected a format error, got {other:?}"),
    }
    assert!(Quartiles::from_directory(dir.path()).is_err());
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".DS_Store"), "x").unwrap();
    assert!(matches!(Corpus::load(dir.path()), Err(CorpusError::Empty(_))));
}

#[test]
fn test_malformed_sample_fails_load() {
    let dir = corpus_dir();
    fs::write(dir.path().join("gamma.xml"), "<LC_MS_RUN").unwrap();
    assert!(matches!(
        Corpus::load(dir.path()),
        Err(CorpusError::Feature(FeatureError::InFile { .. }))
    ));
}

#[test]
fn test_global_quartiles_are_cached() {
    let corpus = Corpus::load(corpus_dir().path()).unwrap();
    let q = corpus.global_quartiles().unwrap();
    assert_eq!(q, Quartiles::new(1.75, 2.5, 3.25));
    assert!(corpus.global_quartiles.get().is_some());
    assert_eq!(corpus.global_quartiles().unwrap(), q);
}

#[test]
fn test_build_maps_global_vs_local() {
    let corpus = Corpus::load(corpus_dir().path()).unwrap();

    let global = corpus.build_maps(MapMode::Quartile(QuartileScope::Global)).unwrap();
    assert_eq!(global[0].name(), "alpha");
    let alpha: Vec<f64> = global[0].cells().iter().map(|c| c.value).collect();
    let beta: Vec<f64> = global[1].cells().iter().map(|c| c.value).collect();
    assert_eq!(alpha, vec![3.0, 4.0]);
    assert_eq!(beta, vec![1.0, 2.0]);

    // each sample against its own cut points
    let local = corpus.build_maps(MapMode::Quartile(QuartileScope::Local)).unwrap();
    let alpha: Vec<f64> = local[0].cells().iter().map(|c| c.value).collect();
    assert_eq!(alpha, vec![1.0, 4.0]);
}

#[test]
fn test_build_binary_maps() {
    let corpus = Corpus::load(corpus_dir().path()).unwrap();
    let maps = corpus.build_maps(MapMode::Binary).unwrap();
    assert_eq!(maps.len(), 2);
    assert_eq!(maps[1].get(1, 1).unwrap(), 1.0);
    assert_eq!(maps[1].get(2, 2).unwrap(), 1.0);
}

#[test]
fn test_empty_corpus_has_no_quartiles() {
    let corpus = Corpus::from_lists(Vec::new());
    assert!(corpus.global_quartiles().is_err());
    assert!(corpus.build_maps(MapMode::Binary).unwrap().is_empty());
}
