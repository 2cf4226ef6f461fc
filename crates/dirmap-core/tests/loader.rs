use dirmap_core::loader::LoadedData;
use dirmap_core::prelude::*;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;

const FILMS: &str = r#"[
    {"director_name":"Chantal Akerman","birthplace":"Brussels, Belgium","film_title":"Jeanne Dielman"},
    null,
    {"director_name":"Agnès Varda","birthplace":"Ixelles, Belgium"}
]"#;

#[test]
fn reads_user_file_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("akerman.json"), FILMS).unwrap();

    let source = DirSource::new(dir.path(), InputFormat::Films);
    match source.fetch("akerman").unwrap() {
        LoadedData::Films(records) => {
            assert_eq!(records.len(), 3);
            assert!(records[1].is_none());
            assert_eq!(records[2].as_ref().unwrap().film_title, None);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn falls_back_to_gzip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("varda.json.gz");
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(FILMS.as_bytes()).unwrap();
    fs::write(&path, enc.finish().unwrap()).unwrap();

    let source = DirSource::new(dir.path(), InputFormat::Films);
    assert_eq!(source.path_for("varda"), path);
    assert!(matches!(source.fetch("varda").unwrap(), LoadedData::Films(r) if r.len() == 3));
}

#[test]
fn missing_file_is_a_fetch_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = DirSource::new(dir.path(), InputFormat::Films);
    let err = source.fetch("nobody").unwrap_err();
    assert!(matches!(err, MapError::Fetch(_)));
    assert!(err.to_string().starts_with("Could not find data file:"));
}

#[test]
fn empty_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("null.json"), "null").unwrap();
    fs::write(dir.path().join("obj.json"), r#"{"films":[]}"#).unwrap();
    fs::write(dir.path().join("broken.json"), "[{").unwrap();

    let source = DirSource::new(dir.path(), InputFormat::Films);
    assert!(matches!(source.fetch("null"), Err(MapError::Data(_))));
    assert!(matches!(source.fetch("obj"), Err(MapError::Data(_))));
    assert!(matches!(source.fetch("broken"), Err(MapError::Json(_))));
}

#[test]
fn full_load_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("akerman.json"), FILMS).unwrap();

    let source = DirSource::new(dir.path(), InputFormat::Films);
    let mut geocoder = |q: &str| -> Result<Vec<Candidate>> {
        Ok(match q {
            "Brussels, Belgium" => vec![Candidate { x: 4.35, y: 50.85 }],
            _ => vec![],
        })
    };
    let mut pipeline = Pipeline::new(&mut geocoder);
    let mut session = MapSession::default();
    let stats = pipeline
        .run(Some("akerman"), &source, &mut session, &mut NullReporter)
        .unwrap();

    assert_eq!((stats.total, stats.processed, stats.plotted), (2, 2, 1));
    let marker = session.markers().iter().next().unwrap();
    assert!(marker.popup_html.contains("<li>Jeanne Dielman</li>"));
}
