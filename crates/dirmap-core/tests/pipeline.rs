use dirmap_core::loader::LoadedData;
use dirmap_core::prelude::*;
use dirmap_core::PipelineStats;
use std::collections::HashMap;

/// Answers from a fixed table and records every query it was asked.
#[derive(Default)]
struct TableGeocoder {
    answers: HashMap<String, (f64, f64)>,
    queries: Vec<String>,
}

impl TableGeocoder {
    fn with(mut self, query: &str, lat: f64, lon: f64) -> Self {
        self.answers.insert(query.to_owned(), (lat, lon));
        self
    }
}

impl Geocoder for TableGeocoder {
    fn search(&mut self, query: &str) -> Result<Vec<Candidate>> {
        self.queries.push(query.to_owned());
        Ok(self
            .answers
            .get(query)
            .map(|&(lat, lon)| vec![Candidate { x: lon, y: lat }])
            .unwrap_or_default())
    }
}

struct FixedSource(Result<LoadedData>);

impl DataSource for FixedSource {
    fn fetch(&self, _user: &str) -> Result<LoadedData> {
        match &self.0 {
            Ok(data) => Ok(data.clone()),
            Err(e) => Err(MapError::Fetch(e.to_string())),
        }
    }
}

fn rec(d: &str, b: &str, t: &str) -> Option<FilmRecord> {
    Some(FilmRecord::new(d, b, t))
}

#[test]
fn groups_by_birthplace_and_geocodes_cleaned_labels() {
    let records = vec![
        rec("A", "Paris", "X"),
        rec("A", "Paris", "W"),
        rec("B", "[1] London", "Y"),
    ];
    let geocoder = TableGeocoder::default()
        .with("Paris", 48.85, 2.35)
        .with("London", 51.5, -0.12);
    let mut pipeline = Pipeline::new(geocoder);
    let mut session = MapSession::default();

    let mut events = Vec::new();
    let mut reporter = |e: &StatusEvent<'_>| events.push(e.to_string());
    let stats = pipeline
        .run_records(&records, &mut session, &mut reporter)
        .unwrap();

    assert_eq!(
        stats,
        PipelineStats {
            total: 2,
            processed: 2,
            plotted: 2
        }
    );
    assert_eq!(pipeline.geocoder().queries, vec!["Paris", "London"]);
    assert_eq!(pipeline.state(), &LoadState::Complete(stats));

    let markers: Vec<_> = session.markers().iter().collect();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].location.raw_label, "Paris");
    assert_eq!(
        markers[0].popup_html,
        "<h3>Paris</h3><hr><h4>A</h4><ul><li>W</li><li>X</li></ul>"
    );
    assert_eq!(markers[1].location.raw_label, "[1] London");
    assert_eq!(markers[1].location.lat, 51.5);
    assert_eq!(markers[1].location.lon, -0.12);
    assert_eq!(markers[1].directors, vec!["B"]);

    assert_eq!(
        events,
        vec![
            "Added: Paris (1/2)",
            "Added: [1] London (2/2)",
            "Complete! Plotted 2 of 2 locations.",
        ]
    );
}

#[test]
fn a_miss_counts_as_processed_but_not_plotted() {
    let records = vec![rec("A", "Atlantis", "X"), rec("B", "Rome", "Y")];
    let geocoder = TableGeocoder::default().with("Rome", 41.9, 12.5);
    let mut pipeline = Pipeline::new(geocoder);
    let mut session = MapSession::default();

    let mut events = Vec::new();
    let mut reporter = |e: &StatusEvent<'_>| events.push(e.to_string());
    let stats = pipeline
        .run_records(&records, &mut session, &mut reporter)
        .unwrap();

    assert_eq!(stats.processed, 2);
    assert_eq!(stats.plotted, 1);
    assert_eq!(session.markers().len(), 1);
    assert_eq!(events[0], "Skipping: Atlantis (1/2)");
    assert_eq!(events[2], "Complete! Plotted 1 of 2 locations.");
}

#[test]
fn geocoder_errors_do_not_abort_the_load() {
    let records = vec![rec("A", "Paris", "X"), rec("B", "Rome", "Y")];
    let mut geocoder = |q: &str| -> Result<Vec<Candidate>> {
        if q == "Paris" {
            Err(MapError::Fetch("connection reset".into()))
        } else {
            Ok(vec![Candidate { x: 12.5, y: 41.9 }])
        }
    };
    let mut pipeline = Pipeline::new(&mut geocoder);
    let mut session = MapSession::default();
    let stats = pipeline
        .run_records(&records, &mut session, &mut NullReporter)
        .unwrap();
    assert_eq!((stats.processed, stats.plotted), (2, 1));
}

#[test]
fn empty_cleaned_label_is_never_geocoded() {
    let records = vec![rec("A", "[unknown]", "X"), rec("B", "USSR", "Y"), rec("C", "Oslo", "Z")];
    let geocoder = TableGeocoder::default().with("Oslo", 59.9, 10.7);
    let mut pipeline = Pipeline::new(geocoder);
    let mut session = MapSession::default();

    let mut events = Vec::new();
    let mut reporter = |e: &StatusEvent<'_>| events.push(e.to_string());
    let stats = pipeline
        .run_records(&records, &mut session, &mut reporter)
        .unwrap();

    assert_eq!(pipeline.geocoder().queries, vec!["Oslo"]);
    assert_eq!(stats.processed, 3);
    assert_eq!(stats.plotted, 1);
    assert_eq!(
        events,
        vec!["Added: Oslo (3/3)", "Complete! Plotted 1 of 3 locations."]
    );
}

#[test]
fn circles_follow_zoom_after_plotting() {
    let records = vec![
        rec("A", "Paris", "X"),
        rec("B", "Rome", "Y"),
        rec("C", "Oslo", "Z"),
    ];
    let geocoder = TableGeocoder::default()
        .with("Paris", 48.85, 2.35)
        .with("Rome", 41.9, 12.5)
        .with("Oslo", 59.9, 10.7);
    let mut pipeline = Pipeline::new(geocoder);
    let mut session = MapSession::new((20.0, 0.0), 3.0);
    pipeline
        .run_records(&records, &mut session, &mut NullReporter)
        .unwrap();

    assert!(session.markers().iter().all(|m| m.radius == Some(150_000.0)));
    session.set_zoom(7.0);
    assert!(session.markers().iter().all(|m| m.radius == Some(10_000.0)));
}

#[test]
fn pins_carry_no_radius() {
    let records = vec![rec("A", "Paris", "X")];
    let geocoder = TableGeocoder::default().with("Paris", 48.85, 2.35);
    let mut pipeline = Pipeline::new(geocoder).with_style(MarkerStyle::Pin);
    let mut session = MapSession::default();
    pipeline
        .run_records(&records, &mut session, &mut NullReporter)
        .unwrap();
    session.set_zoom(9.0);
    assert!(session.markers().iter().all(|m| m.radius.is_none()));
}

#[test]
fn no_usable_records_fails_without_geocoding() {
    let records = vec![None, Some(FilmRecord::default()), rec("", "Paris", "X")];
    let mut pipeline = Pipeline::new(TableGeocoder::default());
    let mut session = MapSession::default();

    let mut events = Vec::new();
    let mut reporter = |e: &StatusEvent<'_>| events.push(e.to_string());
    let err = pipeline
        .run_records(&records, &mut session, &mut reporter)
        .unwrap_err();

    assert!(matches!(err, MapError::Data(_)));
    assert!(matches!(pipeline.state(), LoadState::Failed(_)));
    assert!(pipeline.geocoder().queries.is_empty());
    assert!(session.markers().is_empty());
    assert_eq!(
        events,
        vec!["Error: Data file contains no usable film records."]
    );
}

#[test]
fn fetch_error_moves_to_failed() {
    let source = FixedSource(Err(MapError::Fetch(
        "Could not find data file: ghost.json".into(),
    )));
    let mut pipeline = Pipeline::new(TableGeocoder::default());
    let mut session = MapSession::default();

    let mut events = Vec::new();
    let mut reporter = |e: &StatusEvent<'_>| events.push(e.to_string());
    let err = pipeline
        .run(Some("ghost"), &source, &mut session, &mut reporter)
        .unwrap_err();

    assert!(matches!(err, MapError::Fetch(_)));
    assert_eq!(
        pipeline.state(),
        &LoadState::Failed("Could not find data file: ghost.json".into())
    );
    assert_eq!(
        events,
        vec![
            "Loading data for ghost...",
            "Error: Could not find data file: ghost.json",
        ]
    );
}

#[test]
fn missing_user_is_a_configuration_error() {
    let source = FixedSource(Ok(LoadedData::Films(vec![rec("A", "Paris", "X")])));
    for user in [None, Some(""), Some("   ")] {
        let mut pipeline = Pipeline::new(TableGeocoder::default());
        let mut session = MapSession::default();
        let err = pipeline
            .run(user, &source, &mut session, &mut NullReporter)
            .unwrap_err();
        assert!(matches!(err, MapError::Configuration(_)));
        assert_eq!(pipeline.state(), &LoadState::Idle);
        assert!(!pipeline.state().is_terminal());
    }
}

#[test]
fn prepared_input_skips_geocoding() {
    let source = FixedSource(Ok(LoadedData::Prepared(vec![
        dirmap_core::PreparedLocation {
            lat: 35.0,
            lon: 139.0,
            popup_html: "<h3>Tokyo</h3>".into(),
            directors: vec!["Akira Kurosawa".into()],
        },
        dirmap_core::PreparedLocation {
            lat: 1.0,
            lon: 2.0,
            popup_html: String::new(),
            directors: vec![],
        },
    ])));
    let mut pipeline = Pipeline::new(TableGeocoder::default());
    let mut session = MapSession::default();

    let mut events = Vec::new();
    let mut reporter = |e: &StatusEvent<'_>| events.push(e.to_string());
    let stats = pipeline
        .run(Some("kurosawa"), &source, &mut session, &mut reporter)
        .unwrap();

    assert_eq!(stats.plotted, 2);
    assert!(pipeline.geocoder().queries.is_empty());
    assert_eq!(
        events,
        vec![
            "Loading data for kurosawa...",
            "Added: Akira Kurosawa (1/2)",
            "Added: 1.0000, 2.0000 (2/2)",
            "Complete! Plotted 2 of 2 locations.",
        ]
    );
}

#[test]
fn a_pipeline_runs_once() {
    let records = vec![rec("A", "Paris", "X")];
    let mut pipeline = Pipeline::new(TableGeocoder::default().with("Paris", 48.85, 2.35));
    let mut session = MapSession::default();
    pipeline
        .run_records(&records, &mut session, &mut NullReporter)
        .unwrap();
    assert!(pipeline.state().is_terminal());
    let again = pipeline.run_records(&records, &mut session, &mut NullReporter);
    assert!(matches!(again, Err(MapError::Configuration(_))));
    assert_eq!(session.markers().len(), 1);
}

#[test]
fn a_failed_pipeline_does_not_run_again() {
    let mut pipeline = Pipeline::new(TableGeocoder::default().with("Paris", 48.85, 2.35));
    let mut session = MapSession::default();
    pipeline
        .run_records(&[None], &mut session, &mut NullReporter)
        .unwrap_err();
    assert!(pipeline.state().is_terminal());

    let again = pipeline.run_records(&[rec("A", "Paris", "X")], &mut session, &mut NullReporter);
    assert!(matches!(again, Err(MapError::Configuration(_))));
    assert!(matches!(pipeline.state(), LoadState::Failed(_)));
    assert!(session.markers().is_empty());
}
