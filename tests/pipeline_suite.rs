use circle_points::{CircleSpec, Config, FormInput, ReportMeta, Unit, generate, parse_config};

fn assert_valid_svg(svg: &str, case: &str) {
    assert!(svg.contains("<svg"), "{case}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{case}: missing </svg tag");
}

fn run(spec: &CircleSpec) -> circle_points::Artifacts {
    let meta = ReportMeta::new("Test Author", "test@example.org", spec);
    generate(spec, &meta, &Config::default()).expect("pipeline failed")
}

#[test]
fn render_boundary_cases() {
    // Keep this list explicit so new edge cases are added intentionally.
    let cases = [
        ("default", CircleSpec::default()),
        ("min points", CircleSpec::new(0.0, 0.0, 1.0, 3)),
        ("max points", CircleSpec::new(0.0, 0.0, 1.0, 500)),
        ("zero radius", CircleSpec::new(4.0, -4.0, 0.0, 10)),
        ("scatter", CircleSpec::new(1.0, 1.0, 2.0, 24).with_line(false)),
        ("far center km", CircleSpec::new(-1250.5, 3300.0, 0.75, 40).with_unit(Unit::Km)),
        ("tiny radius", CircleSpec::new(0.0, 0.0, 1e-4, 12).with_unit(Unit::Mm)),
    ];

    for (case, spec) in cases {
        let artifacts = run(&spec);
        assert_eq!(artifacts.points.len(), spec.point_count as usize, "{case}");
        assert_valid_svg(&artifacts.svg, case);
        assert!(artifacts.pdf.starts_with(b"%PDF"), "{case}: missing pdf header");
        let csv = String::from_utf8(artifacts.csv).expect("csv is utf-8");
        assert_eq!(csv.lines().count(), spec.point_count as usize + 1, "{case}");
    }
}

#[test]
fn csv_round_trip_matches_table() {
    let spec = CircleSpec::new(3.0, -1.0, 12.5, 72).with_unit(Unit::Cm);
    let artifacts = run(&spec);
    let mut reader = csv::Reader::from_reader(artifacts.csv.as_slice());
    assert_eq!(
        reader.headers().expect("headers").iter().collect::<Vec<_>>(),
        vec!["X (cm)", "Y (cm)", "angle_deg"]
    );
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("record")).collect();
    assert_eq!(records.len(), artifacts.table.len());
    for (record, row) in records.iter().zip(&artifacts.table.rows) {
        let parsed: Vec<f64> = record.iter().map(|cell| cell.parse().expect("number")).collect();
        assert!((parsed[0] - row.x).abs() < 1e-9);
        assert!((parsed[1] - row.y).abs() < 1e-9);
        assert!((parsed[2] - row.angle_deg).abs() < 1e-9);
    }
}

#[test]
fn points_stay_on_the_circle() {
    let spec = CircleSpec::new(-7.0, 2.5, 100.0, 361);
    let artifacts = run(&spec);
    assert_eq!(artifacts.points[0].x, spec.center_x + spec.radius);
    assert_eq!(artifacts.points[0].y, spec.center_y);
    for p in &artifacts.points {
        let dist = (p.x - spec.center_x).hypot(p.y - spec.center_y);
        assert!((dist - spec.radius).abs() <= 1e-9 * spec.radius);
        assert!(p.angle_degrees < 360.0);
    }
}

#[test]
fn form_json_drives_the_whole_pipeline() {
    let form = FormInput::from_json(
        r##"{"centerX": 1, "centerY": 2, "radius": -3, "pointCount": 1000,
            "color": "#00ff00", "connectLine": false, "unit": "mm"}"##,
    )
    .expect("form json");
    let (spec, meta) = form.collect().expect("collect");
    assert_eq!(spec.radius, 0.0);
    assert_eq!(spec.point_count, 500);
    assert!(meta.parameter_summary.contains("Color: #00ff00"));

    let artifacts = generate(&spec, &meta, &Config::default()).expect("pipeline");
    assert!(artifacts.points.iter().all(|p| p.x == 1.0 && p.y == 2.0));
    assert!(!artifacts.svg.contains("series-line"));
    assert_eq!(artifacts.chart.pad, 1.0);
}

#[test]
fn config_can_close_the_polyline() {
    let config = parse_config(r#"{"chart": {"closePolyline": true}}"#).expect("config");
    let spec = CircleSpec::new(0.0, 0.0, 1.0, 6);
    let meta = ReportMeta::new("a", "b", &spec);
    let artifacts = generate(&spec, &meta, &config).expect("pipeline");
    let line = artifacts.chart.series.polyline.expect("polyline");
    assert_eq!(line.len(), 7);
    assert_eq!(line.first(), line.last());
}
