// Copyright 2025 the CGM Hotspot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for whole command streams through the public interpreter API.

use cgm_hotspot::{
    Command, Continuity, Error, GroupIndex, Interpreter, Options, PolyBezier, RecordedEvent,
    RecordingSink, RestrictedText, interpret,
};
use kurbo::{Point, Rect, Size, Vec2};
use peniko::color::palette::css;

fn curve(x: f64) -> Command {
    Command::CurveSegment(PolyBezier::new(
        Continuity::Continuous,
        [
            Point::new(x, 0.0),
            Point::new(x + 1.0, 2.0),
            Point::new(x + 2.0, 2.0),
            Point::new(x + 3.0, 0.0),
        ],
    ))
}

fn label(text: &str, x: f64) -> Command {
    Command::RestrictedText(RestrictedText {
        position: Point::new(x, 20.0),
        extent: Size::new(30.0, 40.0),
        text: text.into(),
        offset: Vec2::new(5.0, 10.0),
    })
}

/// A stream shaped like a typical illustrated parts drawing.
fn drawing() -> Vec<Command> {
    vec![
        Command::VdcExtent(Rect::new(0.0, 0.0, 1000.0, 800.0)),
        Command::BeginGroup("pump".into()),
        Command::BeginGroupBody,
        Command::FillColor(css::RED),
        Command::EdgeWidth(0.5),
        Command::BeginFigure,
        curve(0.0),
        curve(3.0),
        curve(6.0),
        Command::EndFigure,
        Command::BeginGroup("bolt".into()),
        Command::FillColor(css::GRAY),
        curve(100.0),
        label("PN-17", 100.0),
        Command::EndGroup,
        label("PN-18", 200.0),
        Command::EndGroup,
        label("title", 300.0),
    ]
}

#[test]
fn balanced_stream_leaves_no_open_scope() {
    let mut sink = RecordingSink::default();
    let state = interpret(&drawing(), &Options::with_hot_spots(), &mut sink).unwrap();
    assert!(state.groups().is_empty());
    assert_eq!(state.current_figure(), None);
    assert_eq!(state.pending_shapes(), 0);
}

#[test]
fn overlays_take_owner_from_innermost_group_or_text() {
    let mut sink = RecordingSink::default();
    interpret(&drawing(), &Options::with_hot_spots(), &mut sink).unwrap();

    let owners: Vec<_> = sink
        .overlays()
        .map(|hs| (hs.id.as_str(), hs.group_id.as_str(), hs.label.as_str()))
        .collect();
    assert_eq!(
        owners,
        [
            ("rt_0", "bolt", "PN-17"),
            ("rt_1", "pump", "PN-18"),
            ("rt_2", "title", "title"),
        ]
    );
}

#[test]
fn group_only_option_drops_free_text_overlay() {
    let mut sink = RecordingSink::default();
    let options = Options {
        hot_spot_in_application_structure_only: true,
        ..Options::with_hot_spots()
    };
    let state = interpret(&drawing(), &options, &mut sink).unwrap();
    assert_eq!(sink.overlays().count(), 2);
    // Every text is counted, only the emitted overlays are reported as such.
    assert_eq!(state.text_counter(), 3);
    assert_eq!(state.overlay_count(), 2);
    // The free-standing text is still painted.
    let texts = sink
        .forwarded()
        .filter(|c| matches!(c, Command::RestrictedText(_)))
        .count();
    assert_eq!(texts, 3);
}

#[test]
fn merged_figure_carries_group_fill_and_edge_width() {
    let mut sink = RecordingSink::default();
    interpret(&drawing(), &Options::default(), &mut sink).unwrap();

    let shapes: Vec<_> = sink
        .events()
        .iter()
        .filter_map(|e| match e {
            RecordedEvent::Shape { shape, paint, .. } => Some((shape.subpath_count(), *paint)),
            _ => None,
        })
        .collect();
    assert_eq!(shapes.len(), 2);
    assert_eq!(shapes[0].0, 3);
    assert_eq!(shapes[0].1.fill, Some(css::RED));
    assert_eq!(shapes[0].1.edge_width, Some(0.5));
    // The nested group starts without attributes of its own.
    assert_eq!(shapes[1].1.fill, Some(css::GRAY));
    assert_eq!(shapes[1].1.edge_width, None);
}

#[test]
fn groups_are_numbered_in_begin_order() {
    let mut sink = RecordingSink::default();
    let mut interpreter = Interpreter::new(&Options::default()).unwrap();
    let commands = [
        Command::BeginGroup("pump".into()),
        Command::BeginGroup("bolt".into()),
        Command::EndGroup,
        // Identifiers may repeat; the index still tells the groups apart.
        Command::BeginGroup("bolt".into()),
    ];
    for command in &commands {
        interpreter.step(command, &mut sink).unwrap();
    }
    let indices: Vec<_> = interpreter
        .state()
        .groups()
        .iter()
        .map(|g| (g.identifier().to_owned(), g.index()))
        .collect();
    assert_eq!(
        indices,
        [
            ("pump".to_owned(), GroupIndex(0)),
            ("bolt".to_owned(), GroupIndex(2)),
        ]
    );
}

#[test]
fn step_by_step_matches_batch() {
    let commands = drawing();
    let options = Options::with_hot_spots();

    let mut batch = RecordingSink::default();
    interpret(&commands, &options, &mut batch).unwrap();

    let mut stepped = RecordingSink::default();
    let mut interpreter = Interpreter::new(&options).unwrap();
    for command in &commands {
        interpreter.step(command, &mut stepped).unwrap();
    }
    let state = interpreter.finish();

    assert_eq!(batch.events(), stepped.events());
    assert_eq!(state.text_counter(), 3);
}

#[test]
fn malformed_stream_reports_position_and_stops() {
    let mut commands = drawing();
    let end = commands.len();
    commands.push(Command::EndGroup);
    commands.push(label("after", 0.0));

    let mut sink = RecordingSink::default();
    let err = interpret(&commands, &Options::with_hot_spots(), &mut sink).unwrap_err();
    match err {
        Error::MalformedStream { index } => assert_eq!(index, end),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(sink.overlays().count(), 3);
}

#[test]
fn error_display_names_the_command() {
    let err = Error::MalformedStream { index: 4 };
    assert_eq!(
        err.to_string(),
        "malformed command stream: end of group at command 4 has no open group"
    );
}
