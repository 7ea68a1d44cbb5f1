//! Audio Graph Lifecycle Tests
//!
//! Graph construction order, mirroring of committed values and
//! guaranteed release on every exit path.

mod common;

use common::{GraphEvent, RecordingEngine, events_of, releases};
use peq_core::{EqConfig, EqError};
use peq_dsp::{FilterChain, FilterStage};
use peq_engine::{AudioGraph, EqSession, StageEdit};

const SAMPLE_RATE: f64 = 48000.0;

fn default_chain() -> FilterChain {
    FilterChain::from_config(&EqConfig::default()).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════════
// BIND
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_bind_builds_series_chain() {
    let (engine, log) = RecordingEngine::new(SAMPLE_RATE);
    let chain = default_chain();
    let graph = AudioGraph::bind(engine, &chain).unwrap();
    assert_eq!(graph.handle_count(), 4);
    assert_eq!(graph.sample_rate(), SAMPLE_RATE);

    let expected = vec![
        GraphEvent::Create(0, FilterStage::peaking(60.0, 0.0, 0.1)),
        GraphEvent::Create(1, FilterStage::peaking(1000.0, 0.0, 0.1)),
        GraphEvent::Create(2, FilterStage::peaking(3500.0, 0.0, 0.1)),
        GraphEvent::Create(3, FilterStage::peaking(10000.0, 0.0, 0.1)),
        GraphEvent::ConnectSource(0),
        GraphEvent::Connect(0, 1),
        GraphEvent::Connect(1, 2),
        GraphEvent::Connect(2, 3),
        GraphEvent::ConnectDestination(3),
        GraphEvent::Start,
    ];
    assert_eq!(events_of(&log), expected);
}

#[test]
fn test_refused_start_is_not_fatal() {
    let (mut engine, log) = RecordingEngine::new(SAMPLE_RATE);
    engine.refuse_start = true;
    let graph = AudioGraph::bind(engine, &default_chain());
    assert!(graph.is_ok());
    assert_eq!(events_of(&log).last(), Some(&GraphEvent::Start));
}

#[test]
fn test_invalid_sample_rate_rejected() {
    for rate in [0.0, -44100.0, f64::NAN, 32000.0, 40000.0] {
        let (engine, log) = RecordingEngine::new(rate);
        let err = AudioGraph::bind(engine, &default_chain()).err();
        assert!(
            matches!(err, Some(EqError::InvalidParameter(_))),
            "rate {rate} accepted"
        );
        assert_eq!(events_of(&log), vec![GraphEvent::Close]);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TEARDOWN
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_drop_releases_all_handles() {
    let (engine, log) = RecordingEngine::new(SAMPLE_RATE);
    let graph = AudioGraph::bind(engine, &default_chain()).unwrap();
    drop(graph);

    assert_eq!(releases(&log), vec![3, 2, 1, 0]);
    assert_eq!(events_of(&log).last(), Some(&GraphEvent::Close));
}

#[test]
fn test_failed_bind_releases_partial_graph() {
    let (mut engine, log) = RecordingEngine::new(SAMPLE_RATE);
    engine.fail_create_at = Some(2);
    let err = AudioGraph::bind(engine, &default_chain()).err();
    assert!(matches!(err, Some(EqError::Engine(_))));

    assert_eq!(releases(&log), vec![1, 0]);
    assert_eq!(events_of(&log).last(), Some(&GraphEvent::Close));
}

#[test]
fn test_session_unbind_and_drop_release() {
    let mut session: EqSession<RecordingEngine> = EqSession::new(&EqConfig::default()).unwrap();
    assert!(!session.unbind());

    let (engine, first) = RecordingEngine::new(SAMPLE_RATE);
    session.bind(engine).unwrap();
    assert!(session.is_bound());
    assert!(session.unbind());
    assert!(!session.is_bound());
    assert_eq!(releases(&first), vec![3, 2, 1, 0]);

    let (engine, second) = RecordingEngine::new(SAMPLE_RATE);
    session.bind(engine).unwrap();
    drop(session);
    assert_eq!(releases(&second), vec![3, 2, 1, 0]);
    assert_eq!(events_of(&second).last(), Some(&GraphEvent::Close));
}

#[test]
fn test_rebind_releases_previous_graph_first() {
    let mut session: EqSession<RecordingEngine> = EqSession::new(&EqConfig::default()).unwrap();
    let (engine, first) = RecordingEngine::new(SAMPLE_RATE);
    session.bind(engine).unwrap();

    let (engine, second) = RecordingEngine::new(44100.0);
    session.bind(engine).unwrap();
    assert_eq!(releases(&first), vec![3, 2, 1, 0]);
    assert!(releases(&second).is_empty());
    assert_eq!(session.sample_rate(), Some(44100.0));
}

// ═══════════════════════════════════════════════════════════════════════════════
// MIRRORING
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_edits_are_mirrored_as_whole_stages() {
    let mut session: EqSession<RecordingEngine> = EqSession::new(&EqConfig::default()).unwrap();
    let (engine, log) = RecordingEngine::new(SAMPLE_RATE);
    session.bind(engine).unwrap();
    log.lock().clear();

    session
        .update_parameter(1, StageEdit::new().gain(40.0), false)
        .unwrap();
    session
        .update_parameter(1, StageEdit::new().frequency(1200.0), true)
        .unwrap();

    assert_eq!(
        events_of(&log),
        vec![
            GraphEvent::Update(1, FilterStage::peaking(1000.0, 12.0, 0.1)),
            GraphEvent::Update(1, FilterStage::peaking(1200.0, 12.0, 0.1)),
        ]
    );
}

#[test]
fn test_rejected_edit_is_not_mirrored() {
    let mut session: EqSession<RecordingEngine> = EqSession::new(&EqConfig::default()).unwrap();
    let (engine, log) = RecordingEngine::new(SAMPLE_RATE);
    session.bind(engine).unwrap();
    log.lock().clear();

    assert!(session.update_parameter(7, StageEdit::new().gain(3.0), true).is_err());
    assert!(session.update_parameter(0, StageEdit::new().q(f64::NAN), true).is_err());
    assert!(events_of(&log).is_empty());
}

#[test]
fn test_edits_while_unbound_reach_next_graph() {
    let mut session: EqSession<RecordingEngine> = EqSession::new(&EqConfig::default()).unwrap();
    session
        .update_parameter(2, StageEdit::new().gain(-6.0), true)
        .unwrap();

    let (engine, log) = RecordingEngine::new(SAMPLE_RATE);
    session.bind(engine).unwrap();
    assert!(events_of(&log).contains(&GraphEvent::Create(
        2,
        FilterStage::peaking(3500.0, -6.0, 0.1)
    )));
}

#[test]
fn test_resume_swallows_refusal() {
    let mut session: EqSession<RecordingEngine> = EqSession::new(&EqConfig::default()).unwrap();
    assert!(matches!(session.resume(), Err(EqError::NotReady(_))));

    let (mut engine, log) = RecordingEngine::new(SAMPLE_RATE);
    engine.refuse_resume = true;
    session.bind(engine).unwrap();
    assert!(session.resume().is_ok());
    assert_eq!(events_of(&log).last(), Some(&GraphEvent::Resume));
}

#[test]
fn test_suspend_reaches_engine() {
    let mut session: EqSession<RecordingEngine> = EqSession::new(&EqConfig::default()).unwrap();
    let (engine, log) = RecordingEngine::new(SAMPLE_RATE);
    session.bind(engine).unwrap();
    log.lock().clear();

    session.suspend().unwrap();
    session.resume().unwrap();
    assert_eq!(events_of(&log), vec![GraphEvent::Suspend, GraphEvent::Resume]);
    assert!(releases(&log).is_empty());
}
