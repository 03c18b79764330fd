use dotex_core::{ColorValue, Phase, SpecViolation, StandardPhase, StimulusError};
use dotex_experiment::{
    ColorChoice, ExperimentConfig, ExperimentError, ExperimentEvent, ExperimentStateMachine,
    LayoutMode,
};
use dotex_layout::LayoutStrategy;
use dotex_timing::{DurationStats, Timer};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Clock that only moves when told to.
#[derive(Clone, Default)]
struct ManualTimer {
    now_ns: Arc<AtomicU64>,
}

impl ManualTimer {
    fn advance(&self, d: Duration) {
        self.now_ns.fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Timer for ManualTimer {
    type Timestamp = u64;
    fn now(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }
    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }
    fn record_frame(&mut self, _d: Duration) {}
    fn stats(&self) -> DurationStats {
        DurationStats::default()
    }
}

type Machine = ExperimentStateMachine<StandardPhase, ManualTimer, StdRng>;

fn machine(config: ExperimentConfig, seed: u64) -> (Machine, ManualTimer) {
    let timer = ManualTimer::default();
    let m = Machine::new(config, timer.clone(), StdRng::seed_from_u64(seed)).unwrap();
    (m, timer)
}

fn words(ws: &[&str]) -> Vec<String> {
    ws.iter().map(|w| w.to_string()).collect()
}

#[test]
fn full_session_records_every_planned_stimulus() {
    let (mut m, clock) = machine(ExperimentConfig::default(), 4);
    assert_eq!(m.planned().count(), 26);

    assert!(!m.handle_event(ExperimentEvent::ResponseReceived(words(&["hi"]))));
    assert!(m.handle_event(ExperimentEvent::Continue));
    assert_eq!(*m.current_phase(), StandardPhase::Instructions);
    assert!(m.handle_event(ExperimentEvent::Continue));
    assert_eq!(*m.current_phase(), StandardPhase::ObjectTrial);
    assert_eq!(m.trial_progress(), Some((1, 26)));

    // Trials need an actual answer.
    assert!(!m.handle_event(ExperimentEvent::Continue));
    assert!(!m.handle_event(ExperimentEvent::ResponseReceived(words(&["", "  "]))));
    assert_eq!(m.trial_progress(), Some((1, 26)));

    let planned: Vec<_> = m.planned().cloned().collect();
    for (i, stim) in planned.iter().enumerate() {
        assert_eq!(m.current_stimulus(), Some(stim));
        let spec = m.current_spec().unwrap();
        assert_eq!(spec.total_count(), stim.n_total);
        assert_eq!(spec.target_color(), stim.color_target.color);
        clock.advance(Duration::from_millis(1_500));
        assert!(m.handle_event(ExperimentEvent::ResponseReceived(words(&[
            "a few", "", ""
        ]))));
        assert_eq!(m.results().len(), i + 1);
    }

    assert_eq!(*m.current_phase(), StandardPhase::SubjectInfo);
    assert!(m.current.is_none());
    // Intro is slide 0 and the instructions slide 1, so trials start at 2.
    assert_eq!(m.slide_number, 28);
    for (i, result) in m.results().iter().enumerate() {
        assert_eq!(result.slide_number, i + 2);
        assert_eq!(result.rt_ms, 1_500);
        assert_eq!(result.n_total, planned[i].n_total);
        assert_eq!(result.n_target, planned[i].n_target);
        assert_eq!(result.color_target, planned[i].color_target.word);
        assert_ne!(result.color_target, result.color_other);
    }

    assert!(m.handle_event(ExperimentEvent::ResponseReceived(words(&["29", "english"]))));
    assert!(m.is_complete());
    assert_eq!(m.slide_number, 29);
    assert!(!m.is_awaiting_input());
    assert!(!m.handle_event(ExperimentEvent::Continue));
    assert!(!m.handle_event(ExperimentEvent::PhaseComplete));

    m.set_screen(1920, 1080);
    let record = m.session_record();
    assert_eq!(record.trials.len(), 26);
    assert!(record.catch_trials.is_empty());
    assert_eq!(record.condition, "");
    assert_eq!(record.system.os, std::env::consts::OS);
    assert_eq!(
        (record.system.screen_width, record.system.screen_height),
        (1920, 1080)
    );
    assert_eq!(
        (record.system.canvas_width, record.system.canvas_height),
        (600, 400)
    );
    assert_eq!(record.subject_information, ["29", "english"]);
    assert_eq!(record.experiment_id, "dot-norming");
    assert!((record.time_in_minutes - 26.0 * 1.5 / 60.0).abs() < 1e-9);
}

#[test]
fn same_seed_same_plan() {
    let (a, _) = machine(ExperimentConfig::default(), 9);
    let (b, _) = machine(ExperimentConfig::default(), 9);
    assert!(a.planned().eq(b.planned()));
}

#[test]
fn empty_plan_skips_trial_phase() {
    let config = ExperimentConfig {
        totals: vec![37],
        ..ExperimentConfig::default()
    };
    let (mut m, _) = machine(config, 1);
    assert_eq!(m.planned().count(), 0);
    m.handle_event(ExperimentEvent::Continue);
    assert!(m.handle_event(ExperimentEvent::Continue));
    assert_eq!(*m.current_phase(), StandardPhase::SubjectInfo);
    assert_eq!(m.slide_number, 2);
    assert!(m.current.is_none());
}

#[test]
fn identical_colors_fail_before_the_session_starts() {
    let config = ExperimentConfig {
        colors: [
            ColorChoice::new(ColorValue::BLACK, "black"),
            ColorChoice::new(ColorValue::BLACK, "also black"),
        ],
        ..ExperimentConfig::default()
    };
    let result = Machine::new(config, ManualTimer::default(), StdRng::seed_from_u64(0));
    assert!(matches!(
        result.err(),
        Some(ExperimentError::Stimulus(StimulusError::InvalidSpec(
            SpecViolation::IdenticalColors(_)
        )))
    ));
}

#[test]
fn layout_strategy_follows_config() {
    let (mut m, _) = machine(ExperimentConfig::default(), 2);
    assert_eq!(m.layout_strategy(), None);
    m.handle_event(ExperimentEvent::Continue);
    m.handle_event(ExperimentEvent::Continue);
    let total = m.current_spec().unwrap().total_count();
    assert_eq!(m.layout_strategy(), Some(LayoutStrategy::select(total)));

    let config = ExperimentConfig {
        layout: LayoutMode::RejectionSampling,
        ..ExperimentConfig::default()
    };
    let (mut m, _) = machine(config, 2);
    m.handle_event(ExperimentEvent::Continue);
    m.handle_event(ExperimentEvent::Continue);
    assert!(matches!(
        m.layout_strategy(),
        Some(LayoutStrategy::RejectionSampling(_))
    ));
}

#[test]
fn phase_complete_skips_ahead() {
    let (mut m, _) = machine(ExperimentConfig::default(), 3);
    assert!(m.handle_event(ExperimentEvent::PhaseComplete));
    assert!(m.handle_event(ExperimentEvent::PhaseComplete));
    assert!(m.current_phase().presents_stimuli());
    assert!(m.handle_event(ExperimentEvent::PhaseComplete));
    assert_eq!(*m.current_phase(), StandardPhase::SubjectInfo);
}
