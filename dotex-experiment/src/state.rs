use crate::config::{ExperimentConfig, LayoutMode};
use crate::error::ExperimentError;
use crate::plan::{PlannedStimulus, build_plan};
use crate::session::{SessionRecord, SystemInfo};
use crate::trial::Trial;
use dotex_core::{Phase, StimulusSpec, TrialResult};
use dotex_layout::LayoutStrategy;
use dotex_timing::Timer;
use rand::Rng;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ExperimentEvent {
    /// Space on a screen that only needs acknowledging.
    Continue,
    /// Words typed for the current screen.
    ResponseReceived(Vec<String>),
    PhaseComplete,
}

pub struct ExperimentStateMachine<P, T, R>
where
    P: Phase,
    T: Timer,
    R: Rng,
{
    pub phase: P,
    pub timer: T,
    pub rng: R,
    pub config: ExperimentConfig,
    pub current: Option<Trial<T::Timestamp>>,
    pub trial_number: usize,
    pub results: Vec<TrialResult>,
    pub subject_information: Vec<String>,
    pub system: SystemInfo,
    /// Screens shown so far: 0 on the intro, +1 per later phase and per
    /// stimulus.
    pub slide_number: usize,
    schedule: Vec<(PlannedStimulus, StimulusSpec)>,
    started: T::Timestamp,
}

impl<P, T, R> ExperimentStateMachine<P, T, R>
where
    P: Phase,
    T: Timer,
    R: Rng,
{
    /// Builds and validates the whole stimulus plan up front, so a bad
    /// color pair or canvas fails here rather than mid-session.
    pub fn new(config: ExperimentConfig, timer: T, mut rng: R) -> Result<Self, ExperimentError> {
        let (width, height) = (config.canvas_width as f32, config.canvas_height as f32);
        let schedule = build_plan(&config.totals, &config.colors, &mut rng)
            .into_iter()
            .map(|stimulus| -> Result<_, ExperimentError> {
                let spec = stimulus.spec(width, height)?;
                Ok((stimulus, spec))
            })
            .collect::<Result<Vec<_>, _>>()?;
        info!(trials = schedule.len(), totals = ?config.totals, "plan built");

        let system = SystemInfo::detect(config.canvas_width, config.canvas_height);
        let started = timer.now();
        Ok(Self {
            phase: P::default(),
            timer,
            rng,
            config,
            current: None,
            trial_number: 0,
            results: Vec::new(),
            subject_information: Vec::new(),
            system,
            slide_number: 0,
            schedule,
            started,
        })
    }

    /// Moves to the next phase. A trial phase with nothing planned is
    /// passed straight through.
    pub fn advance_phase(&mut self) -> bool {
        let Some(next) = self.phase.next() else {
            return false;
        };
        info!(from = self.phase.name(), to = next.name(), "phase change");
        self.phase = next;
        if !self.phase.presents_stimuli() {
            self.current = None;
            self.slide_number += 1;
        } else if !self.start_trial() {
            return self.advance_phase();
        }
        true
    }

    /// Puts the next planned stimulus on screen; false once the plan is
    /// used up.
    pub fn start_trial(&mut self) -> bool {
        let Some((stimulus, spec)) = self.schedule.get(self.trial_number).cloned() else {
            self.current = None;
            return false;
        };
        let id = self.trial_number + 1;
        self.slide_number += 1;
        info!(
            trial = id,
            slide = self.slide_number,
            n_total = stimulus.n_total,
            n_target = stimulus.n_target,
            target = %stimulus.color_target.word,
            "trial started"
        );
        self.current = Some(Trial {
            id,
            slide: self.slide_number,
            stimulus,
            spec,
            shown_at: self.timer.now(),
        });
        true
    }

    pub fn handle_event(&mut self, event: ExperimentEvent) -> bool {
        match (self.phase, event) {
            (phase, ExperimentEvent::Continue)
                if phase.allows_input() && !phase.presents_stimuli() =>
            {
                self.advance_phase()
            }

            (phase, ExperimentEvent::ResponseReceived(words)) if phase.presents_stimuli() => {
                self.record_response(words)
            }

            (phase, ExperimentEvent::ResponseReceived(words)) if phase.collects_subject_info() => {
                self.subject_information = words;
                self.advance_phase()
            }

            (_, ExperimentEvent::PhaseComplete) => self.advance_phase(),

            _ => false,
        }
    }

    /// Stores the answer for the stimulus on screen and shows the next
    /// one. All-blank answers are refused and the trial stays up.
    pub fn record_response(&mut self, words: Vec<String>) -> bool {
        if words.iter().all(|w| w.trim().is_empty()) {
            warn!(trial = self.trial_number + 1, "blank response ignored");
            return false;
        }
        let Some(trial) = self.current.take() else {
            return false;
        };

        let rt_ms = self.timer.elapsed(trial.shown_at).as_millis() as u64;
        info!(trial = trial.id, rt_ms, "response recorded");
        self.results.push(TrialResult {
            slide_number: trial.slide,
            rt_ms,
            response: words,
            color_target: trial.stimulus.color_target.word,
            color_other: trial.stimulus.color_other.word,
            n_total: trial.stimulus.n_total,
            n_target: trial.stimulus.n_target,
        });
        self.trial_number += 1;

        if !self.start_trial() {
            self.advance_phase();
        }
        true
    }

    /// Records the display size once a window reports it.
    pub fn set_screen(&mut self, width: u32, height: u32) {
        self.system = self.system.clone().with_screen(width, height);
    }

    pub fn current_phase(&self) -> &P {
        &self.phase
    }

    pub fn current_spec(&self) -> Option<&StimulusSpec> {
        self.current.as_ref().map(|t| &t.spec)
    }

    pub fn current_stimulus(&self) -> Option<&PlannedStimulus> {
        self.current.as_ref().map(|t| &t.stimulus)
    }

    /// How the stimulus on screen should be laid out.
    pub fn layout_strategy(&self) -> Option<LayoutStrategy> {
        let spec = self.current_spec()?;
        Some(match self.config.layout {
            LayoutMode::Grid => LayoutStrategy::select(spec.total_count()),
            LayoutMode::RejectionSampling => {
                LayoutStrategy::RejectionSampling(self.config.retry.policy())
            }
        })
    }

    pub fn planned(&self) -> impl Iterator<Item = &PlannedStimulus> {
        self.schedule.iter().map(|(stimulus, _)| stimulus)
    }

    pub fn results(&self) -> &[TrialResult] {
        &self.results
    }

    /// `(current, total)` while trials are running.
    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        self.current
            .as_ref()
            .map(|trial| (trial.id, self.schedule.len()))
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.phase.allows_input()
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_final()
    }

    pub fn session_record(&self) -> SessionRecord {
        SessionRecord {
            trials: self.results.clone(),
            catch_trials: Vec::new(),
            system: self.system.clone(),
            condition: self.config.condition.clone(),
            subject_information: self.subject_information.clone(),
            time_in_minutes: self.timer.elapsed(self.started).as_secs_f64() / 60.0,
            experiment_id: self.config.experiment_id.clone(),
            author: self.config.author.clone(),
            description: self.config.description.clone(),
        }
    }
}
