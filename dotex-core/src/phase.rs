/// Defines experiment phases and behavior
pub trait Phase: Copy + Clone + PartialEq + Send + Sync + std::fmt::Debug + Default {
    fn allows_input(&self) -> bool;
    fn next(&self) -> Option<Self>;
    fn name(&self) -> &'static str;

    fn presents_stimuli(&self) -> bool {
        false
    }
    fn collects_subject_info(&self) -> bool {
        false
    }
    fn is_final(&self) -> bool {
        false
    }
}

/// The session structure of the norming pages: intro, instructions, the
/// dot trials, the subject questionnaire and the closing screen.
#[derive(Copy, Debug, Clone, PartialEq, Default)]
pub enum StandardPhase {
    #[default]
    Intro,
    Instructions,
    ObjectTrial,
    SubjectInfo,
    Thanks,
}

impl Phase for StandardPhase {
    fn allows_input(&self) -> bool {
        !matches!(self, Self::Thanks)
    }
    fn next(&self) -> Option<Self> {
        use StandardPhase::*;
        Some(match self {
            Intro => Instructions,
            Instructions => ObjectTrial,
            ObjectTrial => SubjectInfo,
            SubjectInfo => Thanks,
            Thanks => return None,
        })
    }
    fn name(&self) -> &'static str {
        match self {
            Self::Intro => "i0",
            Self::Instructions => "instructions",
            Self::ObjectTrial => "objecttrial",
            Self::SubjectInfo => "subj_info",
            Self::Thanks => "thanks",
        }
    }

    fn presents_stimuli(&self) -> bool {
        matches!(self, StandardPhase::ObjectTrial)
    }

    fn collects_subject_info(&self) -> bool {
        matches!(self, StandardPhase::SubjectInfo)
    }

    fn is_final(&self) -> bool {
        matches!(self, StandardPhase::Thanks)
    }
}
