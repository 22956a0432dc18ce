use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum MachineState {
    #[default]
    Idle,
    ImageSelected,
    Analyzing,
    GeneratingImages,
    Results,
    Finished,
    Error,
}

impl MachineState {
    /// States the user has to acknowledge with a reset.
    pub fn is_terminal(&self) -> bool {
        return *self == MachineState::Finished || *self == MachineState::Error;
    }

    /// States where remote calls may still be running.
    pub fn is_busy(&self) -> bool {
        return *self == MachineState::Analyzing || *self == MachineState::GeneratingImages;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum GenerationPolicy {
    /// Fire every dish at once and merge results as they land.
    #[default]
    Parallel,
    /// One dish at a time, so the gallery fills in top to bottom.
    Sequential,
}

impl GenerationPolicy {
    pub fn parse(text: &str) -> Option<GenerationPolicy> {
        return GenerationPolicy::iter().find(|e| return e.to_string() == text);
    }
}
