use serde::{Deserialize, Serialize};

/// Recorded result per trial, keyed the way the collection backend
/// expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// Session-wide slide counter (the intro is 0) when the stimulus
    /// appeared, not the position among trials.
    #[serde(rename = "slide_number_in_experiment")]
    pub slide_number: usize,
    #[serde(rename = "rt")]
    pub rt_ms: u64,
    pub response: Vec<String>,
    pub color_target: String,
    pub color_other: String,
    pub n_total: usize,
    pub n_target: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_backend_keys() {
        let result = TrialResult {
            slide_number: 3,
            rt_ms: 1520,
            response: vec!["a few".into(), String::new(), String::new()],
            color_target: "black".into(),
            color_other: "white".into(),
            n_total: 10,
            n_target: 4,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["slide_number_in_experiment"], 3);
        assert_eq!(value["rt"], 1520);
        assert_eq!(value["response"][0], "a few");
        assert_eq!(value["n_target"], 4);
    }
}
