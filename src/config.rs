use serde::Deserialize;

const ENV_PREFIX: &str = "PLAYLISTER_";

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// JSON file holding the song catalog
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// JSON file holding recorded feedback rows
    #[serde(default = "default_feedback_path")]
    pub feedback_path: String,

    /// Smallest playlist a caller may request
    #[serde(default = "default_min_count")]
    pub min_count: usize,

    /// Largest playlist a caller may request
    #[serde(default = "default_max_count")]
    pub max_count: usize,

    #[serde(default = "default_quiz_min")]
    pub quiz_min: usize,

    #[serde(default = "default_quiz_max")]
    pub quiz_max: usize,

    /// Quiz length when the caller does not ask for one
    #[serde(default = "default_quiz_default")]
    pub quiz_default: usize,

    #[serde(skip)]
    pub weights: ScoringWeights,
}

/// Scoring constants for the recommender
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScoringWeights {
    #[serde(default = "default_artist_weight")]
    pub artist_weight: f64,
    #[serde(default = "default_subgenre_weight")]
    pub subgenre_weight: f64,
    /// Per shared tag with the liked-tag set
    #[serde(default = "default_tag_weight")]
    pub tag_weight: f64,
    #[serde(default = "default_bpm_weight")]
    pub bpm_weight: f64,
    #[serde(default = "default_era_weight")]
    pub era_weight: f64,
    #[serde(default = "default_seed_artist_weight")]
    pub seed_artist_weight: f64,
    #[serde(default = "default_seed_subgenre_weight")]
    pub seed_subgenre_weight: f64,
    /// Per tag shared with the seed song
    #[serde(default = "default_seed_tag_weight")]
    pub seed_tag_weight: f64,
    #[serde(default = "default_seed_bpm_weight")]
    pub seed_bpm_weight: f64,
    #[serde(default = "default_bpm_tolerance")]
    pub bpm_tolerance: f64,
    #[serde(default = "default_year_tolerance")]
    pub year_tolerance: f64,
    /// Upper bound (exclusive) of the tie-break jitter; 0 disables it
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

fn default_catalog_path() -> String {
    "data/house_catalog.json".to_string()
}

fn default_feedback_path() -> String {
    "data/feedback.json".to_string()
}

fn default_min_count() -> usize {
    5
}

fn default_max_count() -> usize {
    100
}

fn default_quiz_min() -> usize {
    5
}

fn default_quiz_max() -> usize {
    20
}

fn default_quiz_default() -> usize {
    10
}

fn default_artist_weight() -> f64 {
    2.0
}

fn default_subgenre_weight() -> f64 {
    1.0
}

fn default_tag_weight() -> f64 {
    0.5
}

fn default_bpm_weight() -> f64 {
    0.3
}

fn default_era_weight() -> f64 {
    0.2
}

fn default_seed_artist_weight() -> f64 {
    1.0
}

fn default_seed_subgenre_weight() -> f64 {
    1.0
}

fn default_seed_tag_weight() -> f64 {
    1.0
}

fn default_seed_bpm_weight() -> f64 {
    0.3
}

fn default_bpm_tolerance() -> f64 {
    8.0
}

fn default_year_tolerance() -> f64 {
    5.0
}

fn default_jitter() -> f64 {
    0.01
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            artist_weight: default_artist_weight(),
            subgenre_weight: default_subgenre_weight(),
            tag_weight: default_tag_weight(),
            bpm_weight: default_bpm_weight(),
            era_weight: default_era_weight(),
            seed_artist_weight: default_seed_artist_weight(),
            seed_subgenre_weight: default_seed_subgenre_weight(),
            seed_tag_weight: default_seed_tag_weight(),
            seed_bpm_weight: default_seed_bpm_weight(),
            bpm_tolerance: default_bpm_tolerance(),
            year_tolerance: default_year_tolerance(),
            jitter: default_jitter(),
        }
    }
}

impl ScoringWeights {
    /// Weights with the tie-break jitter turned off, for reproducible scores
    pub fn without_jitter() -> Self {
        Self {
            jitter: 0.0,
            ..Self::default()
        }
    }

    fn signal_weights(&self) -> [f64; 9] {
        [
            self.artist_weight,
            self.subgenre_weight,
            self.tag_weight,
            self.bpm_weight,
            self.era_weight,
            self.seed_artist_weight,
            self.seed_subgenre_weight,
            self.seed_tag_weight,
            self.seed_bpm_weight,
        ]
    }

    /// Smallest positive gap between two signal weights, or between a weight and zero.
    ///
    /// Jitter above this could reorder songs whose real scores differ.
    pub fn smallest_step(&self) -> Option<f64> {
        let mut weights: Vec<f64> = self
            .signal_weights()
            .into_iter()
            .filter(|w| w.is_finite() && *w > 0.0)
            .collect();
        weights.sort_by(f64::total_cmp);
        weights.dedup();

        let gaps = weights.windows(2).map(|pair| pair[1] - pair[0]);
        weights.first().copied().into_iter().chain(gaps).reduce(f64::min)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.signal_weights().iter().any(|w| !w.is_finite()) {
            anyhow::bail!("Scoring weights must be finite");
        }
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            anyhow::bail!("Jitter must be finite and non-negative, got {}", self.jitter);
        }
        if let Some(step) = self.smallest_step() {
            if self.jitter > step {
                anyhow::bail!(
                    "Jitter {} exceeds the smallest score step {}",
                    self.jitter,
                    step
                );
            }
        }
        if !(self.bpm_tolerance >= 0.0) || !(self.year_tolerance >= 0.0) {
            anyhow::bail!("Tolerances must be non-negative");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            feedback_path: default_feedback_path(),
            min_count: default_min_count(),
            max_count: default_max_count(),
            quiz_min: default_quiz_min(),
            quiz_max: default_quiz_max(),
            quiz_default: default_quiz_default(),
            weights: ScoringWeights::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_iter(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_iter<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();

        let mut config = envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Config>(vars.clone())
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.weights = envy::prefixed(ENV_PREFIX)
            .from_iter::<_, ScoringWeights>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load scoring weights: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.min_count == 0 || self.min_count > self.max_count {
            anyhow::bail!(
                "Invalid playlist bounds: min {} max {}",
                self.min_count,
                self.max_count
            );
        }
        if self.quiz_min == 0 || self.quiz_min > self.quiz_max {
            anyhow::bail!(
                "Invalid quiz bounds: min {} max {}",
                self.quiz_min,
                self.quiz_max
            );
        }
        if !(self.quiz_min..=self.quiz_max).contains(&self.quiz_default) {
            anyhow::bail!("Default quiz length {} is out of bounds", self.quiz_default);
        }
        self.weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = Config::from_iter(Vec::new()).unwrap();
        assert_eq!(config.min_count, 5);
        assert_eq!(config.max_count, 100);
        assert_eq!(config.quiz_default, 10);
        assert_eq!(config.weights, ScoringWeights::default());
        assert_eq!(config.catalog_path, "data/house_catalog.json");
    }

    #[test]
    fn test_prefixed_overrides() {
        let config = Config::from_iter(vars(&[
            ("PLAYLISTER_MAX_COUNT", "50"),
            ("PLAYLISTER_ARTIST_WEIGHT", "3.5"),
            ("PLAYLISTER_JITTER", "0"),
            ("UNRELATED", "x"),
        ]))
        .unwrap();

        assert_eq!(config.max_count, 50);
        assert_eq!(config.weights.artist_weight, 3.5);
        assert_eq!(config.weights.jitter, 0.0);
        assert_eq!(config.weights.tag_weight, 0.5);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let result = Config::from_iter(vars(&[
            ("PLAYLISTER_MIN_COUNT", "30"),
            ("PLAYLISTER_MAX_COUNT", "10"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_jitter_rejected() {
        let result = Config::from_iter(vars(&[("PLAYLISTER_JITTER", "-0.5")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_infinite_jitter_rejected() {
        let result = Config::from_iter(vars(&[("PLAYLISTER_JITTER", "inf")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_jitter_larger_than_score_step_rejected() {
        assert!(Config::from_iter(vars(&[("PLAYLISTER_JITTER", "5")])).is_err());
        // 0.3 - 0.2 is the smallest gap with default weights
        assert!(Config::from_iter(vars(&[("PLAYLISTER_JITTER", "0.11")])).is_err());
        assert!(Config::from_iter(vars(&[("PLAYLISTER_JITTER", "0.05")])).is_ok());
    }

    #[test]
    fn test_smallest_step_follows_weights() {
        let defaults = ScoringWeights::default();
        assert!((defaults.smallest_step().unwrap() - 0.1).abs() < 1e-9);

        let coarse = ScoringWeights {
            tag_weight: 1.0,
            bpm_weight: 1.0,
            era_weight: 0.0,
            seed_bpm_weight: 1.0,
            ..ScoringWeights::default()
        };
        assert_eq!(coarse.smallest_step(), Some(1.0));
    }
}
