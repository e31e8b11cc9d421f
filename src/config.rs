use crate::error::{TeamForgeError, TfResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub weights: ProfileWeights,
    #[command(flatten)]
    pub constraints: GroupConstraints,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long, default_value_t = 1200)]
    pub population_size: usize,
    #[arg(long, default_value_t = 200)]
    pub generations: usize,
    #[arg(long, default_value_t = 0.7)]
    pub crossover_prob: f32,

    // Two-level mutation: per individual, then per gene
    #[arg(long, default_value_t = 0.6)]
    pub mutation_prob: f32,
    #[arg(long, default_value_t = 0.05)]
    pub gene_mutation_prob: f32,

    #[arg(long, default_value_t = 3)]
    pub tournament_size: usize,
    #[arg(long, default_value_t = 20)]
    pub archive_size: usize,
    #[arg(long, default_value_t = 10)]
    pub progress_interval: usize,

    // === DIVERSITY ===
    #[arg(long, default_value_t = 3)]
    pub results_per_profile: usize,
    /// Minimum permutation-invariant distance between suggestions, as a share of attendees.
    #[arg(long, default_value_t = 0.15)]
    pub diversity_threshold: f32,

    // === OPERATOR MIX ===
    #[arg(long, default_value_t = 0.0)]
    pub swap_mutation_share: f32,
    #[arg(long, default_value_t = 0.0)]
    pub greedy_seed_share: f32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            population_size: 1200,
            generations: 200,
            crossover_prob: 0.7,
            mutation_prob: 0.6,
            gene_mutation_prob: 0.05,
            tournament_size: 3,
            archive_size: 20,
            progress_interval: 10,
            results_per_profile: 3,
            diversity_threshold: 0.15,
            swap_mutation_share: 0.0,
            greedy_seed_share: 0.0,
        }
    }
}

impl SearchParams {
    pub fn validate(&self) -> TfResult<()> {
        if self.population_size < 2 {
            return Err(TeamForgeError::Config(
                "population_size must be at least 2".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(TeamForgeError::Config(
                "tournament_size must be positive".to_string(),
            ));
        }
        if self.archive_size == 0 {
            return Err(TeamForgeError::Config(
                "archive_size must be positive".to_string(),
            ));
        }

        let probabilities = [
            ("crossover_prob", self.crossover_prob),
            ("mutation_prob", self.mutation_prob),
            ("gene_mutation_prob", self.gene_mutation_prob),
            ("swap_mutation_share", self.swap_mutation_share),
            ("greedy_seed_share", self.greedy_seed_share),
            ("diversity_threshold", self.diversity_threshold),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(TeamForgeError::Config(format!(
                    "{} must lie in [0, 1], got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }
}

/// Objective weight vectors for the two search profiles.
/// Order: gender balance, novelty, facilitator spread, preference, size violation.
#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileWeights {
    #[arg(long, default_value = "10,6,3,2,-1000")]
    pub balance_first: String,
    #[arg(long, default_value = "6,10,3,2,-1000")]
    pub novelty_first: String,
}

impl Default for ProfileWeights {
    fn default() -> Self {
        Self {
            balance_first: "10,6,3,2,-1000".to_string(),
            novelty_first: "6,10,3,2,-1000".to_string(),
        }
    }
}

impl ProfileWeights {
    pub fn get_balance_first(&self) -> TfResult<ObjectiveWeights> {
        ObjectiveWeights::parse(&self.balance_first, "balance_first")
    }

    pub fn get_novelty_first(&self) -> TfResult<ObjectiveWeights> {
        ObjectiveWeights::parse(&self.novelty_first, "novelty_first")
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConstraints {
    #[arg(long, default_value_t = 3)]
    pub min_group_size: usize,
    #[arg(long, default_value_t = 5)]
    pub max_group_size: usize,
    /// Default group count is round(attendees / target_group_size).
    #[arg(long, default_value_t = 4.5)]
    pub target_group_size: f32,
    /// Preference bonuses are voided once a pair has met this many times.
    #[arg(long, default_value_t = 2)]
    pub recent_meeting_threshold: u32,
}

impl Default for GroupConstraints {
    fn default() -> Self {
        Self {
            min_group_size: 3,
            max_group_size: 5,
            target_group_size: 4.5,
            recent_meeting_threshold: 2,
        }
    }
}

impl GroupConstraints {
    pub fn validate(&self) -> TfResult<()> {
        if self.min_group_size == 0 || self.min_group_size > self.max_group_size {
            return Err(TeamForgeError::Config(format!(
                "group size bounds [{}, {}] are empty",
                self.min_group_size, self.max_group_size
            )));
        }
        if self.target_group_size.is_nan() || self.target_group_size <= 0.0 {
            return Err(TeamForgeError::Config(
                "target_group_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Weight vector applied to a fitness vector to get one scalar score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights(pub [f32; 5]);

impl ObjectiveWeights {
    pub fn parse(s: &str, name: &str) -> TfResult<Self> {
        let values = parse_f32_array::<5>(s, name)?;
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(TeamForgeError::Config(format!(
                "--{}: weights must be finite, got {}",
                name.replace('_', "-"),
                bad
            )));
        }
        if values[4] >= 0.0 {
            return Err(TeamForgeError::Config(format!(
                "--{}: the size-violation weight must be negative, got {}",
                name.replace('_', "-"),
                values[4]
            )));
        }
        Ok(Self(values))
    }

    #[inline(always)]
    pub fn violation_weight(&self) -> f32 {
        self.0[4]
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TfResult<Self> {
        let content = fs::read_to_string(path)?;
        let cfg: Config = serde_json::from_str(&content)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> TfResult<()> {
        self.search.validate()?;
        self.constraints.validate()?;
        self.weights.get_balance_first()?;
        self.weights.get_novelty_first()?;
        Ok(())
    }

    /// Overlays the flags the user actually typed onto a file-loaded config.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(search.population_size);
        update_if_present!(search.generations);
        update_if_present!(search.crossover_prob);
        update_if_present!(search.mutation_prob);
        update_if_present!(search.gene_mutation_prob);
        update_if_present!(search.tournament_size);
        update_if_present!(search.archive_size);
        update_if_present!(search.progress_interval);
        update_if_present!(search.results_per_profile);
        update_if_present!(search.diversity_threshold);
        update_if_present!(search.swap_mutation_share);
        update_if_present!(search.greedy_seed_share);

        update_if_present!(weights.balance_first);
        update_if_present!(weights.novelty_first);

        update_if_present!(constraints.min_group_size);
        update_if_present!(constraints.max_group_size);
        update_if_present!(constraints.target_group_size);
        update_if_present!(constraints.recent_meeting_threshold);
    }
}

fn parse_f32_array<const N: usize>(s: &str, name: &str) -> TfResult<[f32; N]> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != N {
        return Err(TeamForgeError::Config(format!(
            "--{} requires {} values",
            name.replace('_', "-"),
            N
        )));
    }
    let mut arr = [0.0; N];
    for (i, p) in parts.iter().enumerate() {
        arr[i] = p.trim().parse().map_err(|_| {
            TeamForgeError::Config(format!("Invalid number '{}' in {}", p.trim(), name))
        })?;
    }
    Ok(arr)
}
