use crate::config::{Config, ObjectiveWeights};
use crate::core_types::MIN_ATTENDEES;
use crate::optimizer::archive::EliteArchive;
use crate::optimizer::crossover::crossover_two_point;
use crate::optimizer::initialization::{balanced_genome, random_genome};
use crate::optimizer::mutation::mutate;
use crate::optimizer::selection::select_tournament;
use crate::optimizer::{GenomeContext, Individual};
use crate::scorer::{weighted_score, Evaluator};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct EvolutionOptions {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_prob: f32,
    pub mutation_prob: f32,
    pub gene_mutation_prob: f32,
    pub tournament_size: usize,
    pub archive_size: usize,
    pub progress_interval: usize,
    pub swap_mutation_share: f32,
    pub greedy_seed_share: f32,
}

impl From<&Config> for EvolutionOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            population_size: cfg.search.population_size,
            generations: cfg.search.generations,
            crossover_prob: cfg.search.crossover_prob,
            mutation_prob: cfg.search.mutation_prob,
            gene_mutation_prob: cfg.search.gene_mutation_prob,
            tournament_size: cfg.search.tournament_size,
            archive_size: cfg.search.archive_size,
            progress_interval: cfg.search.progress_interval,
            swap_mutation_share: cfg.search.swap_mutation_share,
            greedy_seed_share: cfg.search.greedy_seed_share,
        }
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// A trait for receiving updates during evolution.
/// Boolean return value indicates if the search should continue (true) or abort (false).
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, percent: u8) -> bool;
}

impl<F> ProgressCallback for F
where
    F: Fn(u8) -> bool + Send + Sync,
{
    fn on_progress(&self, percent: u8) -> bool {
        self(percent)
    }
}

/// Runs to completion without reporting.
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_progress(&self, _percent: u8) -> bool {
        true
    }
}

/// Per-generation summary, generation 0 being the initial population.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    pub generation: usize,
    pub best_score: f32,
    pub mean_score: f32,
    pub feasible_share: f32,
    pub evaluations: usize,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub archive: EliteArchive,
    pub trace: Vec<GenerationStats>,
    pub generations_run: usize,
    pub cancelled: bool,
}

pub struct Engine<'a> {
    evaluator: &'a Evaluator,
    context: GenomeContext,
    weights: ObjectiveWeights,
    options: EvolutionOptions,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> Engine<'a> {
    pub fn new(
        evaluator: &'a Evaluator,
        context: GenomeContext,
        weights: ObjectiveWeights,
        options: EvolutionOptions,
    ) -> Self {
        Self {
            evaluator,
            context,
            weights,
            options,
            cancel: None,
        }
    }

    /// Shared stop flag, checked at every generation boundary.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn stop_requested(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub fn run<CB: ProgressCallback + ?Sized>(&self, seed: Option<u64>, callback: &CB) -> RunOutcome {
        let opts = &self.options;
        let mut archive = EliteArchive::new(opts.archive_size, self.weights);
        let mut trace = Vec::with_capacity(opts.generations + 1);

        if self.context.len() < MIN_ATTENDEES || self.context.group_count == 0 {
            return RunOutcome {
                archive,
                trace,
                generations_run: 0,
                cancelled: false,
            };
        }

        let mut rng = if let Some(s) = seed {
            fastrand::Rng::with_seed(s)
        } else {
            fastrand::Rng::new()
        };

        // 1. Initial population
        let pop_size = opts.population_size.max(2);
        let seeded = ((pop_size as f32 * opts.greedy_seed_share.clamp(0.0, 1.0)).round() as usize)
            .min(pop_size);
        let mut population: Vec<Individual> = (0..pop_size)
            .map(|i| {
                let genome = if i < seeded {
                    balanced_genome(&self.context, &mut rng)
                } else {
                    random_genome(&self.context, &mut rng)
                };
                Individual::new(genome)
            })
            .collect();

        let evaluations = self.evaluate_population(&mut population);
        archive.update(&population);
        trace.push(self.stats(0, &population, evaluations));

        // 2. Generational loop
        let mut generations_run = 0;
        let mut cancelled = false;
        for gen in 1..=opts.generations {
            if self.stop_requested() {
                cancelled = true;
                break;
            }

            let scores: Vec<f32> = population.iter().map(|ind| self.score_of(ind)).collect();
            let winners = select_tournament(&scores, pop_size, opts.tournament_size, &mut rng);
            let mut offspring: Vec<Individual> =
                winners.iter().map(|&i| population[i].clone()).collect();

            // A. Crossover on consecutive pairs
            for pair in offspring.chunks_exact_mut(2) {
                if rng.f32() < opts.crossover_prob {
                    let (left, right) = pair.split_at_mut(1);
                    let (a, b) = (&mut left[0], &mut right[0]);
                    if crossover_two_point(&mut a.genome, &mut b.genome, &mut rng) {
                        self.context.repair(&mut a.genome);
                        self.context.repair(&mut b.genome);
                        a.invalidate();
                        b.invalidate();
                    }
                }
            }

            // B. Mutation
            for ind in offspring.iter_mut() {
                if rng.f32() < opts.mutation_prob
                    && mutate(
                        &mut ind.genome,
                        &self.context,
                        opts.gene_mutation_prob,
                        opts.swap_mutation_share,
                        &mut rng,
                    )
                {
                    ind.invalidate();
                }
            }

            // C. Evaluate only what changed
            let evaluations = self.evaluate_population(&mut offspring);
            archive.update(&offspring);
            population = offspring;
            generations_run = gen;
            let stats = self.stats(gen, &population, evaluations);
            debug!(
                generation = gen,
                best = stats.best_score,
                mean = stats.mean_score,
                feasible = stats.feasible_share,
                evaluated = stats.evaluations,
                "generation done"
            );
            trace.push(stats);

            // D. Report Progress
            let interval = opts.progress_interval.max(1);
            if gen % interval == 0 || gen == opts.generations {
                let percent = (gen * 100 / opts.generations).min(100) as u8;
                if !callback.on_progress(percent) {
                    cancelled = gen < opts.generations;
                    break;
                }
            }
        }

        debug!(
            generations = generations_run,
            archived = archive.len(),
            best = archive.best().map(|e| e.score),
            cancelled,
            "evolution finished"
        );

        RunOutcome {
            archive,
            trace,
            generations_run,
            cancelled,
        }
    }

    fn evaluate_population(&self, population: &mut [Individual]) -> usize {
        let evaluator = self.evaluator;
        population
            .par_iter_mut()
            .filter(|ind| !ind.is_evaluated())
            .map(|ind| {
                ind.fitness = Some(evaluator.evaluate(&ind.genome));
                1
            })
            .sum()
    }

    #[inline]
    fn score_of(&self, ind: &Individual) -> f32 {
        ind.fitness
            .map(|f| weighted_score(&f, &self.weights))
            .unwrap_or(f32::NEG_INFINITY)
    }

    fn stats(&self, generation: usize, population: &[Individual], evaluations: usize) -> GenerationStats {
        let n = population.len().max(1) as f32;
        let scores = population.iter().map(|ind| self.score_of(ind));
        let best_score = scores.clone().fold(f32::NEG_INFINITY, f32::max);
        let mean_score = scores.sum::<f32>() / n;
        let feasible = population
            .iter()
            .filter(|ind| ind.fitness.is_some_and(|f| f.is_feasible()))
            .count();
        GenerationStats {
            generation,
            best_score,
            mean_score,
            feasible_share: feasible as f32 / n,
            evaluations,
        }
    }
}
