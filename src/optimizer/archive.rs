use crate::config::ObjectiveWeights;
use crate::core_types::{Genome, GroupId};
use crate::optimizer::Individual;
use crate::partition::Partition;
use crate::scorer::{weighted_score, FitnessVector};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub genome: Genome,
    pub fitness: FitnessVector,
    pub score: f32,
    pub partition: Partition,
}

/// Bounded hall of fame: the best distinct groupings seen during one run,
/// sorted by weighted score, best first. Relabelings of a stored grouping are
/// treated as duplicates.
#[derive(Debug, Clone)]
pub struct EliteArchive {
    capacity: usize,
    weights: ObjectiveWeights,
    entries: Vec<ArchiveEntry>,
    seen: HashSet<Partition>,
}

impl EliteArchive {
    pub fn new(capacity: usize, weights: ObjectiveWeights) -> Self {
        Self {
            capacity,
            weights,
            entries: Vec::with_capacity(capacity + 1),
            seen: HashSet::with_capacity(capacity + 1),
        }
    }

    /// Offers every evaluated individual. Returns how many were admitted.
    pub fn update(&mut self, population: &[Individual]) -> usize {
        population
            .iter()
            .filter_map(|ind| ind.fitness.map(|f| (ind, f)))
            .filter(|(ind, fitness)| self.offer(&ind.genome, *fitness))
            .count()
    }

    pub fn offer(&mut self, genome: &[GroupId], fitness: FitnessVector) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let score = weighted_score(&fitness, &self.weights);
        if self.entries.len() >= self.capacity && !self.beats_worst(score) {
            return false;
        }

        let partition = Partition::from_genome(genome);
        if self.seen.contains(&partition) {
            return false;
        }

        // Insert after existing entries with an equal score so earlier finds stay ahead
        let at = self.entries.partition_point(|e| e.score >= score);
        self.seen.insert(partition.clone());
        self.entries.insert(
            at,
            ArchiveEntry {
                genome: genome.to_vec(),
                fitness,
                score,
                partition,
            },
        );

        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop() {
                self.seen.remove(&evicted.partition);
            }
        }
        true
    }

    fn beats_worst(&self, score: f32) -> bool {
        self.entries.last().is_none_or(|worst| score > worst.score)
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<&ArchiveEntry> {
        self.entries.first()
    }

    pub fn feasible(&self) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries.iter().filter(|e| e.fitness.is_feasible())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn weights(&self) -> &ObjectiveWeights {
        &self.weights
    }
}
