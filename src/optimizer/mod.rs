pub mod archive;
pub mod crossover;
pub mod diversity;
pub mod initialization;
pub mod mutation;
pub mod runner;
pub mod selection;

pub use self::archive::{ArchiveEntry, EliteArchive};
pub use self::runner::{
    Engine, EvolutionOptions, GenerationStats, NoProgress, ProgressCallback, RunOutcome,
};

use crate::core_types::{Genome, GroupId};
use crate::roster::{Gender, Session};
use crate::scorer::FitnessVector;

/// A genome plus its cached fitness. `None` means the genome changed since it was
/// last evaluated.
#[derive(Debug, Clone)]
pub struct Individual {
    pub genome: Genome,
    pub fitness: Option<FitnessVector>,
}

impl Individual {
    pub fn new(genome: Genome) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }

    #[inline(always)]
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    #[inline(always)]
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }
}

/// Per-attendee facts the variation operators need.
#[derive(Debug, Clone)]
pub struct GenomeContext {
    pub group_count: usize,
    pub genders: Vec<Gender>,
    pub is_facilitator: Vec<bool>,
    /// (guest position, host position)
    pub guest_links: Vec<(usize, usize)>,
    /// Guests and hosts never take part in swaps.
    pub pinned: Vec<bool>,
}

impl GenomeContext {
    pub fn from_session(session: &Session, group_count: usize) -> Self {
        let guest_links = session.guest_links();
        let mut pinned = vec![false; session.len()];
        for &(guest, host) in &guest_links {
            pinned[guest] = true;
            pinned[host] = true;
        }
        Self {
            group_count,
            genders: session.attendees.iter().map(|a| a.gender).collect(),
            is_facilitator: session.attendees.iter().map(|a| a.is_facilitator).collect(),
            guest_links,
            pinned,
        }
    }

    pub fn len(&self) -> usize {
        self.genders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genders.is_empty()
    }

    /// Forces every guest into the host's group. Returns true if anything moved.
    pub fn repair(&self, genome: &mut [GroupId]) -> bool {
        let mut changed = false;
        for &(guest, host) in &self.guest_links {
            if genome[guest] != genome[host] {
                genome[guest] = genome[host];
                changed = true;
            }
        }
        changed
    }
}
