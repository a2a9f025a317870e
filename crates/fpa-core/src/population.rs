//! Population store: candidates, their fitness, and the global best.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bounds::Bounds;
use crate::error::{FpaError, FpaResult, Phase};
use crate::objective::{evaluate_checked, Objective};

/// A decision vector paired with its fitness (lower is better).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub position: Vec<f64>,
    pub fitness: f64,
}

/// Fixed-size set of candidates plus the best candidate ever observed.
///
/// The best is tracked across the whole history, so it stays at or below the
/// minimum of the current members even though members are only ever replaced
/// by strictly better ones.
#[derive(Debug, Clone)]
pub struct Population {
    members: Vec<Candidate>,
    best: Candidate,
}

impl Population {
    /// Draw `flowers` members uniformly from `bounds` and evaluate each once.
    pub fn initialize<O, R>(
        flowers: usize,
        bounds: &Bounds,
        objective: &mut O,
        rng: &mut R,
        rejection_sentinel: f64,
    ) -> FpaResult<Self>
    where
        O: Objective + ?Sized,
        R: Rng + ?Sized,
    {
        if flowers == 0 {
            return Err(FpaError::invalid("population must hold at least one flower"));
        }
        let mut members = Vec::with_capacity(flowers);
        for index in 0..flowers {
            let position = bounds.sample(rng);
            let fitness = evaluate_checked(
                objective,
                &position,
                Phase::Initialization,
                index,
                rejection_sentinel,
            )?;
            members.push(Candidate { position, fitness });
        }
        Self::from_members(members)
    }

    /// Wrap already-evaluated members. The first minimum becomes the best.
    pub fn from_members(members: Vec<Candidate>) -> FpaResult<Self> {
        let best = members
            .iter()
            .fold(None::<&Candidate>, |best, c| match best {
                Some(b) if b.fitness <= c.fitness => Some(b),
                _ => Some(c),
            })
            .cloned()
            .ok_or_else(|| FpaError::invalid("population must have at least one member"))?;
        debug!(
            flowers = members.len(),
            best = best.fitness,
            "initialized population"
        );
        Ok(Self { members, best })
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Candidate] {
        &self.members
    }

    pub fn member(&self, index: usize) -> &Candidate {
        &self.members[index]
    }

    pub fn best(&self) -> &Candidate {
        &self.best
    }

    pub fn into_best(self) -> Candidate {
        self.best
    }

    /// Greedy replacement. Returns `true` when member `index` was overwritten.
    ///
    /// Ties keep the incumbent, both for the member and for the global best.
    pub fn replace_if_better(&mut self, index: usize, position: Vec<f64>, fitness: f64) -> bool {
        let member = &mut self.members[index];
        if !(fitness < member.fitness) {
            return false;
        }
        if fitness < self.best.fitness {
            self.best.position.clone_from(&position);
            self.best.fitness = fitness;
        }
        member.position = position;
        member.fitness = fitness;
        true
    }
}
