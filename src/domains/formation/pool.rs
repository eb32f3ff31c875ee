use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{HashSet, VecDeque};

use crate::common::{PlanningError, PlanningResult};
use super::template::TemplateId;

/// Rotating pool of template ids.
///
/// Each planning call drains the pool to build its try-order, so templates
/// that have not been tried recently are tried first; ids missing from the
/// pool are appended in random order. The pool is the only planner state that
/// survives between ticks and is owned by the caller.
#[derive(Debug, Clone)]
pub struct TemplatePool {
    catalog: Vec<TemplateId>,
    pending: VecDeque<TemplateId>,
    rng: StdRng,
}

impl TemplatePool {
    /// `seed` makes the randomized part of the ordering reproducible.
    pub fn new(catalog: Vec<TemplateId>, seed: Option<u64>) -> PlanningResult<Self> {
        let mut unique = Vec::with_capacity(catalog.len());
        let mut seen = HashSet::new();
        for id in catalog {
            if seen.insert(id.clone()) {
                unique.push(id);
            }
        }
        if unique.is_empty() {
            return Err(PlanningError::invalid_input("Template pool is empty"));
        }
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Ok(Self { catalog: unique, pending: VecDeque::new(), rng })
    }

    pub fn catalog(&self) -> &[TemplateId] {
        &self.catalog
    }

    pub fn pending(&self) -> impl Iterator<Item = &TemplateId> {
        self.pending.iter()
    }

    /// Order in which templates are tried this call. Contains every catalog id
    /// exactly once.
    pub fn try_order(&mut self) -> Vec<TemplateId> {
        if self.pending.is_empty() {
            let mut refill = self.catalog.clone();
            refill.shuffle(&mut self.rng);
            self.pending.extend(refill);
        }

        let mut order = Vec::with_capacity(self.catalog.len());
        let mut seen = HashSet::new();
        while order.len() < self.catalog.len() {
            let Some(id) = self.pending.pop_front() else {
                break;
            };
            if self.catalog.contains(&id) && seen.insert(id.clone()) {
                order.push(id);
            }
        }

        let mut rest: Vec<TemplateId> = self
            .catalog
            .iter()
            .filter(|id| !seen.contains(*id))
            .cloned()
            .collect();
        rest.shuffle(&mut self.rng);
        order.extend(rest);
        order
    }

    /// After a successful fit with `order[accepted]`, put the templates that
    /// were never reached back at the front of the pool and the accepted one
    /// at the back.
    pub fn requeue_untried(&mut self, order: &[TemplateId], accepted: usize) {
        if accepted >= order.len() {
            return;
        }
        for id in order[accepted + 1..].iter().rev() {
            self.pending.push_front(id.clone());
        }
        self.pending.push_back(order[accepted].clone());
    }
}
