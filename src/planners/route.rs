use std::collections::VecDeque;
use std::fmt;

use crate::state::FieldId;

/// One move of a route: the field entered, and whether a bomb is dropped on the
/// field being left when entering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub field: FieldId,
    pub place_bomb: bool,
}

impl Step {
    pub fn new(field: FieldId, place_bomb: bool) -> Self {
        Self { field, place_bomb }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.place_bomb { "+" } else { "" };
        write!(f, "{}{}", self.field.0, marker)
    }
}

/// Steps from the start (exclusive) to the search horizon (inclusive).
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    steps: VecDeque<Step>,
    fitness: f64,
}

impl Route {
    pub fn new(last_step: Step) -> Self {
        Self {
            steps: VecDeque::from([last_step]),
            fitness: 0.0,
        }
    }

    pub fn prepend_step(&mut self, step: Step) {
        self.steps.push_front(step);
    }

    pub fn adjust_fitness(&mut self, fitness: f64) {
        self.fitness += fitness;
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn first_step(&self) -> Option<&Step> {
        self.steps.front()
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<String> = self.steps.iter().map(Step::to_string).collect();
        write!(f, "{} ({:.3})", steps.join("->"), self.fitness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepend_keeps_order() {
        let mut route = Route::new(Step::new(FieldId(3), false));
        route.prepend_step(Step::new(FieldId(2), false));
        route.prepend_step(Step::new(FieldId(1), true));
        route.adjust_fitness(0.5);
        route.adjust_fitness(0.25);

        assert_eq!(route.first_step(), Some(&Step::new(FieldId(1), true)));
        assert_eq!(route.len(), 3);
        assert_eq!(route.to_string(), "1+->2->3 (0.750)");
    }
}
