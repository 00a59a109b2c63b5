/// Tracks a best-ever value and the number of consecutive updates since it
/// last improved: age resets to zero on strict improvement and otherwise
/// climbs on every call to [Tracker::update].
///
/// [crate::genome::Species] and [crate::genome::Population] hand-roll this
/// same best/age bookkeeping rather than holding a `Tracker`, because their
/// age advances on a separate per-generation tick ([crate::genome::Species::advance])
/// from the one that observes fitness ([crate::genome::Species::update_fitness]);
/// `Tracker::update` couples the two. This type remains for callers with a
/// single observe-and-age-together loop.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    best: Option<f32>,
    age: usize,
}

impl Tracker {
    pub fn new() -> Self {
        Tracker {
            best: None,
            age: 0,
        }
    }

    /// Folds in an observed value. Returns `true` if this was a strict
    /// improvement over the previous best (age was reset to zero).
    pub fn update(&mut self, observed: f32) -> bool {
        match self.best {
            Some(best) if observed > best => {
                self.best = Some(observed);
                self.age = 0;
                true
            }
            Some(_) => {
                self.age += 1;
                false
            }
            None => {
                self.best = Some(observed);
                self.age = 0;
                true
            }
        }
    }

    pub fn best(&self) -> Option<f32> {
        self.best
    }

    pub fn age(&self) -> usize {
        self.age
    }
}
