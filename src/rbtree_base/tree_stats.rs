/// Counters maintained by the tree as it is mutated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub size: usize,
    pub rotations: usize,
    pub recolors: usize,
    pub fixup_iterations: usize,
}

impl TreeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn avg_rotations_per_insert(&self) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        self.rotations as f64 / self.size as f64
    }
}
