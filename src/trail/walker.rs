use crate::trail::mountain::Mountain;
use crate::trail::path::Trail;

/// The branch a walker takes at a split.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Branch {
    Top,
    Bottom,
}

/// A branch-selection strategy for following a trail.
///
/// The walker is handed every mountain it passes and decides, at each
/// split, which branch to take based on what the two branches start with.
pub trait WalkerPersonality {
    /// Selects a branch to take at a split.
    fn select_branch(&self, top: &Trail, bottom: &Trail) -> Branch;

    /// Records a mountain passed on the walk.
    fn add_mountain(&mut self, mountain: &Mountain);

    /// The mountains passed so far, in walk order.
    fn mountains(&self) -> &[Mountain];
}

/// Always takes the top branch.
#[derive(Default)]
pub struct TopWalker {
    mountains: Vec<Mountain>,
}

impl WalkerPersonality for TopWalker {
    fn select_branch(&self, _top: &Trail, _bottom: &Trail) -> Branch {
        Branch::Top
    }

    fn add_mountain(&mut self, mountain: &Mountain) {
        self.mountains.push(mountain.clone());
    }

    fn mountains(&self) -> &[Mountain] {
        &self.mountains
    }
}

/// Always takes the bottom branch.
#[derive(Default)]
pub struct BottomWalker {
    mountains: Vec<Mountain>,
}

impl WalkerPersonality for BottomWalker {
    fn select_branch(&self, _top: &Trail, _bottom: &Trail) -> Branch {
        Branch::Bottom
    }

    fn add_mountain(&mut self, mountain: &Mountain) {
        self.mountains.push(mountain.clone());
    }

    fn mountains(&self) -> &[Mountain] {
        &self.mountains
    }
}

/// Peeks at the first mountain on each branch and dodges difficulty.
///
/// Takes the branch whose first mountain is easier; if only one branch
/// starts with a mountain, takes the other; if neither does, takes the top.
#[derive(Default)]
pub struct LazyWalker {
    mountains: Vec<Mountain>,
}

impl WalkerPersonality for LazyWalker {
    fn select_branch(&self, top: &Trail, bottom: &Trail) -> Branch {
        match (top.first_mountain(), bottom.first_mountain()) {
            (Some(top_mountain), Some(bottom_mountain)) => {
                if top_mountain.difficulty < bottom_mountain.difficulty {
                    Branch::Top
                } else {
                    Branch::Bottom
                }
            }
            (Some(_), None) => Branch::Bottom,
            (None, _) => Branch::Top,
        }
    }

    fn add_mountain(&mut self, mountain: &Mountain) {
        self.mountains.push(mountain.clone());
    }

    fn mountains(&self) -> &[Mountain] {
        &self.mountains
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trail::path::{TrailSplit, TrailStore};

    fn mountain(name: &str, difficulty: u32) -> Mountain {
        Mountain::new(name, difficulty, 10)
    }

    fn split(top: Trail, bottom: Trail) -> Trail {
        Trail::from_store(TrailStore::Split(TrailSplit {
            top,
            bottom,
            following: Trail::empty(),
        }))
    }

    #[test]
    fn test_lazy_walker_prefers_easier_first_mountain() {
        let walker = LazyWalker::default();
        let easy_top = split(
            Trail::empty().add_mountain_before(mountain("easy", 1)),
            Trail::empty().add_mountain_before(mountain("hard", 9)),
        );
        let Some(TrailStore::Split(s)) = easy_top.store() else {
            panic!("split trail");
        };
        assert_eq!(walker.select_branch(&s.top, &s.bottom), Branch::Top);
        // Tie goes to the bottom branch.
        assert_eq!(walker.select_branch(&s.bottom, &s.bottom), Branch::Bottom);
    }

    #[test]
    fn test_lazy_walker_avoids_the_only_mountain() {
        let walker = LazyWalker::default();
        let top_only = Trail::empty().add_mountain_before(mountain("lonely", 5));
        assert_eq!(
            walker.select_branch(&top_only, &Trail::empty()),
            Branch::Bottom
        );
        assert_eq!(
            walker.select_branch(&Trail::empty(), &top_only),
            Branch::Top
        );
        assert_eq!(
            walker.select_branch(&Trail::empty(), &Trail::empty()),
            Branch::Top
        );
    }
}
