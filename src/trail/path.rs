use crate::trail::mountain::Mountain;
use crate::trail::walker::{Branch, WalkerPersonality};

/// A trail: either empty or one store node followed by the rest.
///
/// Trails are immutable values; the builder operations consume their input
/// and return the extended structure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trail {
    store: Option<Box<TrailStore>>,
}

/// The two node shapes a non-empty trail can start with.
#[derive(Debug, Clone, PartialEq)]
pub enum TrailStore {
    /// A mountain followed by the rest of the trail.
    Series(TrailSeries),
    /// A fork into two branches that rejoin before a following trail.
    Split(TrailSplit),
}

/// A mountain, followed by the rest of the trail.
///
/// `--mountain--following--`
#[derive(Debug, Clone, PartialEq)]
pub struct TrailSeries {
    pub mountain: Mountain,
    pub following: Trail,
}

/// A split in the trail.
///
/// ```text
///    ___path_top____
///   /               \
/// -<                 >-following-
///   \__path_bottom__/
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrailSplit {
    pub top: Trail,
    pub bottom: Trail,
    pub following: Trail,
}

impl TrailSeries {
    /// Removes the mountain at the beginning of this series.
    pub fn remove_mountain(self) -> Trail {
        self.following
    }

    /// Adds a mountain in series before the current one.
    pub fn add_mountain_before(self, mountain: Mountain) -> TrailSeries {
        TrailSeries {
            mountain,
            following: Trail::from_store(TrailStore::Series(self)),
        }
    }

    /// Adds a mountain after the current mountain, but before the following trail.
    pub fn add_mountain_after(self, mountain: Mountain) -> TrailSeries {
        TrailSeries {
            mountain: self.mountain,
            following: self.following.add_mountain_before(mountain),
        }
    }

    /// Adds an empty branch, where the current series becomes the following path.
    pub fn add_empty_branch_before(self) -> TrailSplit {
        TrailSplit {
            top: Trail::empty(),
            bottom: Trail::empty(),
            following: Trail::from_store(TrailStore::Series(self)),
        }
    }

    /// Adds an empty branch after the current mountain, but before the following trail.
    pub fn add_empty_branch_after(self) -> TrailSeries {
        TrailSeries {
            mountain: self.mountain,
            following: self.following.add_empty_branch_before(),
        }
    }
}

impl TrailSplit {
    /// Removes the branch, leaving just the following trail.
    pub fn remove_branch(self) -> Trail {
        self.following
    }
}

impl Trail {
    pub fn empty() -> Self {
        Trail { store: None }
    }

    pub fn from_store(store: TrailStore) -> Self {
        Trail {
            store: Some(Box::new(store)),
        }
    }

    pub fn store(&self) -> Option<&TrailStore> {
        self.store.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_none()
    }

    /// Adds a mountain before everything currently in the trail.
    pub fn add_mountain_before(self, mountain: Mountain) -> Trail {
        Trail::from_store(TrailStore::Series(TrailSeries {
            mountain,
            following: self,
        }))
    }

    /// Adds an empty branch before everything currently in the trail.
    pub fn add_empty_branch_before(self) -> Trail {
        Trail::from_store(TrailStore::Split(TrailSplit {
            top: Trail::empty(),
            bottom: Trail::empty(),
            following: self,
        }))
    }

    /// The first mountain of the trail, if it starts with one.
    pub fn first_mountain(&self) -> Option<&Mountain> {
        match self.store() {
            Some(TrailStore::Series(series)) => Some(&series.mountain),
            _ => None,
        }
    }

    /// Follows the trail with `walker` choosing a branch at every split.
    ///
    /// A pure recursive descent: the walker accumulates the mountains it
    /// passes and the trail itself is never modified. At a split the chosen
    /// branch is walked first, then the following trail.
    pub fn follow_path(&self, walker: &mut dyn WalkerPersonality) {
        match self.store() {
            None => {}
            Some(TrailStore::Series(series)) => {
                walker.add_mountain(&series.mountain);
                series.following.follow_path(walker);
            }
            Some(TrailStore::Split(split)) => {
                let branch = match walker.select_branch(&split.top, &split.bottom) {
                    Branch::Top => &split.top,
                    Branch::Bottom => &split.bottom,
                };
                branch.follow_path(walker);
                split.following.follow_path(walker);
            }
        }
    }

    /// Returns every mountain on the trail, both branches included.
    pub fn collect_all_mountains(&self) -> Vec<Mountain> {
        let mut mountains = Vec::new();
        self.collect_into(&mut mountains);
        mountains
    }

    fn collect_into(&self, out: &mut Vec<Mountain>) {
        match self.store() {
            None => {}
            Some(TrailStore::Series(series)) => {
                out.push(series.mountain.clone());
                series.following.collect_into(out);
            }
            Some(TrailStore::Split(split)) => {
                split.top.collect_into(out);
                split.bottom.collect_into(out);
                split.following.collect_into(out);
            }
        }
    }

    /// Returns all start-to-end walks containing exactly `k` mountains.
    ///
    /// Paths are distinct per branch choice, even when two choices produce
    /// the same mountain sequence.
    pub fn length_k_paths(&self, k: usize) -> Vec<Vec<Mountain>> {
        let mut paths = Vec::new();
        let mut current = Vec::new();
        self.enumerate_paths(&[], &mut current, k, &mut paths);
        paths
    }

    /// Walks every branch combination, carrying the trails still to be
    /// walked after the current one as an explicit continuation list.
    fn enumerate_paths(
        &self,
        pending: &[&Trail],
        current: &mut Vec<Mountain>,
        k: usize,
        out: &mut Vec<Vec<Mountain>>,
    ) {
        if current.len() > k {
            return;
        }
        match self.store() {
            None => match pending.split_first() {
                Some((next, rest)) => next.enumerate_paths(rest, current, k, out),
                None => {
                    if current.len() == k {
                        out.push(current.clone());
                    }
                }
            },
            Some(TrailStore::Series(series)) => {
                current.push(series.mountain.clone());
                series.following.enumerate_paths(pending, current, k, out);
                current.pop();
            }
            Some(TrailStore::Split(split)) => {
                let mut next_pending = Vec::with_capacity(pending.len() + 1);
                next_pending.push(&split.following);
                next_pending.extend_from_slice(pending);
                split.top.enumerate_paths(&next_pending, current, k, out);
                split.bottom.enumerate_paths(&next_pending, current, k, out);
            }
        }
    }
}
