use std::cmp::Ordering;

/// A mountain on a trail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mountain {
    pub name: String,
    pub difficulty: u32,
    pub length: u32,
}

impl Mountain {
    pub fn new(name: &str, difficulty: u32, length: u32) -> Self {
        Mountain {
            name: name.to_string(),
            difficulty,
            length,
        }
    }
}

/// Mountains rank by length, then difficulty, then name.
impl Ord for Mountain {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.length, self.difficulty, &self.name).cmp(&(
            other.length,
            other.difficulty,
            &other.name,
        ))
    }
}

impl PartialOrd for Mountain {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
