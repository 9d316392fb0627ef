use cairn::trail::walker::{BottomWalker, LazyWalker, TopWalker, WalkerPersonality};
use cairn::{Mountain, Trail, TrailSeries, TrailSplit, TrailStore};

fn mountain(name: &str, difficulty: u32) -> Mountain {
    Mountain::new(name, difficulty, 10)
}

/// ```text
///    /--top-easy---\      /--(empty)--\
/// --<               >----<             >--final--
///    \--bottom-hard/      \--detour---/
/// ```
fn demo_trail() -> Trail {
    let inner = Trail::from_store(TrailStore::Split(TrailSplit {
        top: Trail::empty(),
        bottom: Trail::empty().add_mountain_before(mountain("detour", 4)),
        following: Trail::empty().add_mountain_before(mountain("final", 3)),
    }));
    Trail::from_store(TrailStore::Split(TrailSplit {
        top: Trail::empty().add_mountain_before(mountain("top-easy", 2)),
        bottom: Trail::empty().add_mountain_before(mountain("bottom-hard", 8)),
        following: inner,
    }))
}

fn names(walker: &dyn WalkerPersonality) -> Vec<&str> {
    walker.mountains().iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn walkers_follow_their_personality() {
    let trail = demo_trail();

    let mut top = TopWalker::default();
    trail.follow_path(&mut top);
    assert_eq!(names(&top), vec!["top-easy", "final"]);

    let mut bottom = BottomWalker::default();
    trail.follow_path(&mut bottom);
    assert_eq!(names(&bottom), vec!["bottom-hard", "detour", "final"]);

    // Lazy: easier first mountain at the outer split, then the branch
    // without any mountain at the inner one.
    let mut lazy = LazyWalker::default();
    trail.follow_path(&mut lazy);
    assert_eq!(names(&lazy), vec!["top-easy", "final"]);
}

#[test]
fn following_a_trail_does_not_mutate_it() {
    let trail = demo_trail();
    let snapshot = trail.clone();

    let mut walker = TopWalker::default();
    trail.follow_path(&mut walker);
    trail.follow_path(&mut walker);

    assert_eq!(trail, snapshot);
    // Two walks over an unchanged trail record the same mountains twice.
    assert_eq!(walker.mountains().len(), 4);
}

#[test]
fn collect_all_mountains_sees_every_branch() {
    let mut found: Vec<String> = demo_trail()
        .collect_all_mountains()
        .into_iter()
        .map(|m| m.name)
        .collect();
    found.sort();
    assert_eq!(found, vec!["bottom-hard", "detour", "final", "top-easy"]);
}

#[test]
fn length_k_paths_enumerates_branch_choices() {
    let trail = demo_trail();

    let two_paths = trail.length_k_paths(2);
    let two: Vec<Vec<&str>> = two_paths
        .iter()
        .map(|path| path.iter().map(|m| m.name.as_str()).collect())
        .collect();
    assert_eq!(
        two,
        vec![
            vec!["top-easy", "final"],
            vec!["bottom-hard", "final"],
        ]
    );

    let three = trail.length_k_paths(3);
    assert_eq!(three.len(), 2);
    assert!(trail.length_k_paths(5).is_empty());
}

#[test]
fn builder_operations_round_trip() {
    let series = TrailSeries {
        mountain: mountain("start", 1),
        following: Trail::empty(),
    };
    let series = series
        .add_mountain_after(mountain("middle", 2))
        .add_empty_branch_after();

    let trail = Trail::from_store(TrailStore::Series(series));
    let all = trail.collect_all_mountains();
    assert_eq!(all.len(), 2);

    let mut walker = TopWalker::default();
    trail.follow_path(&mut walker);
    assert_eq!(names(&walker), vec!["start", "middle"]);
}
