use super::*;
use crate::migration::MigrationPair;
use std::path::PathBuf;

// ── Helpers ────────────────────────────────────────────────────────────

fn file(version: u64, name: &str, direction: Direction) -> MigrationFile {
    let file_name = MigrationFile::file_name_for(Version::new(version), name, direction, "sql");
    MigrationFile {
        version: Version::new(version),
        direction,
        name: name.to_string(),
        path: PathBuf::from("/migrations").join(&file_name),
        file_name,
    }
}

fn catalog(versions: &[u64]) -> Catalog {
    Catalog::from_pairs(
        "/migrations",
        "sql",
        versions.iter().map(|&v| {
            let name = format!("m{v}");
            MigrationPair {
                version: Version::new(v),
                name: name.clone(),
                up: file(v, &name, Direction::Up),
                down: file(v, &name, Direction::Down),
            }
        }),
    )
}

fn v(n: u64) -> Version {
    Version::new(n)
}

/// `(direction, version)` for every file in the schedule.
fn steps(schedule: &Schedule) -> Vec<(Direction, u64)> {
    schedule
        .files()
        .map(|f| (f.direction, f.version.get()))
        .collect()
}

fn ups(versions: &[u64]) -> Vec<(Direction, u64)> {
    versions.iter().map(|&v| (Direction::Up, v)).collect()
}

fn downs(versions: &[u64]) -> Vec<(Direction, u64)> {
    versions.iter().map(|&v| (Direction::Down, v)).collect()
}

// ── Up / Down ──────────────────────────────────────────────────────────

#[test]
fn test_up_from_zero_is_ascending() {
    let cat = catalog(&[1, 2, 3]);
    let schedule = plan(Version::ZERO, &cat, Request::Up).unwrap();
    assert_eq!(steps(&schedule), ups(&[1, 2, 3]));
    assert_eq!(schedule.phases().len(), 1);
    assert_eq!(schedule.phases()[0].direction(), Direction::Up);
}

#[test]
fn test_up_is_strictly_ascending_and_above_current() {
    let cat = catalog(&[3, 7, 20230101000000, 20230102000000, 20240101000000]);
    for current in [0, 3, 5, 7, 20230101000000, 20240101000000] {
        let schedule = plan(v(current), &cat, Request::Up).unwrap();
        let versions: Vec<u64> = schedule.files().map(|f| f.version.get()).collect();
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
        assert!(versions.iter().all(|&x| x > current));
        assert!(schedule.files().all(|f| f.direction == Direction::Up));
    }
}

#[test]
fn test_up_with_nothing_pending_is_empty() {
    let cat = catalog(&[1, 2, 3]);
    let schedule = plan(v(3), &cat, Request::Up).unwrap();
    assert!(schedule.is_empty());
    assert_eq!(schedule.len(), 0);
}

#[test]
fn test_up_on_empty_catalog_is_empty() {
    let cat = catalog(&[]);
    assert!(plan(Version::ZERO, &cat, Request::Up).unwrap().is_empty());
    assert!(plan(Version::ZERO, &cat, Request::Down).unwrap().is_empty());
}

#[test]
fn test_down_from_top_is_descending() {
    let cat = catalog(&[1, 2, 3]);
    let schedule = plan(v(3), &cat, Request::Down).unwrap();
    assert_eq!(steps(&schedule), downs(&[3, 2, 1]));
    assert_eq!(schedule.resulting_version(&cat, v(3)), Version::ZERO);
}

#[test]
fn test_down_from_middle_only_reverts_applied() {
    let cat = catalog(&[1, 2, 3]);
    let schedule = plan(v(2), &cat, Request::Down).unwrap();
    assert_eq!(steps(&schedule), downs(&[2, 1]));
}

// ── Relative ───────────────────────────────────────────────────────────

#[test]
fn test_relative_zero_is_empty() {
    let cat = catalog(&[1, 2, 3]);
    assert!(plan(v(1), &cat, Request::Relative(0)).unwrap().is_empty());
}

#[test]
fn test_relative_positive_truncates() {
    let cat = catalog(&[1, 2, 3]);
    let schedule = plan(v(1), &cat, Request::Relative(1)).unwrap();
    assert_eq!(steps(&schedule), ups(&[2]));

    let schedule = plan(Version::ZERO, &cat, Request::Relative(10)).unwrap();
    assert_eq!(steps(&schedule), ups(&[1, 2, 3]));
}

#[test]
fn test_relative_negative_two_from_three() {
    let cat = catalog(&[1, 2, 3]);
    let schedule = plan(v(3), &cat, Request::Relative(-2)).unwrap();
    assert_eq!(steps(&schedule), downs(&[3, 2]));
    assert_eq!(schedule.resulting_version(&cat, v(3)), v(1));
}

#[test]
fn test_relative_extremes_do_not_overflow() {
    let cat = catalog(&[1, 2, 3]);
    let schedule = plan(v(3), &cat, Request::Relative(i64::MIN)).unwrap();
    assert_eq!(steps(&schedule), downs(&[3, 2, 1]));
    let schedule = plan(Version::ZERO, &cat, Request::Relative(i64::MAX)).unwrap();
    assert_eq!(steps(&schedule), ups(&[1, 2, 3]));
}

#[test]
fn test_relative_round_trip_restores_version() {
    let cat = catalog(&[2, 4, 8, 16, 32]);
    for start in [0u64, 2, 8, 32] {
        for n in 1..=6i64 {
            let forward = plan(v(start), &cat, Request::Relative(n)).unwrap();
            let mid = forward.resulting_version(&cat, v(start));
            let applied = i64::try_from(forward.len()).unwrap();

            let back = plan(mid, &cat, Request::Relative(-applied)).unwrap();
            assert_eq!(
                back.resulting_version(&cat, mid),
                v(start),
                "start={start} n={n}"
            );
        }
    }
}

// ── Goto ───────────────────────────────────────────────────────────────

#[test]
fn test_goto_current_is_empty() {
    let cat = catalog(&[1, 2, 3]);
    for current in [0u64, 1, 2, 3] {
        let schedule = plan(v(current), &cat, Request::Goto(current as i64)).unwrap();
        assert!(schedule.is_empty(), "goto {current} from {current}");
    }
}

#[test]
fn test_goto_down_matches_relative() {
    let cat = catalog(&[1, 2, 3]);
    let goto = plan(v(3), &cat, Request::Goto(1)).unwrap();
    let relative = plan(v(3), &cat, Request::Relative(-2)).unwrap();
    assert_eq!(goto, relative);
    assert_eq!(steps(&goto), downs(&[3, 2]));
}

#[test]
fn test_goto_up_matches_relative() {
    let cat = catalog(&[1, 2, 3]);
    let goto = plan(Version::ZERO, &cat, Request::Goto(2)).unwrap();
    assert_eq!(goto, plan(Version::ZERO, &cat, Request::Relative(2)).unwrap());
    assert_eq!(steps(&goto), ups(&[1, 2]));
}

#[test]
fn test_goto_zero_unwinds_everything() {
    let cat = catalog(&[1, 2, 3]);
    let schedule = plan(v(3), &cat, Request::Goto(0)).unwrap();
    assert_eq!(steps(&schedule), downs(&[3, 2, 1]));
}

#[test]
fn test_goto_negative_is_invalid() {
    let cat = catalog(&[1, 2, 3]);
    let err = plan(v(3), &cat, Request::Goto(-1)).unwrap_err();
    assert!(matches!(err, CoreError::InvalidTarget { target: -1 }));
    assert!(err.is_planning());
}

#[test]
fn test_goto_between_sparse_versions_stops_at_boundary() {
    let cat = catalog(&[10, 20, 30]);

    let up = plan(Version::ZERO, &cat, Request::Goto(25)).unwrap();
    assert_eq!(steps(&up), ups(&[10, 20]));
    assert_eq!(up.resulting_version(&cat, Version::ZERO), v(20));

    let down = plan(v(30), &cat, Request::Goto(15)).unwrap();
    assert_eq!(steps(&down), downs(&[30, 20]));
    assert_eq!(down.resulting_version(&cat, v(30)), v(10));
}

#[test]
fn test_goto_beyond_latest_applies_all() {
    let cat = catalog(&[1, 2, 3]);
    let schedule = plan(Version::ZERO, &cat, Request::Goto(99)).unwrap();
    assert_eq!(steps(&schedule), ups(&[1, 2, 3]));
}

// ── Reset ──────────────────────────────────────────────────────────────

#[test]
fn test_reset_is_two_phases() {
    let cat = catalog(&[1, 2, 3]);
    let schedule = plan(v(2), &cat, Request::Reset).unwrap();

    assert_eq!(schedule.phases().len(), 2);
    assert_eq!(steps(&schedule), {
        let mut expected = downs(&[2, 1]);
        expected.extend(ups(&[1, 2, 3]));
        expected
    });
    assert_eq!(schedule.resulting_version(&cat, v(2)), v(3));
}

#[test]
fn test_reset_from_zero_is_just_up() {
    let cat = catalog(&[1, 2]);
    let schedule = plan(Version::ZERO, &cat, Request::Reset).unwrap();
    assert_eq!(schedule.phases().len(), 1);
    assert_eq!(steps(&schedule), ups(&[1, 2]));
}

// ── Redo ───────────────────────────────────────────────────────────────

#[test]
fn test_redo_reverts_and_reapplies_current() {
    let cat = catalog(&[1, 2, 3]);
    let schedule = plan(v(2), &cat, Request::Redo).unwrap();

    assert_eq!(schedule.phases().len(), 2);
    assert_eq!(steps(&schedule), vec![(Direction::Down, 2), (Direction::Up, 2)]);
    assert_eq!(schedule.resulting_version(&cat, v(2)), v(2));
}

#[test]
fn test_redo_equals_back_one_then_forward_one() {
    let cat = catalog(&[1, 2, 3]);
    let back = plan(v(3), &cat, Request::Relative(-1)).unwrap();
    let mid = back.resulting_version(&cat, v(3));
    let forward = plan(mid, &cat, Request::Relative(1)).unwrap();

    let redo = plan(v(3), &cat, Request::Redo).unwrap();
    let combined: Vec<_> = back.files().chain(forward.files()).cloned().collect();
    let redo_files: Vec<_> = redo.files().cloned().collect();
    assert_eq!(redo_files, combined);
}

#[test]
fn test_redo_with_nothing_applied_fails() {
    let cat = catalog(&[1, 2, 3]);
    let err = plan(Version::ZERO, &cat, Request::Redo).unwrap_err();
    assert!(matches!(err, CoreError::NoMigrationsApplied));
    assert!(err.is_planning());
}

#[test]
fn test_request_display() {
    assert_eq!(Request::Relative(-2).to_string(), "migrate -2");
    assert_eq!(Request::Relative(3).to_string(), "migrate +3");
    assert_eq!(Request::Goto(5).to_string(), "goto 5");
    assert_eq!(Request::Reset.to_string(), "reset");
}
