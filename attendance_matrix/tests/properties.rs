use std::collections::BTreeMap;

use attendance_matrix::*;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn label(name: &str) -> EventLabel {
    EventLabel::new("2024", name)
}

fn events(entries: Vec<(&str, Vec<MemberId>)>) -> BTreeMap<EventLabel, Vec<MemberId>> {
    entries
        .into_iter()
        .map(|(name, ids)| (label(name), ids))
        .collect()
}

// A larger table for the properties: 40 members, 5 events with different patterns.
fn sample_table() -> (AttendanceTable, Vec<EventLabel>) {
    let members: Vec<MemberId> = (100..140).collect();
    let evs = events(vec![
        ("A", (100..120).collect()),
        ("B", (110..140).step_by(2).collect()),
        ("C", (100..140).step_by(3).collect()),
        ("D", vec![101, 105, 105, 999, 137]),
        ("E", vec![]),
    ]);
    let labels: Vec<EventLabel> = evs.keys().cloned().collect();
    (build_attendance(&members, &evs), labels)
}

#[test]
fn row_completeness_and_cells() {
    init();
    let members: Vec<MemberId> = vec![5, 3, 9, 3];
    let evs = events(vec![("A", vec![3, 4]), ("B", vec![9, 9, 5]), ("C", vec![])]);
    let table = build_attendance(&members, &evs);
    assert_eq!(table.num_rows(), members.len());
    assert_eq!(table.num_columns(), evs.len());
    for (row, mid) in members.iter().enumerate() {
        for (l, ids) in evs.iter() {
            assert_eq!(table.cell(row, l), Some(ids.contains(mid)));
        }
    }
}

#[test]
fn scenario_query() {
    init();
    let evs = events(vec![("A", vec![1, 2]), ("B", vec![2, 3])]);
    let table = build_attendance(&[1, 2, 3], &evs);
    assert_eq!(table.row(0), Some(vec![true, false]));
    assert_eq!(table.row(1), Some(vec![true, true]));
    assert_eq!(table.row(2), Some(vec![false, true]));

    let both = query_attendance(&table, &[label("A"), label("B")], None).unwrap();
    assert_eq!(both.table.members(), &[2]);
    assert_eq!(both.count, 1);

    let only_a = query_attendance(&table, &[label("A")], Some(&[label("B")][..])).unwrap();
    assert_eq!(only_a.table.members(), &[1]);
    assert_eq!(only_a.count, 1);
}

#[test]
fn conflict_always_fails() {
    init();
    let (table, labels) = sample_table();
    for l in labels.iter() {
        let required = vec![labels[0].clone(), l.clone()];
        let excluded = vec![l.clone()];
        assert_eq!(
            query_attendance(&table, &required, Some(&excluded[..])).map(|r| r.count),
            Err(AttendanceError::Conflict { label: l.clone() })
        );
    }
}

#[test]
fn monotonicity() {
    init();
    let (table, labels) = sample_table();
    let mut required: Vec<EventLabel> = vec![];
    let mut last = query_attendance(&table, &required, None).unwrap().count;
    for l in labels.iter() {
        required.push(l.clone());
        let count = query_attendance(&table, &required, None).unwrap().count;
        assert!(count <= last, "{} > {} after requiring {}", count, last, l);
        last = count;
    }

    let required = vec![labels[0].clone()];
    let mut excluded: Vec<EventLabel> = vec![];
    let mut last = query_attendance(&table, &required, Some(&excluded[..]))
        .unwrap()
        .count;
    for l in labels.iter().skip(1) {
        excluded.push(l.clone());
        let count = query_attendance(&table, &required, Some(&excluded[..]))
            .unwrap()
            .count;
        assert!(count <= last, "{} > {} after excluding {}", count, last, l);
        last = count;
    }
}

#[test]
fn diagonal_symmetry_and_bounds() {
    init();
    let (table, labels) = sample_table();
    let matrix = compute_overlap(&table, &labels).matrix;
    for (i, l) in labels.iter().enumerate() {
        assert_eq!(Some(matrix.get(i, i)), table.column_total(l));
        // Independent of the other columns.
        let alone = compute_overlap(&table, &[l.clone()]).matrix;
        assert_eq!(alone.get(0, 0), matrix.get(i, i));
        for j in 0..labels.len() {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
        }
    }

    let pct = matrix.percentages();
    for (i, row) in pct.values.iter().enumerate() {
        for v in row.iter() {
            assert!((0.0..=100.0).contains(v), "{} out of bounds", v);
        }
        let expected = if matrix.get(i, i) == 0 { 0.0 } else { 100.0 };
        assert_eq!(row[i], expected);
    }
}

#[test]
fn scenario_overlap() {
    init();
    // A=[T,T,F], B=[T,F,F], C=[F,F,T]
    let evs = events(vec![("A", vec![1, 2]), ("B", vec![1]), ("C", vec![3])]);
    let table = build_attendance(&[1, 2, 3], &evs);
    let report = compute_overlap(&table, &[label("A"), label("B"), label("C")]);
    assert!(report.warnings.is_empty());
    assert_eq!(
        report.matrix.counts,
        vec![vec![2, 1, 0], vec![1, 1, 0], vec![0, 0, 1]]
    );
    let pct = report.matrix.percentages();
    assert_eq!(pct.values[0], vec![100.0, 50.0, 0.0]);
}

#[test]
fn overlap_follows_caller_order() {
    init();
    let evs = events(vec![("A", vec![1, 2]), ("B", vec![1])]);
    let table = build_attendance(&[1, 2, 3], &evs);
    let report = compute_overlap(&table, &[label("B"), label("A")]);
    assert_eq!(report.matrix.counts, vec![vec![1, 1], vec![1, 2]]);
    assert_eq!(report.matrix.labels, vec![label("B"), label("A")]);
}

#[test]
fn scenario_year_resolution() {
    init();
    let mut store = RosterStore::new();
    store
        .add_member_roster(EventLabel::new("2023", "MEMBERS"), vec![1, 2])
        .unwrap();
    store
        .add_member_roster(EventLabel::new("2024", "MEMBERS"), vec![3, 4, 5])
        .unwrap();
    store
        .add_event(EventLabel::new("2023", "ANNUAL"), vec![1])
        .unwrap();
    store
        .add_event(EventLabel::new("2024", "ANNUAL"), vec![3])
        .unwrap();
    store
        .add_event(EventLabel::new("2024", "WINTER"), vec![4, 5])
        .unwrap();

    let scope = store.resolve_year("2024").unwrap();
    assert_eq!(scope.members, vec![3, 4, 5]);
    assert_eq!(scope.member_label, EventLabel::new("2024", "MEMBERS"));
    let names: Vec<String> = scope.events.keys().map(|l| l.name.clone()).collect();
    assert_eq!(names, vec!["ANNUAL".to_string(), "WINTER".to_string()]);

    assert_eq!(
        store.resolve_year("205"),
        Err(AttendanceError::NotFound {
            year: "205".to_string(),
            kind: RosterKind::MemberRoster
        })
    );
    // No partial match on the year.
    assert!(matches!(
        store.resolve_year("202"),
        Err(AttendanceError::NotFound { .. })
    ));
}
