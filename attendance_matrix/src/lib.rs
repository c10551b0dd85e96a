mod config;
use log::{debug, info, warn};

use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;

pub use crate::config::*;

pub mod builder;
pub mod manual;

use crate::builder::Builder;

/// Builds the attendance table of the given members for the given events.
///
/// Arguments:
/// * `member_ids` the rows of the table, in order. Duplicates are kept.
/// * `events` the registrations of each event. Each key becomes a column.
///
/// A cell is true when the member id of the row appears in the registrations of the
/// event of the column.
pub fn build_attendance(
    member_ids: &[MemberId],
    events: &BTreeMap<EventLabel, Vec<MemberId>>,
) -> AttendanceTable {
    info!(
        "Building attendance of {:?} members over {:?} events",
        member_ids.len(),
        events.len()
    );
    let mut builder = Builder::new(member_ids);
    // Keys of a map are distinct: no duplicate check needed.
    for (label, registrations) in events.iter() {
        builder.push_column(label, registrations);
    }
    builder.build()
}

/// All the rosters known to the program: the registrations of each event and the
/// member roster of each year.
///
/// The store is filled once by the loading layer and then only borrowed.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RosterStore {
    events: BTreeMap<EventLabel, Vec<MemberId>>,
    member_rosters: BTreeMap<EventLabel, Vec<MemberId>>,
}

impl RosterStore {
    pub fn new() -> RosterStore {
        RosterStore::default()
    }

    pub fn add_event(
        &mut self,
        label: EventLabel,
        registrations: Vec<MemberId>,
    ) -> Result<(), AttendanceError> {
        insert_unique(&mut self.events, label, registrations)
    }

    pub fn add_member_roster(
        &mut self,
        label: EventLabel,
        members: Vec<MemberId>,
    ) -> Result<(), AttendanceError> {
        insert_unique(&mut self.member_rosters, label, members)
    }

    pub fn events(&self) -> &BTreeMap<EventLabel, Vec<MemberId>> {
        &self.events
    }

    pub fn member_rosters(&self) -> &BTreeMap<EventLabel, Vec<MemberId>> {
        &self.member_rosters
    }

    /// All the years that have at least one event or member roster, sorted.
    pub fn years(&self) -> Vec<String> {
        let years: HashSet<&String> = self
            .events
            .keys()
            .chain(self.member_rosters.keys())
            .map(|l| &l.year)
            .collect();
        let mut res: Vec<String> = years.into_iter().cloned().collect();
        res.sort();
        res
    }

    /// Selects the member roster and the events of one year.
    ///
    /// The year is compared exactly with the year of each label: `"202"` does not
    /// select `"2024"`. Exactly one member roster must exist for the year, and at
    /// least one event.
    pub fn resolve_year(&self, year: impl Display) -> Result<YearScope, AttendanceError> {
        let year = year.to_string().trim().to_string();
        let rosters: Vec<(&EventLabel, &Vec<MemberId>)> = self
            .member_rosters
            .iter()
            .filter(|(l, _)| l.year == year)
            .collect();
        let (member_label, members) = match rosters.as_slice() {
            [] => {
                return Err(AttendanceError::NotFound {
                    year,
                    kind: RosterKind::MemberRoster,
                })
            }
            [(l, m)] => ((*l).clone(), (*m).clone()),
            _ => {
                return Err(AttendanceError::AmbiguousMatch {
                    year,
                    labels: rosters.iter().map(|(l, _)| (*l).clone()).collect(),
                })
            }
        };
        let events: BTreeMap<EventLabel, Vec<MemberId>> = self
            .events
            .iter()
            .filter(|(l, _)| l.year == year)
            .map(|(l, r)| (l.clone(), r.clone()))
            .collect();
        if events.is_empty() {
            return Err(AttendanceError::NotFound {
                year,
                kind: RosterKind::Events,
            });
        }
        debug!(
            "resolve_year: {}: member roster {} ({} members), {} events",
            year,
            member_label,
            members.len(),
            events.len()
        );
        Ok(YearScope {
            year,
            member_label,
            members,
            events,
        })
    }
}

fn insert_unique(
    map: &mut BTreeMap<EventLabel, Vec<MemberId>>,
    label: EventLabel,
    ids: Vec<MemberId>,
) -> Result<(), AttendanceError> {
    if map.contains_key(&label) {
        return Err(AttendanceError::DuplicateLabel { label });
    }
    map.insert(label, ids);
    Ok(())
}

/// Finds the members who attended all the `required` events and none of the
/// `excluded` events.
///
/// The rows of the result keep the order of the table. Without any required event,
/// every row that passes the exclusions matches.
///
/// Fails before looking at the table if a label is both required and excluded.
pub fn query_attendance(
    table: &AttendanceTable,
    required: &[EventLabel],
    excluded: Option<&[EventLabel]>,
) -> Result<QueryResult, AttendanceError> {
    let excluded = excluded.unwrap_or(&[]);
    let excluded_set: HashSet<&EventLabel> = excluded.iter().collect();
    if let Some(label) = required.iter().find(|l| excluded_set.contains(l)) {
        return Err(AttendanceError::Conflict {
            label: label.clone(),
        });
    }

    let required_cols = lookup_columns(table, required)?;
    let excluded_cols = lookup_columns(table, excluded)?;

    let rows: Vec<usize> = (0..table.num_rows())
        .filter(|r| {
            required_cols.iter().all(|col| col[*r]) && !excluded_cols.iter().any(|col| col[*r])
        })
        .collect();
    debug!(
        "query_attendance: required {:?} excluded {:?}: {} of {} rows",
        required,
        excluded,
        rows.len(),
        table.num_rows()
    );
    let count = rows.len();
    Ok(QueryResult {
        table: table.select_rows(&rows),
        count,
    })
}

fn lookup_columns<'a>(
    table: &'a AttendanceTable,
    labels: &[EventLabel],
) -> Result<Vec<&'a [bool]>, AttendanceError> {
    labels
        .iter()
        .map(|l| {
            table
                .column(l)
                .ok_or_else(|| AttendanceError::UnknownLabel { label: l.clone() })
        })
        .collect()
}

/// Counts the attendees of each event and of each pair of events.
///
/// The matrix follows the order of `labels`. A label that is not a column of the
/// table does not stop the computation: the pairs that involve it stay at zero and a
/// warning is returned for it.
pub fn compute_overlap(table: &AttendanceTable, labels: &[EventLabel]) -> OverlapReport {
    let n = labels.len();
    let mut counts: Vec<Vec<u64>> = vec![vec![0; n]; n];
    let mut warnings: Vec<MissingColumnWarning> = Vec::new();

    let columns: Vec<Option<&[bool]>> = labels.iter().map(|l| table.column(l)).collect();
    for (label, col) in labels.iter().zip(columns.iter()) {
        if col.is_none() {
            warn!(
                "Column {} not found in the attendance data. Skipping its pairs.",
                label
            );
            warnings.push(MissingColumnWarning {
                label: label.clone(),
            });
        }
    }

    for i in 0..n {
        let col_i = match columns[i] {
            Some(c) => c,
            None => continue,
        };
        counts[i][i] = col_i.iter().filter(|b| **b).count() as u64;
        for j in (i + 1)..n {
            if let Some(col_j) = columns[j] {
                let overlap = col_i
                    .iter()
                    .zip(col_j.iter())
                    .filter(|(a, b)| **a && **b)
                    .count() as u64;
                counts[i][j] = overlap;
                counts[j][i] = overlap;
            }
        }
    }
    debug!("compute_overlap: {:?}: {:?}", labels, counts);

    OverlapReport {
        matrix: OverlapMatrix {
            labels: labels.to_vec(),
            counts,
        },
        warnings,
    }
}
