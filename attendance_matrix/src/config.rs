// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// The identifier of a member, as found in the registration exports.
///
/// Identifiers are assumed to be stable across years. They are not validated.
pub type MemberId = u64;

/// The label of one meeting instance, or of a member roster.
///
/// Labels are written `"<year> <name>"`, for example `"2024 ANNUAL"`. The year is
/// kept as a separate field so that selecting a year is an exact comparison.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct EventLabel {
    pub year: String,
    pub name: String,
}

impl EventLabel {
    pub fn new(year: &str, name: &str) -> EventLabel {
        EventLabel {
            year: year.to_string(),
            name: name.to_string(),
        }
    }

    /// Parses a label of the form `"<year> <name>"`.
    ///
    /// The year must be made of exactly 4 digits and the name may not be empty.
    /// Extra whitespace around and between the two parts is ignored.
    pub fn parse(s: &str) -> Result<EventLabel, AttendanceError> {
        let invalid = || AttendanceError::InvalidLabel {
            label: s.to_string(),
        };
        let (year, name) = s.trim().split_once(char::is_whitespace).ok_or_else(invalid)?;
        let name = name.trim();
        if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) || name.is_empty() {
            return Err(invalid());
        }
        Ok(EventLabel::new(year, name))
    }
}

impl Display for EventLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.year, self.name)
    }
}

/// The rosters selected for one year: exactly one member roster and all the events.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct YearScope {
    pub year: String,
    pub member_label: EventLabel,
    pub members: Vec<MemberId>,
    pub events: std::collections::BTreeMap<EventLabel, Vec<MemberId>>,
}

// ******** Output data structures *********

/// Boolean incidence table: one row per member, one column per event.
///
/// Cells start as `false` and are only set to `true` while the table is built.
/// The table is immutable afterwards.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AttendanceTable {
    pub(crate) members: Vec<MemberId>,
    pub(crate) labels: Vec<EventLabel>,
    pub(crate) column_index: HashMap<EventLabel, usize>,
    // Column-major: columns[c][r]
    pub(crate) columns: Vec<Vec<bool>>,
}

impl AttendanceTable {
    /// The member ids, in row order.
    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    /// The event labels, in column order.
    pub fn labels(&self) -> &[EventLabel] {
        &self.labels
    }

    pub fn num_rows(&self) -> usize {
        self.members.len()
    }

    pub fn num_columns(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The cells of one event column, in row order.
    pub fn column(&self, label: &EventLabel) -> Option<&[bool]> {
        self.column_index
            .get(label)
            .map(|idx| self.columns[*idx].as_slice())
    }

    pub fn cell(&self, row: usize, label: &EventLabel) -> Option<bool> {
        self.column(label).and_then(|col| col.get(row).cloned())
    }

    /// The cells of one row, in column order.
    pub fn row(&self, row: usize) -> Option<Vec<bool>> {
        if row >= self.members.len() {
            return None;
        }
        Some(self.columns.iter().map(|col| col[row]).collect())
    }

    /// Iterates over `(member id, cells)` in row order.
    pub fn rows(&self) -> impl Iterator<Item = (MemberId, Vec<bool>)> + '_ {
        self.members
            .iter()
            .enumerate()
            .map(|(idx, mid)| (*mid, self.columns.iter().map(|col| col[idx]).collect()))
    }

    /// Number of events attended by the member of the given row.
    pub fn row_total(&self, row: usize) -> usize {
        self.columns.iter().filter(|col| col[row]).count()
    }

    /// Number of attendees of the given event.
    pub fn column_total(&self, label: &EventLabel) -> Option<u64> {
        self.column(label)
            .map(|col| col.iter().filter(|b| **b).count() as u64)
    }

    /// The members who attended at least `min_events` events, with all their columns.
    pub fn attending_at_least(&self, min_events: usize) -> AttendanceTable {
        let rows: Vec<usize> = (0..self.members.len())
            .filter(|r| self.row_total(*r) >= min_events)
            .collect();
        self.select_rows(&rows)
    }

    /// A new table with the given rows, in the given order, and all the columns.
    pub(crate) fn select_rows(&self, rows: &[usize]) -> AttendanceTable {
        AttendanceTable {
            members: rows.iter().map(|r| self.members[*r]).collect(),
            labels: self.labels.clone(),
            column_index: self.column_index.clone(),
            columns: self
                .columns
                .iter()
                .map(|col| rows.iter().map(|r| col[*r]).collect())
                .collect(),
        }
    }
}

/// The members matching a query, in the original row order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct QueryResult {
    pub table: AttendanceTable,
    pub count: usize,
}

/// Square matrix of attendance counts, indexed by the labels given by the caller.
///
/// The diagonal holds the number of attendees of each event, the other cells the
/// number of members who attended both events.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OverlapMatrix {
    pub labels: Vec<EventLabel>,
    pub counts: Vec<Vec<u64>>,
}

/// A pair of events with at least one common attendee.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OverlapEdge {
    pub source: EventLabel,
    pub target: EventLabel,
    pub value: u64,
}

impl OverlapMatrix {
    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.counts[i][j]
    }

    /// One edge per pair of distinct events with a positive overlap, each pair
    /// listed once in label order.
    pub fn edges(&self) -> Vec<OverlapEdge> {
        let mut res: Vec<OverlapEdge> = Vec::new();
        for i in 0..self.labels.len() {
            for j in (i + 1)..self.labels.len() {
                if self.counts[i][j] > 0 {
                    res.push(OverlapEdge {
                        source: self.labels[i].clone(),
                        target: self.labels[j].clone(),
                        value: self.counts[i][j],
                    });
                }
            }
        }
        res
    }

    /// Normalizes each row by its diagonal: the percentage of the attendees of
    /// event i who also attended event j.
    ///
    /// A row whose diagonal is zero (an event without attendees) is all zeros.
    pub fn percentages(&self) -> PercentageTable {
        let values = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let total = row[i];
                row.iter()
                    .map(|c| {
                        if total == 0 {
                            0.0
                        } else {
                            (*c as f64) / (total as f64) * 100.0
                        }
                    })
                    .collect()
            })
            .collect();
        PercentageTable {
            labels: self.labels.clone(),
            values,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct PercentageTable {
    pub labels: Vec<EventLabel>,
    pub values: Vec<Vec<f64>>,
}

/// A label requested in an overlap computation that is not a column of the table.
/// All the pairs involving this label were skipped.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MissingColumnWarning {
    pub label: EventLabel,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OverlapReport {
    pub matrix: OverlapMatrix,
    pub warnings: Vec<MissingColumnWarning>,
}

// ********* Errors **********

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RosterKind {
    MemberRoster,
    Events,
}

/// Errors that abort a lookup or a query.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AttendanceError {
    /// No member roster or no event for the requested year.
    NotFound { year: String, kind: RosterKind },
    /// More than one member roster for the requested year.
    AmbiguousMatch {
        year: String,
        labels: Vec<EventLabel>,
    },
    /// A label was both required and excluded in a query.
    Conflict { label: EventLabel },
    /// A label is not a column of the attendance table.
    UnknownLabel { label: EventLabel },
    /// The same label was registered twice.
    DuplicateLabel { label: EventLabel },
    /// The string could not be parsed as `"<year> <name>"`.
    InvalidLabel { label: String },
}

impl Error for AttendanceError {}

impl Display for AttendanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceError::NotFound {
                year,
                kind: RosterKind::MemberRoster,
            } => write!(f, "No member list for {}", year),
            AttendanceError::NotFound {
                year,
                kind: RosterKind::Events,
            } => write!(f, "No meetings listed for {}", year),
            AttendanceError::AmbiguousMatch { year, labels } => {
                let names: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
                write!(
                    f,
                    "Multiple member lists for {}: {}",
                    year,
                    names.join(", ")
                )
            }
            AttendanceError::Conflict { label } => write!(
                f,
                "{} cannot be searched and removed simultaneously",
                label
            ),
            AttendanceError::UnknownLabel { label } => {
                write!(f, "{} is not a meeting of the attendance table", label)
            }
            AttendanceError::DuplicateLabel { label } => {
                write!(f, "{} is registered more than once", label)
            }
            AttendanceError::InvalidLabel { label } => {
                write!(f, "{:?} is not a label of the form 'YEAR NAME'", label)
            }
        }
    }
}
