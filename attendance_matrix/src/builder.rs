pub use crate::config::*;

use log::debug;
use std::collections::{HashMap, HashSet};

/// A builder for adding events to an attendance table, one at a time.
///
/// ```
/// pub use attendance_matrix::builder::Builder;
/// pub use attendance_matrix::EventLabel;
/// # use attendance_matrix::AttendanceError;
///
/// let mut builder = Builder::new(&[1, 2, 3]);
/// builder.add_event(&EventLabel::new("2024", "ANNUAL"), &[1, 2])?;
/// builder.add_event(&EventLabel::new("2024", "WINTER"), &[2, 3, 3])?;
///
/// let table = builder.build();
/// assert_eq!(table.num_rows(), 3);
/// assert_eq!(table.cell(1, &EventLabel::new("2024", "WINTER")), Some(true));
///
/// # Ok::<(), AttendanceError>(())
/// ```
pub struct Builder {
    pub(crate) _members: Vec<MemberId>,
    pub(crate) _labels: Vec<EventLabel>,
    pub(crate) _column_index: HashMap<EventLabel, usize>,
    pub(crate) _columns: Vec<Vec<bool>>,
}

impl Builder {
    /// Starts a table with one row per member id. Duplicate ids are kept as
    /// separate rows.
    pub fn new(members: &[MemberId]) -> Builder {
        Builder {
            _members: members.to_vec(),
            _labels: Vec::new(),
            _column_index: HashMap::new(),
            _columns: Vec::new(),
        }
    }

    /// Adds the column of an event.
    ///
    /// registrations: the ids of the members registered to the event, in any order.
    /// Repeated ids and ids not in the member list are accepted.
    pub fn add_event(
        &mut self,
        label: &EventLabel,
        registrations: &[MemberId],
    ) -> Result<(), AttendanceError> {
        if self._column_index.contains_key(label) {
            return Err(AttendanceError::DuplicateLabel {
                label: label.clone(),
            });
        }
        self.push_column(label, registrations);
        Ok(())
    }

    pub(crate) fn push_column(&mut self, label: &EventLabel, registrations: &[MemberId]) {
        let registered: HashSet<MemberId> = registrations.iter().cloned().collect();
        let mut column = vec![false; self._members.len()];
        for (row, mid) in self._members.iter().enumerate() {
            if registered.contains(mid) {
                column[row] = true;
            }
        }
        debug!(
            "push_column: {}: {} registrations, {} distinct, {} members present",
            label,
            registrations.len(),
            registered.len(),
            column.iter().filter(|b| **b).count()
        );
        self._column_index.insert(label.clone(), self._columns.len());
        self._labels.push(label.clone());
        self._columns.push(column);
    }

    pub fn build(self) -> AttendanceTable {
        AttendanceTable {
            members: self._members,
            labels: self._labels,
            column_index: self._column_index,
            columns: self._columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_label() {
        let label = EventLabel::new("2024", "ANNUAL");
        let mut builder = Builder::new(&[1, 2]);
        builder.add_event(&label, &[1]).unwrap();
        assert_eq!(
            builder.add_event(&label, &[2]),
            Err(AttendanceError::DuplicateLabel {
                label: label.clone()
            })
        );
        let table = builder.build();
        assert_eq!(table.num_columns(), 1);
        assert_eq!(table.column(&label), Some(&[true, false][..]));
    }

    #[test]
    fn keeps_duplicate_members_as_rows() {
        let label = EventLabel::new("2023", "WINTER");
        let mut builder = Builder::new(&[7, 7, 8]);
        builder.add_event(&label, &[7, 7, 7]).unwrap();
        let table = builder.build();
        assert_eq!(table.members(), &[7, 7, 8]);
        assert_eq!(table.column(&label), Some(&[true, true, false][..]));
    }

    #[test]
    fn no_events() {
        let table = Builder::new(&[1, 2, 3]).build();
        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.num_columns(), 0);
        assert_eq!(table.row(0), Some(vec![]));
        assert_eq!(table.row(3), None);
    }
}
