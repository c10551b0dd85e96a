/*!

This is the long-form manual for `attendance_matrix` and `meeting-attendance`.

## Input files

All the rosters are read from a single data directory (`data/` by default).
Every `.csv` or `.xlsx` file is one roster:

* files whose name contains `member` (in any case) are the member rosters. There
  must be exactly one per year.
* every other file is the registration list of one meeting.

The label of a roster is taken from the file name, and must read `YEAR NAME`, for
example `2024 ANNUAL.xlsx` or `2024 MEMBERS.csv`. Exports that carry a date before
the label are also understood: `Registrations-2025 2024 ANNUAL.xlsx` is labeled
`2024 ANNUAL`. A member roster may also be named by its year alone, as in
`ANS Members-2025 2024.csv`: it is then labeled `2024 MEMBER`.

For Excel files, the last worksheet is read. The member ids are read from the first
column named `Record Number` or `Account: ANS ID` (the list of names can be changed
in the configuration file).

## Reports

```bash
meeting-attendance --year 2024 --meetings ALL
```

* `2024_attendance.csv`: one row per member of the 2024 roster, one column per
  meeting, `True` when the member registered to the meeting.
* `2024_selected_attendance.csv`: the members who attended all the selected
  meetings (and none of the `--exclude` ones), if there is any.
* `2024_overlap_table.csv`: for each pair of meetings, the percentage of the
  attendees of the row meeting who also attended the column meeting.
* `2024_overlap_edges.json`: the number of common attendees of each pair of
  meetings, as a list of edges to draw a chord or network diagram.
* `2024_attendance_overlap.csv`: the members who attended at least two meetings.

The three overlap files are produced when all the meetings are selected, or when
`--overlap` is passed.

## Conventions

### Year selection

The year is compared exactly with the year of each label: `202` selects nothing.
Two member rosters for the same year is an error.

### Percentages

A meeting without any attendee has a row of `0` in the overlap table, including on
the diagonal. Every other diagonal cell is `100`.

### Duplicated ids

An id that appears several times in a registration list counts once. An id that
appears several times in a member roster gives several rows.

### Missing meetings

When the overlap is requested for a meeting that is not in the attendance table,
its pairs are left at zero and a warning is printed. The rest of the report is
produced normally.

*/
