mod config;
pub mod builder;
pub mod manual;

use log::{debug, info};

use std::{
    collections::{BTreeSet, HashMap},
    ops::{Add, AddAssign},
};

pub use crate::config::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct PersonId(u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct Tally(u64);

impl Tally {
    const EMPTY: Tally = Tally(0);
    const ONE: Tally = Tally(1);
}

impl std::iter::Sum for Tally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Tally(iter.map(|t| t.0).sum())
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Tally) {
        self.0 += rhs.0;
    }
}

impl Add for Tally {
    type Output = Tally;
    fn add(self: Tally, rhs: Tally) -> Tally {
        Tally(self.0 + rhs.0)
    }
}

// The five running sums kept for every person.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
struct Accumulator {
    weighted: Tally,
    bonus: Tally,
    md: Tally,
    band_leader: Tally,
    vocal_leader: Tally,
}

impl Accumulator {
    const EMPTY: Accumulator = Accumulator {
        weighted: Tally::EMPTY,
        bonus: Tally::EMPTY,
        md: Tally::EMPTY,
        band_leader: Tally::EMPTY,
        vocal_leader: Tally::EMPTY,
    };
}

/// The outcome of the expansion of a table.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Expansion {
    pub records: Vec<AttendanceRecord>,
    pub skipped_cells: u64,
}

/// Runs the full statistics with the given rules over the rows of a table.
///
/// Arguments:
/// * `rows` the meeting instances, in any order
/// * `rules` the weights and markers. They are validated before anything else.
pub fn run_attendance_stats(
    rows: &[RawRow],
    rules: &StatsRules,
) -> Result<StatsResult, StatsErrors> {
    rules.validate()?;
    info!(
        "run_attendance_stats: Processing {:?} rows, {:?} meeting types",
        rows.len(),
        rules.meeting_types.len()
    );

    let expansion = expand_rows(rows, rules);
    info!(
        "run_attendance_stats: {:?} attendance records, {:?} skipped cells",
        expansion.records.len(),
        expansion.skipped_cells
    );

    let mut res = aggregate(&expansion.records, rules);
    res.skipped_cells = expansion.skipped_cells;

    for s in res.summaries.iter() {
        info!(
            "{:>8} {} (weighted: {}, bonus: {}, roles: {})",
            s.total_weighted_score, s.person, s.weighted_score, s.bonus_score, s.role_weighted_score
        );
    }
    Ok(res)
}

/// Turns the wide table into one record per name found in a role cell.
pub fn expand(rows: &[RawRow], rules: &StatsRules) -> Vec<AttendanceRecord> {
    expand_rows(rows, rules).records
}

/// Same as [expand], but also reports how many malformed cells were skipped.
pub fn expand_rows(rows: &[RawRow], rules: &StatsRules) -> Expansion {
    let mut res = Expansion::default();
    for row in rows.iter() {
        for (role, cell) in row.cells.iter() {
            match cell {
                CellValue::Text(s) => {
                    for name in split_names(s, rules) {
                        res.records.push(AttendanceRecord {
                            person: name.to_string(),
                            meeting_name: row.meeting_name.clone(),
                            month: row.month.clone(),
                            role: role.clone(),
                        });
                    }
                }
                CellValue::Missing => {}
                CellValue::Malformed(content) => {
                    debug!(
                        "expand_rows: skipping malformed cell {:?} in role {:?} of {:?}",
                        content, role, row.meeting_name
                    );
                    res.skipped_cells += 1;
                }
            }
        }
    }
    res
}

fn split_names<'a>(cell: &'a str, rules: &'a StatsRules) -> impl Iterator<Item = &'a str> {
    cell.split(rules.delimiter.as_str())
        .map(|s| s.trim())
        .filter(move |s| !s.is_empty() && !rules.skip_tokens.iter().any(|t| t == s))
}

/// All the meeting types recognized in the name of a meeting, with their weights.
pub fn classify_weights<'a>(
    meeting_name: &str,
    meeting_types: &'a [MeetingType],
) -> Vec<(&'a str, u32)> {
    meeting_types
        .iter()
        .filter(|mt| mt.matches(meeting_name))
        .map(|mt| (mt.name.as_str(), mt.weight))
        .collect()
}

pub fn has_bonus(meeting_name: &str, rules: &StatsRules) -> bool {
    meeting_name.contains(rules.bonus_marker.as_str())
}

/// Computes the monthly table and the weighted summaries of the records.
///
/// Both outputs describe exactly the same persons, in the same (name) order.
pub fn aggregate(records: &[AttendanceRecord], rules: &StatsRules) -> StatsResult {
    let persons = distinct_persons(records);
    let person_ids: HashMap<&str, PersonId> = persons
        .iter()
        .map(|(name, pid)| (name.as_str(), *pid))
        .collect();
    debug!("aggregate: {:?} distinct persons", persons.len());

    let monthly = compute_monthly(records, &persons, &person_ids);

    let mut accumulators: HashMap<PersonId, Accumulator> = persons
        .iter()
        .map(|(_, pid)| (*pid, Accumulator::EMPTY))
        .collect();

    // Weights only depend on the meeting name, which repeats across records.
    let mut meeting_weights: HashMap<&str, (Tally, bool)> = HashMap::new();

    for r in records.iter() {
        let (weight, bonus) = *meeting_weights
            .entry(r.meeting_name.as_str())
            .or_insert_with(|| {
                let matched = classify_weights(&r.meeting_name, &rules.meeting_types);
                debug!("aggregate: meeting {:?} -> {:?}", r.meeting_name, matched);
                let w: Tally = matched.iter().map(|(_, w)| Tally(*w as u64)).sum();
                (w, has_bonus(&r.meeting_name, rules))
            });

        let acc = match person_ids
            .get(r.person.as_str())
            .and_then(|pid| accumulators.get_mut(pid))
        {
            Some(acc) => acc,
            None => continue,
        };
        acc.weighted += weight;
        if bonus {
            acc.bonus += Tally(rules.bonus_weight as u64);
        }
        // A role label may carry several markers, each one counts.
        if r.role.contains(rules.role_markers.md.as_str()) {
            acc.md += Tally::ONE;
        }
        if r.role.contains(rules.role_markers.band_leader.as_str()) {
            acc.band_leader += Tally::ONE;
        }
        if r.role.contains(rules.role_markers.vocal_leader.as_str()) {
            acc.vocal_leader += Tally::ONE;
        }
    }

    let summaries: Vec<PersonSummary> = persons
        .iter()
        .map(|(name, pid)| {
            let acc = accumulators.get(pid).cloned().unwrap_or(Accumulator::EMPTY);
            person_summary(name, &acc, rules.role_weight)
        })
        .collect();

    StatsResult {
        monthly,
        summaries,
        skipped_cells: 0,
    }
}

/// Orders the summaries by decreasing total score. Ties are ordered by name.
pub fn rank_summaries(summaries: &mut [PersonSummary]) {
    summaries.sort_by(|a, b| {
        b.total_weighted_score
            .total_cmp(&a.total_weighted_score)
            .then_with(|| a.person.cmp(&b.person))
    });
}

// The single source of persons for both tables.
fn distinct_persons(records: &[AttendanceRecord]) -> Vec<(String, PersonId)> {
    let names: BTreeSet<&str> = records.iter().map(|r| r.person.as_str()).collect();
    names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| (name.to_string(), PersonId((idx + 1) as u32)))
        .collect()
}

fn compute_monthly(
    records: &[AttendanceRecord],
    persons: &[(String, PersonId)],
    person_ids: &HashMap<&str, PersonId>,
) -> MonthlyCountTable {
    let months: Vec<String> = records
        .iter()
        .map(|r| r.month.as_str())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(|m| m.to_string())
        .collect();
    let month_idx: HashMap<&str, usize> = months
        .iter()
        .enumerate()
        .map(|(idx, m)| (m.as_str(), idx))
        .collect();

    let mut tally: HashMap<PersonId, Vec<Tally>> = persons
        .iter()
        .map(|(_, pid)| (*pid, vec![Tally::EMPTY; months.len()]))
        .collect();
    for r in records.iter() {
        let cell = person_ids
            .get(r.person.as_str())
            .and_then(|pid| tally.get_mut(pid))
            .zip(month_idx.get(r.month.as_str()))
            .and_then(|(counts, idx)| counts.get_mut(*idx));
        if let Some(c) = cell {
            *c += Tally::ONE;
        }
    }

    let rows = persons
        .iter()
        .map(|(name, pid)| {
            let counts: Vec<Tally> = tally.get(pid).cloned().unwrap_or_default();
            let total: Tally = counts.iter().cloned().sum();
            MonthlyCountRow {
                person: name.clone(),
                counts: counts.iter().map(|c| c.0).collect(),
                total: total.0,
            }
        })
        .collect();

    MonthlyCountTable { months, rows }
}

fn person_summary(name: &str, acc: &Accumulator, role_weight: f64) -> PersonSummary {
    let role_count = acc.md + acc.band_leader + acc.vocal_leader;
    let role_weighted_score = role_weight * role_count.0 as f64;
    PersonSummary {
        person: name.to_string(),
        weighted_score: acc.weighted.0,
        bonus_score: acc.bonus.0,
        md_count: acc.md.0,
        band_leader_count: acc.band_leader.0,
        vocal_leader_count: acc.vocal_leader.0,
        role_weighted_score,
        total_weighted_score: acc.weighted.0 as f64 + acc.bonus.0 as f64 + role_weighted_score,
    }
}
