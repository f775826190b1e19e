pub use crate::config::*;

/// A builder for adding meeting rows.
///
/// It is the simplest way to feed a table that is already in memory.
///
/// ```
/// pub use attendance_stats::builder::Builder;
/// pub use attendance_stats::StatsRules;
/// # use attendance_stats::StatsErrors;
///
/// let mut builder = Builder::new(&StatsRules::default())?
///     .roles(&["Band Leader".to_string(), "Vocal".to_string()])?;
///
/// builder.add_row_simple("三民早堂 早上飽", "2024-01", &["Alice".to_string(), "Bob/Carol".to_string()])?;
/// builder.add_row_simple("禱告會", "2024-01", &["Bob".to_string(), "".to_string()])?;
///
/// let res = builder.run()?;
/// assert_eq!(res.summaries.len(), 3);
///
/// # Ok::<(), StatsErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: StatsRules,
    pub(crate) _roles: Option<Vec<String>>,
    pub(crate) _rows: Vec<RawRow>,
}

impl Builder {
    pub fn new(rules: &StatsRules) -> Result<Builder, StatsErrors> {
        rules.validate()?;
        Ok(Builder {
            _rules: rules.clone(),
            _roles: None,
            _rows: Vec::new(),
        })
    }

    /// Declares the role columns. The rows added so far are kept.
    pub fn roles(self, roles: &[String]) -> Result<Builder, StatsErrors> {
        Ok(Builder {
            _rules: self._rules,
            _roles: Some(roles.to_vec()),
            _rows: self._rows,
        })
    }

    /// Adds a meeting, with one cell per declared role, in the same order.
    ///
    /// An empty cell is treated as a missing value.
    pub fn add_row_simple(
        &mut self,
        meeting_name: &str,
        month: &str,
        cells: &[String],
    ) -> Result<(), StatsErrors> {
        let roles = self._roles.as_deref().ok_or(StatsErrors::MissingRoles)?;
        if roles.len() != cells.len() {
            return Err(StatsErrors::RowWidthMismatch {
                expected: roles.len(),
                found: cells.len(),
            });
        }
        let cells = roles
            .iter()
            .zip(cells.iter())
            .map(|(role, c)| {
                let cell = if c.is_empty() {
                    CellValue::Missing
                } else {
                    CellValue::Text(c.clone())
                };
                (role.clone(), cell)
            })
            .collect();
        self.add_row(&RawRow {
            meeting_name: meeting_name.to_string(),
            month: month.to_string(),
            cells,
        })
    }

    pub fn add_row(&mut self, row: &RawRow) -> Result<(), StatsErrors> {
        self._rows.push(row.clone());
        Ok(())
    }

    pub fn run(&self) -> Result<StatsResult, StatsErrors> {
        crate::run_attendance_stats(&self._rows, &self._rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_need_roles() {
        let mut b = Builder::new(&StatsRules::default()).unwrap();
        assert_eq!(
            b.add_row_simple("QQ", "2024-01", &["Alice".to_string()]),
            Err(StatsErrors::MissingRoles)
        );
    }

    #[test]
    fn row_width_is_checked() {
        let mut b = Builder::new(&StatsRules::default())
            .unwrap()
            .roles(&["MD".to_string(), "Keys".to_string()])
            .unwrap();
        assert_eq!(
            b.add_row_simple("QQ", "2024-01", &["Alice".to_string()]),
            Err(StatsErrors::RowWidthMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn invalid_rules_fail_early() {
        let rules = StatsRules {
            bonus_marker: "".to_string(),
            ..StatsRules::default()
        };
        assert_eq!(
            Builder::new(&rules).err(),
            Some(StatsErrors::EmptyMarker("bonus"))
        );
    }

    #[test]
    fn empty_cells_are_missing() {
        let mut b = Builder::new(&StatsRules::default())
            .unwrap()
            .roles(&["MD".to_string(), "Keys".to_string()])
            .unwrap();
        b.add_row_simple("QQ", "2024-01", &["Alice".to_string(), "".to_string()])
            .unwrap();
        assert_eq!(b._rows[0].cells[1].1, CellValue::Missing);
        let res = b.run().unwrap();
        assert_eq!(res.summaries.len(), 1);
        assert_eq!(res.summaries[0].md_count, 1);
        assert_eq!(res.summaries[0].total_weighted_score, 1.5);
    }
}
