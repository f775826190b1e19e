// Writers for the monthly table and the summary.

use crate::stats::*;

const PERSON_HEADER: &str = "姓名";
const TOTAL_HEADER: &str = "總次數";
const SUMMARY_HEADERS: [&str; 8] = [
    PERSON_HEADER,
    "加權分數",
    "早上飽加權",
    "MD次數",
    "Band Leader次數",
    "Vocal Leader次數",
    "角色加權",
    "加權總分",
];

fn monthly_to_json(monthly: &MonthlyCountTable) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for row in monthly.rows.iter() {
        let mut counts: JSMap<String, JSValue> = JSMap::new();
        for (month, count) in monthly.months.iter().zip(row.counts.iter()) {
            // Months without any attendance are left out.
            if *count > 0 {
                counts.insert(month.clone(), json!(count));
            }
        }
        l.push(json!({"person": row.person, "counts": counts, "total": row.total}));
    }
    l
}

fn summaries_to_json(summaries: &[PersonSummary]) -> Vec<JSValue> {
    summaries
        .iter()
        .map(|s| {
            json!({
                "person": s.person,
                "weightedScore": s.weighted_score,
                "bonusScore": s.bonus_score,
                "mdCount": s.md_count,
                "bandLeaderCount": s.band_leader_count,
                "vocalLeaderCount": s.vocal_leader_count,
                "roleWeightedScore": s.role_weighted_score,
                "totalWeightedScore": s.total_weighted_score,
            })
        })
        .collect()
}

pub fn build_summary_js(
    settings: &OutputSettings,
    rules: &StatsRules,
    result: &StatsResult,
) -> JSValue {
    let meeting_types: Vec<JSValue> = rules
        .meeting_types
        .iter()
        .map(|mt| json!({"name": mt.name, "weight": mt.weight}))
        .collect();
    json!({
        "config": {
            "report": settings.report_name,
            "meetingTypes": meeting_types,
            "bonusMarker": rules.bonus_marker,
            "bonusWeight": rules.bonus_weight,
            "roleWeight": rules.role_weight,
            "skippedCells": result.skipped_cells,
        },
        "months": result.monthly.months,
        "monthly": monthly_to_json(&result.monthly),
        "summary": summaries_to_json(&result.summaries),
    })
}

/// Writes `<report>_monthly.csv` and `<report>_summary.csv` in the given directory.
pub fn write_tables(dir: &Path, report_name: &str, result: &StatsResult) -> ReportResult<()> {
    let dir_s = dir.display().to_string();
    fs::create_dir_all(dir).context(WritingOutputSnafu { path: dir_s })?;

    let monthly_p = dir.join(format!("{}_monthly.csv", report_name));
    write_monthly_csv(&monthly_p.display().to_string(), &result.monthly)?;

    let summary_p = dir.join(format!("{}_summary.csv", report_name));
    write_summary_csv(&summary_p.display().to_string(), &result.summaries)?;
    Ok(())
}

fn write_monthly_csv(path: &str, monthly: &MonthlyCountTable) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path })?;

    let mut header: Vec<&str> = vec![PERSON_HEADER];
    header.extend(monthly.months.iter().map(|m| m.as_str()));
    header.push(TOTAL_HEADER);
    wtr.write_record(&header).context(CsvWriteSnafu { path })?;

    for row in monthly.rows.iter() {
        let mut record: Vec<String> = vec![row.person.clone()];
        record.extend(row.counts.iter().map(|c| c.to_string()));
        record.push(row.total.to_string());
        wtr.write_record(&record).context(CsvWriteSnafu { path })?;
    }
    wtr.flush().context(WritingOutputSnafu { path })?;
    info!("Monthly table written to {:?}", path);
    Ok(())
}

fn write_summary_csv(path: &str, summaries: &[PersonSummary]) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path })?;
    wtr.write_record(SUMMARY_HEADERS)
        .context(CsvWriteSnafu { path })?;
    for s in summaries.iter() {
        wtr.write_record(&[
            s.person.clone(),
            s.weighted_score.to_string(),
            s.bonus_score.to_string(),
            s.md_count.to_string(),
            s.band_leader_count.to_string(),
            s.vocal_leader_count.to_string(),
            s.role_weighted_score.to_string(),
            s.total_weighted_score.to_string(),
        ])
        .context(CsvWriteSnafu { path })?;
    }
    wtr.flush().context(WritingOutputSnafu { path })?;
    info!("Summary table written to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn result() -> StatsResult {
        let rows = vec![RawRow {
            meeting_name: "三民早堂 早上飽".to_string(),
            month: "2024-01".to_string(),
            cells: vec![
                ("MD".to_string(), CellValue::Text("Alice".to_string())),
                ("Vocal".to_string(), CellValue::Text("陳小明".to_string())),
            ],
        }];
        run_attendance_stats(&rows, &StatsRules::default()).unwrap()
    }

    #[test]
    fn summary_json() {
        let js = build_summary_js(&OutputSettings::default(), &StatsRules::default(), &result());
        assert_eq!(js["months"], json!(["2024-01"]));
        assert_eq!(js["config"]["meetingTypes"].as_array().unwrap().len(), 6);
        assert_eq!(
            js["monthly"][1],
            json!({"person": "陳小明", "counts": {"2024-01": 1}, "total": 1})
        );
        let alice = &js["summary"][0];
        assert_eq!(alice["person"], json!("Alice"));
        assert_eq!(alice["weightedScore"], json!(4));
        assert_eq!(alice["bonusScore"], json!(2));
        assert_eq!(alice["mdCount"], json!(1));
        assert_eq!(alice["totalWeightedScore"], json!(6.5));
    }

    #[test]
    fn csv_tables() {
        let mut dir = env::temp_dir();
        dir.push(format!("worshipstats_out_{}", std::process::id()));
        write_tables(&dir, "test", &result()).unwrap();

        let monthly = fs::read_to_string(dir.join("test_monthly.csv")).unwrap();
        assert_eq!(monthly, "姓名,2024-01,總次數\nAlice,1,1\n陳小明,1,1\n");

        let summary = fs::read_to_string(dir.join("test_summary.csv")).unwrap();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Alice,4,2,1,0,0,0.5,6.5");
        assert_eq!(lines[2], "陳小明,4,2,0,0,0,0,6");

        fs::remove_dir_all(&dir).unwrap();
    }
}
