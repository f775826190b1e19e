/*!

This is the long-form manual for `attendance_stats` and `worshipstats`.

## Input table

The input is a table in which every row is one meeting. Two columns are special:
* the meeting name (`聚會名稱` by default). The type of the meeting is recognized
  from keywords in this name.
* the month (`月份` by default). Any text works, the months are sorted as text, so
  `2024-01` style labels give the natural order.

Every other column is a role column: its header is the name of the role (`MD`, `Keys`,
`Band Leader / Vocal`, ...) and every cell lists the people who served in that role,
separated with `/`:

| 聚會名稱 | 月份 | MD | Vocal Leader | Vocal |
|---|---|---|---|---|
| 三民早堂 早上飽 | 2024-01 | Alice | Bob | Carol / Dan |
| 禱告會 | 2024-01 | 暫停 | | Alice |

Empty cells, blank names, and the skip tokens (`暫停`, `NaN`) do not count. Cells that
hold something else than text (numbers, spreadsheet errors) are skipped and reported
in the count of skipped cells.

The following formats are supported:
* `xlsx` Excel workbooks. The worksheet is selected with `excelWorksheetName`, and
  may be omitted if the workbook only has one sheet.
* `csv` Comma Separated Values, with the header in the first line.

## Scores

For every person, the statistics compute:
* the number of attendances per month, and the total over all months
* the weighted score: every attendance adds the weight of all the meeting types
  that match the meeting name. A meeting can match several types, in which case
  the weights add up.
* the bonus score: every attendance at a meeting whose name contains the bonus
  marker (`早上飽`) adds the bonus weight (2).
* the number of times the person served in a role whose label contains `MD`,
  `Band Leader`, or `Vocal Leader`. A label can contain more than one marker.
* the role score: `0.5 * (MD + Band Leader + Vocal Leader)`
* the total: weighted score + bonus score + role score

The default meeting types are:

| type | weight | keywords |
|---|---|---|
| 禱告會 | 3 | `禱告會` |
| 青年主日 | 4 | `青年主日` |
| 主日崇拜 | 4 | `三民早堂`, `美河堂` |
| QQ | 1 | `QQ` |
| 英文崇拜 | 1 | `英文崇拜` |
| 大Q | 1 | `大Q` |

## Configuration

The command line accepts a configuration file in JSON with the `--config` flag. All the
fields of `rules` are optional.

```json
{
  "outputSettings": {
    "reportName": "2024",
    "outputDirectory": "out",
    "rankByScore": true
  },
  "inputSources": [
    {
      "provider": "xlsx",
      "filePath": "attendance.xlsx",
      "excelWorksheetName": "Sheet1",
      "meetingColumn": "聚會名稱",
      "monthColumn": "月份",
      "ignoredColumns": ["備註"]
    }
  ],
  "rules": {
    "meetingTypes": [
      { "name": "禱告會", "weight": 3, "keywords": ["禱告會"] }
    ],
    "bonusMarker": "早上飽",
    "bonusWeight": 2,
    "roleMarkers": { "md": "MD", "bandLeader": "Band Leader", "vocalLeader": "Vocal Leader" },
    "roleWeight": 0.5,
    "delimiter": "/",
    "skipTokens": ["暫停", "NaN"]
  }
}
```

When `meetingTypes` is given, it replaces the whole default registry.

The paths of the input sources are relative to the directory of the configuration file.
With an `outputDirectory`, the two tables are written as `<reportName>_monthly.csv` and
`<reportName>_summary.csv`.

## Command line

```bash
worshipstats -i attendance.xlsx --excel-worksheet-name 2024 --out stdout
worshipstats --config stats_config.json --reference expected_summary.json
```

`--reference` compares the JSON summary with a previous one and fails if they differ.

*/
