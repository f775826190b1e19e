use crate::stats::*;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "reportName", default = "default_report_name")]
    pub report_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "rankByScore")]
    pub rank_by_score: Option<bool>,
}

fn default_report_name() -> String {
    "attendance".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            report_name: default_report_name(),
            output_directory: None,
            rank_by_score: None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "meetingColumn")]
    pub meeting_column: Option<String>,
    #[serde(rename = "monthColumn")]
    pub month_column: Option<String>,
    #[serde(rename = "ignoredColumns")]
    pub ignored_columns: Option<Vec<String>>,
}

impl InputSource {
    pub const DEFAULT_MEETING_COLUMN: &'static str = "聚會名稱";
    pub const DEFAULT_MONTH_COLUMN: &'static str = "月份";

    pub fn meeting_column(&self) -> &str {
        self.meeting_column
            .as_deref()
            .unwrap_or(InputSource::DEFAULT_MEETING_COLUMN)
    }

    pub fn month_column(&self) -> &str {
        self.month_column
            .as_deref()
            .unwrap_or(InputSource::DEFAULT_MONTH_COLUMN)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMeetingType {
    pub name: String,
    pub weight: JSValue,
    pub keywords: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRoleMarkers {
    pub md: Option<String>,
    #[serde(rename = "bandLeader")]
    pub band_leader: Option<String>,
    #[serde(rename = "vocalLeader")]
    pub vocal_leader: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRules {
    #[serde(rename = "meetingTypes")]
    pub meeting_types: Option<Vec<ConfigMeetingType>>,
    #[serde(rename = "bonusMarker")]
    pub bonus_marker: Option<String>,
    #[serde(rename = "bonusWeight")]
    pub bonus_weight: Option<JSValue>,
    #[serde(rename = "roleMarkers")]
    pub role_markers: Option<ConfigRoleMarkers>,
    #[serde(rename = "roleWeight")]
    pub role_weight: Option<f64>,
    pub delimiter: Option<String>,
    #[serde(rename = "skipTokens")]
    pub skip_tokens: Option<Vec<String>>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
    #[serde(rename = "inputSources", default)]
    pub input_sources: Vec<InputSource>,
    pub rules: Option<ConfigRules>,
}

pub fn read_config(path: &str) -> ReportResult<StatsConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(&contents).context(ParsingJsonSnafu {})
}

/// Fills the missing fields of the configuration with the defaults, and checks the result.
pub fn validate_rules(config_rules: &Option<ConfigRules>) -> ReportResult<StatsRules> {
    let mut rules = StatsRules::default();
    if let Some(cr) = config_rules {
        if let Some(mts) = &cr.meeting_types {
            let mut meeting_types: Vec<MeetingType> = Vec::new();
            for mt in mts.iter() {
                meeting_types.push(MeetingType {
                    name: mt.name.clone(),
                    weight: read_js_int(&Some(mt.weight.clone()))?,
                    keywords: mt.keywords.clone(),
                });
            }
            rules.meeting_types = meeting_types;
        }
        if let Some(m) = &cr.bonus_marker {
            rules.bonus_marker = m.clone();
        }
        if cr.bonus_weight.is_some() {
            rules.bonus_weight = read_js_int(&cr.bonus_weight)?;
        }
        if let Some(rm) = &cr.role_markers {
            if let Some(m) = &rm.md {
                rules.role_markers.md = m.clone();
            }
            if let Some(m) = &rm.band_leader {
                rules.role_markers.band_leader = m.clone();
            }
            if let Some(m) = &rm.vocal_leader {
                rules.role_markers.vocal_leader = m.clone();
            }
        }
        if let Some(w) = cr.role_weight {
            rules.role_weight = w;
        }
        if let Some(d) = &cr.delimiter {
            rules.delimiter = d.clone();
        }
        if let Some(t) = &cr.skip_tokens {
            rules.skip_tokens = t.clone();
        }
    }
    rules.validate().context(InvalidRulesSnafu {})?;
    Ok(rules)
}

pub fn read_summary(path: &str) -> ReportResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn read_js_int(x: &Option<JSValue>) -> ReportResult<u32> {
    let content = format!("{:?}", x);
    match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .and_then(|x| u32::try_from(x).ok())
            .context(ParsingJsonNumberSnafu { content }),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<u32>()
            .ok()
            .context(ParsingJsonNumberSnafu { content }),
        _ => None.context(ParsingJsonNumberSnafu { content }),
    }
}
