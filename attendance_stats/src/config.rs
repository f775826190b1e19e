// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// All the possible states of a role cell in the input table.
///
/// Loaders map whatever their source format provides onto these three cases.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum CellValue {
    /// A list of names separated by the delimiter of the rules. The list may still
    /// contain nothing but blanks or skip tokens.
    Text(String),
    /// No value was recorded for this slot.
    Missing,
    /// A value that cannot be read as a list of names (a number, a spreadsheet error, ...).
    /// The content is only kept for diagnostics, the cell is skipped.
    Malformed(String),
}

/// One meeting instance, as read from the input table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawRow {
    pub meeting_name: String,
    pub month: String,
    /// The role columns, in the order of the table: (role label, content of the cell).
    pub cells: Vec<(String, CellValue)>,
}

/// The presence of one person in one role at one meeting instance.
#[derive(Eq, PartialEq, Debug, Clone, Hash, PartialOrd, Ord)]
pub struct AttendanceRecord {
    pub person: String,
    pub meeting_name: String,
    pub month: String,
    pub role: String,
}

// ******** Output data structures *********

/// One row of the monthly table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MonthlyCountRow {
    pub person: String,
    /// Aligned with the months of the table.
    pub counts: Vec<u64>,
    pub total: u64,
}

/// Attendance counts per person and per month.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct MonthlyCountTable {
    /// The distinct months, sorted.
    pub months: Vec<String>,
    pub rows: Vec<MonthlyCountRow>,
}

/// The weighted scores of one person.
#[derive(PartialEq, Debug, Clone)]
pub struct PersonSummary {
    pub person: String,
    pub weighted_score: u64,
    pub bonus_score: u64,
    pub md_count: u64,
    pub band_leader_count: u64,
    pub vocal_leader_count: u64,
    pub role_weighted_score: f64,
    pub total_weighted_score: f64,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct StatsResult {
    pub monthly: MonthlyCountTable,
    /// In the same person order as the rows of the monthly table.
    pub summaries: Vec<PersonSummary>,
    /// The number of malformed cells that were skipped while expanding the table.
    pub skipped_cells: u64,
}

/// Errors in the configuration of the statistics.
///
/// The input table itself never produces an error.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum StatsErrors {
    EmptyDelimiter,
    EmptyKeyword(String),
    EmptyMarker(&'static str),
    InvalidRoleWeight(String),
    /// A row was added without declaring the role columns first.
    MissingRoles,
    RowWidthMismatch { expected: usize, found: usize },
}

impl Error for StatsErrors {}

impl Display for StatsErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsErrors::EmptyDelimiter => write!(f, "the cell delimiter cannot be empty"),
            StatsErrors::EmptyKeyword(name) => {
                write!(f, "meeting type {:?} has an empty keyword", name)
            }
            StatsErrors::EmptyMarker(which) => write!(f, "the {} marker cannot be empty", which),
            StatsErrors::InvalidRoleWeight(w) => write!(f, "invalid role weight: {}", w),
            StatsErrors::MissingRoles => write!(f, "the role columns must be declared first"),
            StatsErrors::RowWidthMismatch { expected, found } => write!(
                f,
                "expected {} role cells in the row, found {}",
                expected, found
            ),
        }
    }
}

// ********* Configuration **********

/// A category of meetings, recognized by keywords in the name of the meeting.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MeetingType {
    pub name: String,
    pub weight: u32,
    pub keywords: Vec<String>,
}

impl MeetingType {
    pub fn new(name: &str, weight: u32, keywords: &[&str]) -> MeetingType {
        MeetingType {
            name: name.to_string(),
            weight,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// True if any of the keywords appears in the meeting name.
    pub fn matches(&self, meeting_name: &str) -> bool {
        self.keywords.iter().any(|k| meeting_name.contains(k.as_str()))
    }
}

/// Substrings of the role labels that mark a leadership function.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoleMarkers {
    pub md: String,
    pub band_leader: String,
    pub vocal_leader: String,
}

#[derive(PartialEq, Debug, Clone)]
pub struct StatsRules {
    /// Every matching type contributes its weight: the classification is not exclusive.
    pub meeting_types: Vec<MeetingType>,
    pub bonus_marker: String,
    pub bonus_weight: u32,
    pub role_markers: RoleMarkers,
    /// The multiplier applied to the sum of the role counts.
    pub role_weight: f64,
    pub delimiter: String,
    /// Tokens that stand for "nobody attended" once trimmed.
    pub skip_tokens: Vec<String>,
}

impl StatsRules {
    pub const DEFAULT_BONUS_WEIGHT: u32 = 2;
    pub const DEFAULT_ROLE_WEIGHT: f64 = 0.5;

    /// The registry used by the worship team: prayer meetings, youth Sundays, the Sunday
    /// services (recognized by their venue), and the smaller services.
    pub fn default_meeting_types() -> Vec<MeetingType> {
        vec![
            MeetingType::new("禱告會", 3, &["禱告會"]),
            MeetingType::new("青年主日", 4, &["青年主日"]),
            MeetingType::new("主日崇拜", 4, &["三民早堂", "美河堂"]),
            MeetingType::new("QQ", 1, &["QQ"]),
            MeetingType::new("英文崇拜", 1, &["英文崇拜"]),
            MeetingType::new("大Q", 1, &["大Q"]),
        ]
    }

    pub fn validate(&self) -> Result<(), StatsErrors> {
        if self.delimiter.is_empty() {
            return Err(StatsErrors::EmptyDelimiter);
        }
        for mt in self.meeting_types.iter() {
            if mt.keywords.iter().any(|k| k.is_empty()) {
                return Err(StatsErrors::EmptyKeyword(mt.name.clone()));
            }
        }
        let markers = [
            ("bonus", &self.bonus_marker),
            ("MD", &self.role_markers.md),
            ("band leader", &self.role_markers.band_leader),
            ("vocal leader", &self.role_markers.vocal_leader),
        ];
        for (which, marker) in markers {
            if marker.is_empty() {
                return Err(StatsErrors::EmptyMarker(which));
            }
        }
        if !self.role_weight.is_finite() || self.role_weight < 0.0 {
            return Err(StatsErrors::InvalidRoleWeight(self.role_weight.to_string()));
        }
        Ok(())
    }
}

impl Default for StatsRules {
    fn default() -> Self {
        StatsRules {
            meeting_types: StatsRules::default_meeting_types(),
            bonus_marker: "早上飽".to_string(),
            bonus_weight: StatsRules::DEFAULT_BONUS_WEIGHT,
            role_markers: RoleMarkers {
                md: "MD".to_string(),
                band_leader: "Band Leader".to_string(),
                vocal_leader: "Vocal Leader".to_string(),
            },
            role_weight: StatsRules::DEFAULT_ROLE_WEIGHT,
            delimiter: "/".to_string(),
            skip_tokens: vec!["暫停".to_string(), "NaN".to_string()],
        }
    }
}
