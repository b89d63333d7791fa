use serde::Serialize;

/// A source row that was skipped while loading a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// 1-based spreadsheet row number.
    pub row: u32,
    pub reason: String,
}

impl RowError {
    pub fn new(row: u32, reason: impl Into<String>) -> Self {
        Self {
            row,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}: {}", self.row, self.reason)
    }
}

/// A recoverable issue reported alongside a successful load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LoadWarning {
    /// Declared total capacity disagrees with rows x columns x students per seat.
    #[serde(rename_all = "camelCase")]
    CapacityMismatch {
        room_no: String,
        declared: String,
        computed: u64,
    },
    /// A roll number appears more than once; both students are kept.
    #[serde(rename_all = "camelCase")]
    DuplicateRollNo {
        roll_no: String,
        /// 1-based row of the repeated occurrence.
        row: u32,
    },
    /// A blocked seat reference lies outside the room grid or could not be read.
    #[serde(rename_all = "camelCase")]
    BlockedSeatOutOfRange { room_no: String, seat: String },
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapacityMismatch {
                room_no,
                declared,
                computed,
            } => write!(
                f,
                "room {room_no}: total capacity {declared} does not match layout, using {computed}"
            ),
            Self::DuplicateRollNo { roll_no, row } => {
                write!(f, "row {row}: roll number {roll_no} appears more than once")
            }
            Self::BlockedSeatOutOfRange { room_no, seat } => {
                write!(f, "room {room_no}: blocked seat {seat} is not in the room grid")
            }
        }
    }
}
