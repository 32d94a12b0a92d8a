use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column type of a product field as chosen in the schema editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    #[default]
    Varchar,
    Int,
    Decimal,
    Date,
    Boolean,
}

impl FieldType {
    pub const ALL: [FieldType; 5] = [
        FieldType::Varchar,
        FieldType::Int,
        FieldType::Decimal,
        FieldType::Date,
        FieldType::Boolean,
    ];

    /// Name used in the editor (`VARCHAR`, `INT`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Varchar => "VARCHAR",
            FieldType::Int => "INT",
            FieldType::Decimal => "DECIMAL",
            FieldType::Date => "DATE",
            FieldType::Boolean => "BOOLEAN",
        }
    }

    /// Name sent to the API's `field_type` column.
    pub fn as_wire(&self) -> &'static str {
        match self {
            FieldType::Varchar => "varchar",
            FieldType::Int => "int",
            FieldType::Decimal => "decimal",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
        }
    }

    /// Map a stored `field_type` back to an editor type.
    ///
    /// The backend also knows `float`, `text` and `datetime`, which the editor
    /// folds into their closest counterpart.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "varchar" | "text" => Some(FieldType::Varchar),
            "int" => Some(FieldType::Int),
            "decimal" | "float" => Some(FieldType::Decimal),
            "date" | "datetime" => Some(FieldType::Date),
            "boolean" => Some(FieldType::Boolean),
            _ => None,
        }
    }

    pub fn has_length(&self) -> bool {
        matches!(self, FieldType::Varchar)
    }

    pub fn has_min_max(&self) -> bool {
        matches!(self, FieldType::Int | FieldType::Decimal)
    }

    pub fn has_decimal_places(&self) -> bool {
        matches!(self, FieldType::Decimal)
    }

    pub fn has_date_format(&self) -> bool {
        matches!(self, FieldType::Date)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::from_wire(s).ok_or_else(|| format!("Unknown field type: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mandatory {
    #[default]
    #[serde(rename = "Is Mandatory")]
    IsMandatory,
    #[serde(rename = "Not Mandatory")]
    NotMandatory,
}

/// Submission status of a catalog as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CatalogStatus {
    Active,
    Delayed,
    #[default]
    Pending,
    Rejected,
}

/// Date layouts a DATE field can be validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFormat {
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYearSlash,
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYearSlash,
    #[serde(rename = "YYYY-MM-DD")]
    Iso,
    #[serde(rename = "MM-DD-YYYY")]
    MonthDayYearDash,
    #[serde(rename = "DD-MM-YYYY")]
    DayMonthYearDash,
}

impl DateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::MonthDayYearSlash => "MM/DD/YYYY",
            DateFormat::DayMonthYearSlash => "DD/MM/YYYY",
            DateFormat::Iso => "YYYY-MM-DD",
            DateFormat::MonthDayYearDash => "MM-DD-YYYY",
            DateFormat::DayMonthYearDash => "DD-MM-YYYY",
        }
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "MM/DD/YYYY" => Ok(DateFormat::MonthDayYearSlash),
            "DD/MM/YYYY" => Ok(DateFormat::DayMonthYearSlash),
            "YYYY-MM-DD" => Ok(DateFormat::Iso),
            "MM-DD-YYYY" => Ok(DateFormat::MonthDayYearDash),
            "DD-MM-YYYY" => Ok(DateFormat::DayMonthYearDash),
            other => Err(format!("Unknown date format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateValidation {
    #[default]
    Any,
    Past,
    Future,
    Custom,
}
