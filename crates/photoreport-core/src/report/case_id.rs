//! Case identifiers and the document filename derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validation::ValidationError;

/// Suffix appended to every exported document name.
pub const FILENAME_SUFFIX: &str = "_relatorio-fotografico.pdf";

/// A case identifier of the shape `AA0000/00`.
///
/// Letters are kept exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CaseId(String);

impl CaseId {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        let bytes = raw.as_bytes();
        let well_formed = bytes.len() == 9
            && bytes[..2].iter().all(u8::is_ascii_alphabetic)
            && bytes[2..6].iter().all(u8::is_ascii_digit)
            && bytes[6] == b'/'
            && bytes[7..].iter().all(u8::is_ascii_digit);

        if !well_formed {
            return Err(ValidationError::InvalidCaseId(raw.to_string()));
        }
        Ok(CaseId(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `AA0000` part.
    pub fn serial(&self) -> &str {
        &self.0[..6]
    }

    /// The two digits after the slash.
    pub fn year(&self) -> &str {
        &self.0[7..]
    }

    /// `AA0000/00` becomes `AA0000-00_relatorio-fotografico.pdf`.
    pub fn pdf_filename(&self) -> String {
        format!("{}-{}{}", self.serial(), self.year(), FILENAME_SUFFIX)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CaseId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CaseId::parse(s)
    }
}

impl TryFrom<String> for CaseId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CaseId::parse(&value)
    }
}

impl From<CaseId> for String {
    fn from(id: CaseId) -> Self {
        id.0
    }
}

/// Filename for a raw case identifier.
pub fn pdf_filename(raw_case_id: &str) -> Result<String, ValidationError> {
    Ok(CaseId::parse(raw_case_id)?.pdf_filename())
}

/// Normalise free-form typing into the `AA0000/00` shape.
///
/// Drops anything that is not an ASCII letter or digit, uppercases, and
/// once six characters are present inserts `/` followed by at most two more.
/// The result is not validated; partial input stays partial.
pub fn format_case_id_input(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.len() < 6 {
        return cleaned;
    }

    let tail_end = cleaned.len().min(8);
    format!("{}/{}", &cleaned[..6], &cleaned[6..tail_end])
}
