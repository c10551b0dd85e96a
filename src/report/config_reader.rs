use crate::report::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

pub const DEFAULT_DATA_DIRECTORY: &str = "data";

/// The column names that hold the member ids, in order of preference.
pub const DEFAULT_ID_COLUMNS: [&str; 2] = ["Record Number", "Account: ANS ID"];

pub const DEFAULT_MEMBER_ROSTER_MARKER: &str = "member";

/// Settings for reading the rosters. All the fields are optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(rename = "dataDirectory")]
    pub data_directory: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "idColumns")]
    pub _id_columns: Option<Vec<String>>,
    #[serde(rename = "memberRosterMarker")]
    pub _member_roster_marker: Option<String>,
}

impl ReportConfig {
    pub fn id_columns(&self) -> Vec<String> {
        match &self._id_columns {
            Some(cols) if !cols.is_empty() => cols.clone(),
            _ => DEFAULT_ID_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn member_roster_marker(&self) -> String {
        match &self._member_roster_marker {
            Some(m) if !m.trim().is_empty() => m.trim().to_string(),
            _ => DEFAULT_MEMBER_ROSTER_MARKER.to_string(),
        }
    }
}

pub fn read_config(path: &str) -> ReportResult<ReportConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ReportConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> ReportResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config: ReportConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReportConfig::default());
        assert_eq!(
            config.id_columns(),
            vec!["Record Number".to_string(), "Account: ANS ID".to_string()]
        );
        assert_eq!(config.member_roster_marker(), "member");
    }

    #[test]
    fn overrides() {
        let config: ReportConfig = serde_json::from_str(
            r#"{"dataDirectory": "rosters", "idColumns": ["Member #"], "memberRosterMarker": "ROSTER"}"#,
        )
        .unwrap();
        assert_eq!(config.data_directory, Some("rosters".to_string()));
        assert_eq!(config.output_directory, None);
        assert_eq!(config.id_columns(), vec!["Member #".to_string()]);
        assert_eq!(config.member_roster_marker(), "ROSTER");
    }
}
