use serde::{Deserialize, Serialize};

pub const SOURCE_TITLE: &str = "Health and Safety at Work Act 2015";

/// Provenance carried by every extracted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub source: String,
    pub page: u32,
    pub has_section: bool,
}

/// Fields read from the PDF Info dictionary. Absent or blank entries stay `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

impl DocumentInfo {
    /// The embedded title, falling back to the Act's name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(SOURCE_TITLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_falls_back_to_act_name() {
        assert_eq!(DocumentInfo::default().display_title(), SOURCE_TITLE);

        let info = DocumentInfo {
            title: Some("Health and Safety at Work Act 2015 No 70".to_string()),
            author: None,
            subject: None,
        };
        assert_eq!(info.display_title(), "Health and Safety at Work Act 2015 No 70");
    }

    #[test]
    fn test_info_round_trips_missing_fields() {
        let info: DocumentInfo = serde_json::from_str(r#"{"title":"HSWA"}"#).unwrap();
        assert_eq!(info.title.as_deref(), Some("HSWA"));
        assert!(info.author.is_none());
    }
}
