use std::collections::BTreeMap;
use std::fmt;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The nine fixed categories of profile information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSection {
    PersonalDetails,
    Education,
    Travel,
    WorkDetails,
    Financials,
    Documents,
    CourseDetails,
    University,
    PostAdmission,
}

impl ProfileSection {
    pub const ALL: [ProfileSection; 9] = [
        ProfileSection::PersonalDetails,
        ProfileSection::Education,
        ProfileSection::Travel,
        ProfileSection::WorkDetails,
        ProfileSection::Financials,
        ProfileSection::Documents,
        ProfileSection::CourseDetails,
        ProfileSection::University,
        ProfileSection::PostAdmission,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            ProfileSection::PersonalDetails => "personal_details",
            ProfileSection::Education => "education",
            ProfileSection::Travel => "travel",
            ProfileSection::WorkDetails => "work_details",
            ProfileSection::Financials => "financials",
            ProfileSection::Documents => "documents",
            ProfileSection::CourseDetails => "course_details",
            ProfileSection::University => "university",
            ProfileSection::PostAdmission => "post_admission",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ProfileSection::PersonalDetails => "Personal details",
            ProfileSection::Education => "Education",
            ProfileSection::Travel => "Travel",
            ProfileSection::WorkDetails => "Work details",
            ProfileSection::Financials => "Financials",
            ProfileSection::Documents => "Documents",
            ProfileSection::CourseDetails => "Course details",
            ProfileSection::University => "University",
            ProfileSection::PostAdmission => "Post-admission",
        }
    }

    /// Accepts both `course_details` and `courseDetails` spellings.
    pub fn from_key(raw: &str) -> Option<Self> {
        let folded: String = raw
            .trim()
            .chars()
            .filter(|ch| *ch != '_' && *ch != '-')
            .map(|ch| ch.to_ascii_lowercase())
            .collect();

        ProfileSection::ALL
            .into_iter()
            .find(|section| section.key().replace('_', "") == folded)
    }
}

impl fmt::Display for ProfileSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-batch override of which sections apply to its students.
///
/// Sections without an explicit entry are visible. Deserialization is lenient: unknown keys are
/// dropped and any non-boolean value counts as visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionVisibility {
    overrides: BTreeMap<ProfileSection, bool>,
}

impl SectionVisibility {
    pub fn all_visible() -> Self {
        Self::default()
    }

    pub fn with(mut self, section: ProfileSection, visible: bool) -> Self {
        self.set(section, visible);
        self
    }

    pub fn hiding(sections: &[ProfileSection]) -> Self {
        sections
            .iter()
            .fold(Self::default(), |visibility, section| {
                visibility.with(*section, false)
            })
    }

    pub fn set(&mut self, section: ProfileSection, visible: bool) {
        self.overrides.insert(section, visible);
    }

    pub fn is_visible(&self, section: ProfileSection) -> bool {
        self.overrides.get(&section).copied().unwrap_or(true)
    }

    /// Lenient conversion from an arbitrary JSON value; anything but an object yields the default.
    pub fn from_json(value: &Value) -> Self {
        let mut visibility = Self::default();
        if let Value::Object(entries) = value {
            for (key, raw) in entries {
                if let Some(section) = ProfileSection::from_key(key) {
                    visibility.set(section, raw.as_bool().unwrap_or(true));
                }
            }
        }
        visibility
    }
}

impl Serialize for SectionVisibility {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(ProfileSection::ALL.len()))?;
        for section in ProfileSection::ALL {
            map.serialize_entry(section.key(), &self.is_visible(section))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SectionVisibility {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}
