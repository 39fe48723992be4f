//! Curriculum data model.
//!
//! The serialized form is the curriculum index consumed by the presentation
//! layer: `[{ "title": ..., "items": [{ "title": ..., "file": ... }] }]`.

use serde::{Deserialize, Deserializer, Serialize};

/// One processed lesson: display title plus the content file key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonItem {
    pub title: String,
    /// Destination-relative file name, also the key the body is fetched by.
    pub file: String,
}

/// An ordered group of lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumSection {
    pub title: String,
    pub items: Vec<LessonItem>,
}

impl CurriculumSection {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, title: impl Into<String>, file: impl Into<String>) {
        self.items.push(LessonItem {
            title: title.into(),
            file: file.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Ordered sections of one course. Never contains an empty section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Curriculum {
    sections: Vec<CurriculumSection>,
}

impl Curriculum {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `section` unless it has no items. Returns whether it was kept.
    pub fn push(&mut self, section: CurriculumSection) -> bool {
        if section.is_empty() {
            return false;
        }
        self.sections.push(section);
        true
    }

    #[must_use]
    pub fn sections(&self) -> &[CurriculumSection] {
        &self.sections
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of lessons across sections.
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.sections.iter().map(CurriculumSection::len).sum()
    }

    /// All lessons in navigation order.
    pub fn lessons(&self) -> impl Iterator<Item = &LessonItem> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }
}

impl FromIterator<CurriculumSection> for Curriculum {
    fn from_iter<I: IntoIterator<Item = CurriculumSection>>(iter: I) -> Self {
        let mut curriculum = Curriculum::new();
        for section in iter {
            curriculum.push(section);
        }
        curriculum
    }
}

// Goes through `FromIterator`, which drops empty sections.
impl<'de> Deserialize<'de> for Curriculum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<CurriculumSection>::deserialize(deserializer).map(Self::from_iter)
    }
}
