use serde::{Deserialize, Serialize};

/// One editable block of landing-page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub is_active: bool,
}

/// Fields a user fills in when adding or editing a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDraft {
    pub title: String,
    pub description: String,
}

impl SectionDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn from_section(section: &ContentSection) -> Self {
        Self::new(section.title.clone(), section.description.clone())
    }

    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

impl ContentSection {
    pub fn apply(&mut self, draft: SectionDraft) {
        self.title = draft.title;
        self.description = draft.description;
    }
}

pub fn seed_sections() -> Vec<ContentSection> {
    [
        ("Hero Section", "Primary landing section"),
        ("Problem Awareness", "Explains the manual measure pain"),
        ("Solution Pitch", "AI introduction"),
        ("Features Grid", "Core value propositions"),
        ("Visual Demo", "Interactive interface preview"),
        ("Pricing Matrix", "Plan selection architecture"),
    ]
    .into_iter()
    .zip(1u64..)
    .map(|((title, description), id)| ContentSection {
        id,
        title: title.to_string(),
        description: description.to_string(),
        is_active: true,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_sections_are_active_with_sequential_ids() {
        let sections = seed_sections();
        assert_eq!(sections.len(), 6);
        assert!(sections.iter().all(|section| section.is_active));
        let ids: Vec<u64> = sections.iter().map(|section| section.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(sections[0].title, "Hero Section");
    }

    #[test]
    fn blank_titles_are_not_submittable() {
        assert!(!SectionDraft::new("   ", "body").is_submittable());
        assert!(SectionDraft::new("Testimonials Cloud", "").is_submittable());
    }
}
