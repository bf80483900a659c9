//! Keyword skill extraction and seniority classification.

pub mod experience;
pub mod extractor;
pub mod vocabulary;

pub use experience::{detect_experience_level, ExperienceLevel};
pub use extractor::SkillExtractor;
pub use vocabulary::{categorize_skills, SkillCategories, SkillCategory, SkillVocabulary};
