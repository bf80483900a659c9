use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Title patterns in priority order. First match wins.
    static ref TITLE_LEVELS: Vec<(Regex, ExperienceLevel)> = vec![
        (Regex::new(r"\b(intern|internship)\b").unwrap(), ExperienceLevel::Intern),
        (
            Regex::new(r"\b(entry.level|new.grad|junior|associate|jr\.?)\b").unwrap(),
            ExperienceLevel::Entry,
        ),
        (Regex::new(r"\b(senior|sr\.?|staff|principal)\b").unwrap(), ExperienceLevel::Senior),
        (Regex::new(r"\b(lead|tech.lead|team.lead)\b").unwrap(), ExperienceLevel::Lead),
        (
            Regex::new(r"\b(manager|director|head.of|vp|vice.president)\b").unwrap(),
            ExperienceLevel::Manager,
        ),
    ];
    static ref YEARS_OF_EXPERIENCE: Regex =
        Regex::new(r"(?i)(\d+)\+?\s*(?:years?|yrs?)\s*(?:of)?\s*(?:experience|exp)").unwrap();
    static ref MID_LEVEL: Regex = Regex::new(r"\b(mid.level|intermediate)\b").unwrap();
}

/// Seniority tag derived from a posting's title and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Intern,
    Entry,
    Mid,
    Senior,
    Lead,
    Manager,
    Unknown,
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExperienceLevel::Intern => write!(f, "intern"),
            ExperienceLevel::Entry => write!(f, "entry"),
            ExperienceLevel::Mid => write!(f, "mid"),
            ExperienceLevel::Senior => write!(f, "senior"),
            ExperienceLevel::Lead => write!(f, "lead"),
            ExperienceLevel::Manager => write!(f, "manager"),
            ExperienceLevel::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for ExperienceLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "intern" => Ok(ExperienceLevel::Intern),
            "entry" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            "lead" => Ok(ExperienceLevel::Lead),
            "manager" => Ok(ExperienceLevel::Manager),
            "unknown" => Ok(ExperienceLevel::Unknown),
            _ => Err(anyhow::anyhow!("Invalid experience level: {}", s)),
        }
    }
}

impl ExperienceLevel {
    fn from_years(years: u32) -> Self {
        match years {
            0..=1 => ExperienceLevel::Entry,
            2..=3 => ExperienceLevel::Mid,
            4..=6 => ExperienceLevel::Senior,
            _ => ExperienceLevel::Lead,
        }
    }
}

/// Classify seniority.
///
/// The title is checked first against the level patterns in priority order.
/// Failing that, an explicit "N years of experience" in title + description
/// decides; a count too large to parse counts as the top band. Failing that,
/// a "mid-level"/"intermediate" phrase means `Mid`.
pub fn detect_experience_level(title: &str, description: &str) -> ExperienceLevel {
    let title = title.to_lowercase();

    if let Some((_, level)) = TITLE_LEVELS.iter().find(|(pattern, _)| pattern.is_match(&title)) {
        return *level;
    }

    let text = format!("{} {}", title, description.to_lowercase());

    if let Some(years) = YEARS_OF_EXPERIENCE
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX))
    {
        return ExperienceLevel::from_years(years);
    }

    if MID_LEVEL.is_match(&text) {
        return ExperienceLevel::Mid;
    }

    ExperienceLevel::Unknown
}
