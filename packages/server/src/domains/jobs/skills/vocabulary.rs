//! Skill vocabulary: curated terms grouped by category, plus an alias table
//! mapping spelling variants to one canonical name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Version tag of the built-in vocabulary.
pub const BUILTIN_VOCABULARY_VERSION: &str = "2025.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Languages,
    Frontend,
    Backend,
    Databases,
    CloudDevops,
    DataMl,
    Tools,
    Concepts,
}

const LANGUAGES: &[&str] = &[
    "javascript", "typescript", "python", "java", "c++", "c#", "go", "golang",
    "rust", "ruby", "php", "swift", "kotlin", "scala", "r", "matlab",
    "perl", "haskell", "elixir", "clojure", "lua", "dart", "objective-c",
];

const FRONTEND: &[&str] = &[
    "react", "reactjs", "react.js", "vue", "vuejs", "vue.js", "angular",
    "svelte", "next.js", "nextjs", "nuxt", "gatsby", "remix",
    "html", "css", "sass", "scss", "less", "tailwind", "tailwindcss",
    "bootstrap", "material-ui", "mui", "chakra", "styled-components",
    "webpack", "vite", "rollup", "parcel", "esbuild",
    "redux", "zustand", "mobx", "recoil", "jotai",
];

const BACKEND: &[&str] = &[
    "node", "nodejs", "node.js", "express", "expressjs", "fastify", "koa", "nestjs",
    "django", "flask", "fastapi", "spring", "spring boot", "rails", "ruby on rails",
    "laravel", "asp.net", ".net", "dotnet",
    "graphql", "rest", "restful", "api", "microservices",
    "grpc", "websocket", "websockets",
];

const DATABASES: &[&str] = &[
    "sql", "mysql", "postgresql", "postgres", "sqlite", "oracle", "sql server",
    "mongodb", "dynamodb", "cassandra", "redis", "elasticsearch",
    "firebase", "supabase", "prisma", "sequelize", "typeorm", "mongoose",
    "neo4j", "couchdb", "influxdb", "timescaledb",
];

const CLOUD_DEVOPS: &[&str] = &[
    "aws", "amazon web services", "ec2", "s3", "lambda", "ecs", "eks",
    "gcp", "google cloud", "azure", "heroku", "vercel", "netlify",
    "docker", "kubernetes", "k8s", "terraform", "ansible", "puppet", "chef",
    "jenkins", "github actions", "gitlab ci", "circleci", "travis ci",
    "ci/cd", "devops", "sre", "infrastructure",
    "nginx", "apache", "linux", "unix", "bash", "shell",
];

const DATA_ML: &[&str] = &[
    "machine learning", "ml", "deep learning", "ai", "artificial intelligence",
    "tensorflow", "pytorch", "keras", "scikit-learn", "sklearn",
    "pandas", "numpy", "scipy", "matplotlib", "jupyter",
    "spark", "hadoop", "kafka", "airflow", "dbt",
    "data science", "data engineering", "data analysis", "analytics",
    "nlp", "natural language processing", "computer vision", "cv",
    "llm", "large language model", "gpt", "transformers",
];

const TOOLS: &[&str] = &[
    "git", "github", "gitlab", "bitbucket", "svn",
    "jira", "confluence", "notion", "linear", "asana", "trello",
    "figma", "sketch", "adobe xd",
    "agile", "scrum", "kanban", "sprint",
    "tdd", "test-driven", "unit testing", "integration testing", "e2e",
    "jest", "mocha", "cypress", "playwright", "selenium", "pytest",
];

const CONCEPTS: &[&str] = &[
    "communication", "leadership", "teamwork", "collaboration",
    "problem solving", "critical thinking", "mentorship",
    "system design", "architecture", "scalability", "performance",
    "security", "authentication", "authorization", "oauth", "jwt",
    "accessibility", "a11y", "i18n", "internationalization",
];

const ALIASES: &[(&str, &str)] = &[
    ("reactjs", "react"),
    ("react.js", "react"),
    ("vuejs", "vue"),
    ("vue.js", "vue"),
    ("nodejs", "node.js"),
    ("node", "node.js"),
    ("nextjs", "next.js"),
    ("golang", "go"),
    ("postgres", "postgresql"),
    ("k8s", "kubernetes"),
    ("amazon web services", "aws"),
    ("google cloud", "gcp"),
    ("sklearn", "scikit-learn"),
    ("ml", "machine learning"),
    ("ai", "artificial intelligence"),
    ("tailwindcss", "tailwind"),
];

/// Immutable, versioned term table consumed by `SkillExtractor`.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    version: String,
    categories: Vec<(SkillCategory, Vec<String>)>,
    aliases: HashMap<String, String>,
}

impl SkillVocabulary {
    pub fn new(
        version: impl Into<String>,
        categories: Vec<(SkillCategory, Vec<String>)>,
        aliases: HashMap<String, String>,
    ) -> Self {
        let lower = |s: &String| s.trim().to_lowercase();
        Self {
            version: version.into(),
            categories: categories
                .into_iter()
                .map(|(category, terms)| (category, terms.iter().map(lower).collect()))
                .collect(),
            aliases: aliases.iter().map(|(k, v)| (lower(k), lower(v))).collect(),
        }
    }

    /// The curated vocabulary shipped with the service.
    pub fn builtin() -> Self {
        let owned = |terms: &[&str]| terms.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        Self::new(
            BUILTIN_VOCABULARY_VERSION,
            vec![
                (SkillCategory::Languages, owned(LANGUAGES)),
                (SkillCategory::Frontend, owned(FRONTEND)),
                (SkillCategory::Backend, owned(BACKEND)),
                (SkillCategory::Databases, owned(DATABASES)),
                (SkillCategory::CloudDevops, owned(CLOUD_DEVOPS)),
                (SkillCategory::DataMl, owned(DATA_ML)),
                (SkillCategory::Tools, owned(TOOLS)),
                (SkillCategory::Concepts, owned(CONCEPTS)),
            ],
            ALIASES
                .iter()
                .map(|(variant, canonical)| (variant.to_string(), canonical.to_string()))
                .collect(),
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Every term in category order, duplicates included.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|(_, terms)| terms.iter().map(String::as_str))
    }

    /// Canonical display form of a term.
    pub fn canonical<'a>(&'a self, term: &'a str) -> &'a str {
        self.aliases.get(term).map(String::as_str).unwrap_or(term)
    }

    /// First category listing `skill`, in declaration order.
    pub fn category_of(&self, skill: &str) -> Option<SkillCategory> {
        self.categories
            .iter()
            .find(|(_, terms)| terms.iter().any(|t| t == skill))
            .map(|(category, _)| *category)
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Skills grouped for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategories {
    pub languages: Vec<String>,
    pub frontend: Vec<String>,
    pub backend: Vec<String>,
    pub databases: Vec<String>,
    pub cloud_devops: Vec<String>,
    pub data_ml: Vec<String>,
    pub tools: Vec<String>,
    pub concepts: Vec<String>,
}

/// Group skills by the first vocabulary category that lists them.
/// Skills the vocabulary does not know are left out.
pub fn categorize_skills<S: AsRef<str>>(vocabulary: &SkillVocabulary, skills: &[S]) -> SkillCategories {
    let mut grouped = SkillCategories::default();

    for skill in skills {
        let skill = skill.as_ref();
        let bucket = match vocabulary.category_of(skill) {
            Some(SkillCategory::Languages) => &mut grouped.languages,
            Some(SkillCategory::Frontend) => &mut grouped.frontend,
            Some(SkillCategory::Backend) => &mut grouped.backend,
            Some(SkillCategory::Databases) => &mut grouped.databases,
            Some(SkillCategory::CloudDevops) => &mut grouped.cloud_devops,
            Some(SkillCategory::DataMl) => &mut grouped.data_ml,
            Some(SkillCategory::Tools) => &mut grouped.tools,
            Some(SkillCategory::Concepts) => &mut grouped.concepts,
            None => continue,
        };
        bucket.push(skill.to_string());
    }

    grouped
}
