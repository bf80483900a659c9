//! Candidate board tokens
//!
//! The candidate universe is finite and curated. The built-in lists below can
//! be replaced by a plain-text file (one token per line, `#` comments).

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;

use crate::kernel::BaseCandidateSource;

/// Venture-backed and public tech companies.
const TECH_COMPANIES: &[&str] = &[
    "airbnb", "stripe", "coinbase", "robinhood", "gusto", "brex",
    // Big tech and unicorns
    "spotify", "discord", "figma", "notion", "airtable", "canva",
    "dropbox", "pinterest", "snap", "lyft", "doordash", "instacart",
    "plaid", "square", "chime", "affirm", "klarna", "sofi", "nerdwallet",
    // Enterprise SaaS
    "datadog", "snowflake", "databricks", "mongodb", "elastic", "supabase",
    "cloudflare", "okta", "crowdstrike", "zscaler", "paloaltonetworks",
    "splunk", "hubspot", "zendesk", "twilio", "segment", "amplitude",
    "mixpanel", "launchdarkly", "hashicorp", "gitlab", "postman",
    // AI
    "openai", "anthropic", "huggingface", "scale", "cohere", "anyscale",
    "langchain", "pinecone", "weaviate", "replicate", "runway", "jasper",
    "descript", "assemblyai", "deepgram", "synthesia",
    // Fintech
    "ramp", "mercury", "deel", "remote", "rippling", "carta", "pilot",
    "brex", "wise", "adyen", "checkout", "marqeta", "moderntreasury",
    "plaid", "unit", "lithic", "alloy", "sardine", "persona",
    // Developer tools
    "vercel", "netlify", "railway", "render", "fly", "deno",
    "prisma", "planetscale", "neon", "cockroachlabs", "timescale",
    "retool", "appsmith", "tooljet", "budibase", "plasmic",
    // Health
    "onemedical", "ro", "hims", "cerebral", "headspace", "calm",
    "noom", "whoop", "oura", "levels", "color", "tempus", "flatiron",
    // E-commerce
    "shopify", "etsy", "wayfair", "chewy", "warbyparker", "allbirds",
    "glossier", "casper", "away", "italic", "faire", "goat", "stockx",
    // Gaming and entertainment
    "riotgames", "epicgames", "unity", "roblox", "niantic",
    "activision", "zynga", "scopely", "kabam", "jam-city",
    // Crypto
    "opensea", "consensys", "chainalysis", "fireblocks", "anchorage",
    "alchemy", "infura", "polygon", "near", "solana", "avalanche",
    // Security
    "snyk", "lacework", "orca-security", "wiz", "cybereason",
    "sentinelone", "vectra", "exabeam", "sumo-logic", "logrhythm",
    // HR
    "lattice", "culture-amp", "lever", "greenhouse", "ashbyhq",
    "gem", "eightfold", "beamery", "phenom", "seekout",
    // Productivity
    "asana", "monday", "clickup", "linear", "height", "shortcut",
    "loom", "miro", "mural", "lucid", "coda", "roam",
];

/// Large enterprises known to host boards.
const ENTERPRISE_COMPANIES: &[&str] = &[
    "adobe", "autodesk", "intuit", "servicenow", "workday", "vmware",
    "docusign", "zoom", "zoominfo", "ringcentral", "five9", "vonage",
    "pagerduty", "dynatrace", "new-relic", "appian", "pegasystems",
    "nutanix", "pure-storage", "netapp", "commvault", "veeam",
    "citrix", "f5", "fortinet", "juniper", "arista",
    "paypal", "block", "payoneer", "bill", "avalara", "coupa",
    "sprinklr", "sproutsocial", "hootsuite", "buffer", "later",
    "mailchimp", "klaviyo", "attentive", "iterable", "braze",
    "contentful", "sanity", "strapi", "storyblok", "hygraph",
];

/// Accelerator-backed startups.
const ACCELERATOR_COMPANIES: &[&str] = &[
    "cal", "resend", "loops", "trigger", "inngest", "defer",
    "unkey", "upstash", "convex", "liveblocks", "partykit",
    "tinybird", "motherduck", "clickhouse", "questdb", "materialize",
    "airbyte", "meltano", "dagster", "prefect", "temporal",
    "snorkel", "labelbox", "superannotate", "v7", "encord",
    "modal", "banana", "baseten", "beam", "cerebrium",
    "weights-biases", "neptune", "comet", "mlflow", "determined",
    "buildkite", "circleci", "semaphore", "harness", "armory",
    "env0", "spacelift", "atlantis", "terrateam", "scalr",
    "infracost", "firefly", "cycloid", "stacklet", "steampipe",
    "teleport", "strongdm", "boundary", "tailscale", "netbird",
    "clerk", "propelauth", "stytch", "workos", "frontegg",
    "permit", "cerbos", "oso", "authzed", "aserto",
    "courier", "knock", "novu", "engagespot", "magicbell",
    "posthog", "june", "heap", "fullstory", "hotjar",
    "highlight", "sentry", "bugsnag", "rollbar", "raygun",
    "stainless", "speakeasy", "fern", "readme", "mintlify",
];

/// Trim and lowercase every token, drop empties, keep the first occurrence of each.
pub fn normalize_candidates<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|token| token.as_ref().trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// A fixed candidate list, either the built-in one or loaded from a file.
#[derive(Debug, Clone)]
pub struct StaticCandidateSource {
    tokens: Vec<String>,
}

impl StaticCandidateSource {
    /// The curated built-in universe.
    pub fn builtin() -> Self {
        Self::from_tokens(
            TECH_COMPANIES
                .iter()
                .chain(ENTERPRISE_COMPANIES)
                .chain(ACCELERATOR_COMPANIES),
        )
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: normalize_candidates(tokens),
        }
    }

    /// Load a candidate file: one token per line, blank lines and `#` comments ignored.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read candidates file {}", path.display()))?;

        let tokens = contents
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default());

        Ok(Self::from_tokens(tokens))
    }

    /// The file's candidates when one is given, otherwise the built-in list.
    pub async fn load(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => {
                let source = Self::from_file(path).await?;
                tracing::info!(path = %path.display(), count = source.len(), "Loaded candidate file");
                Ok(source)
            }
            None => Ok(Self::builtin()),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl BaseCandidateSource for StaticCandidateSource {
    async fn candidates(&self) -> Result<Vec<String>> {
        Ok(self.tokens.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dedups_case_and_whitespace_variants() {
        let tokens = normalize_candidates(["Stripe", " stripe ", "STRIPE", "figma", "", "  ", "Figma"]);
        assert_eq!(tokens, vec!["stripe".to_string(), "figma".to_string()]);
    }

    #[test]
    fn test_builtin_list_is_deduplicated() {
        let source = StaticCandidateSource::builtin();
        let unique: HashSet<_> = source.tokens.iter().collect();

        assert_eq!(unique.len(), source.len());
        // "brex" and "plaid" appear twice in the curated lists
        assert_eq!(source.tokens.iter().filter(|t| *t == "brex").count(), 1);
        assert_eq!(source.tokens.iter().filter(|t| *t == "plaid").count(), 1);
        assert_eq!(source.tokens[0], "airbnb");
    }

    #[tokio::test]
    async fn test_load_falls_back_to_builtin() {
        let source = StaticCandidateSource::load(None).await.unwrap();
        assert_eq!(source.len(), StaticCandidateSource::builtin().len());

        let missing = StaticCandidateSource::load(Some(Path::new("/nonexistent/candidates.txt"))).await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_from_file_skips_comments_and_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("candidates.txt");
        tokio::fs::write(&path, "# fintech\nStripe\n\nramp  # corporate cards\nstripe\n")
            .await
            .unwrap();

        let source = StaticCandidateSource::from_file(&path).await.unwrap();
        assert_eq!(
            source.candidates().await.unwrap(),
            vec!["stripe".to_string(), "ramp".to_string()]
        );
    }

    #[tokio::test]
    async fn test_from_file_missing_is_an_error() {
        let result = StaticCandidateSource::from_file("/nonexistent/candidates.txt").await;
        assert!(result.is_err());
    }
}
