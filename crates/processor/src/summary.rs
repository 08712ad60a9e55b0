//! Narrative activity summaries
//!
//! Builds a structured prompt from a contributor's metrics and asks a
//! chat-completion endpoint for a short factual summary. Responses that
//! look fabricated (placeholder PR numbers, repeated numbers) are
//! regenerated once with stricter instructions; any failure degrades to an
//! empty summary rather than aborting the batch.

use std::time::Duration;

use common::models::ContributorMetrics;
use common::{AiSummaryConfig, Error, IntervalType};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: String,
}

const SYSTEM_PROMPT: &str = "You are writing GitHub activity summaries. Use only the actual \
contribution data provided. Never add, modify or make up information. Focus on real PR/issue \
numbers and metrics.";

/// Build the HTTP client for summary generation with the configured
/// timeout. The endpoint never gets an unbounded call.
pub fn build_client(config: &AiSummaryConfig) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
}

/// Generate a short narrative summary of a contributor's activity.
/// Returns an empty string when disabled, unconfigured, or on failure.
pub async fn generate_contributor_summary(
    client: &Client,
    metrics: &ContributorMetrics,
    config: &AiSummaryConfig,
    interval: IntervalType,
) -> String {
    if !config.enabled {
        return String::new();
    }
    let Some(api_key) = config.api_key.as_deref() else {
        warn!("No API key for summary generation");
        return String::new();
    };

    if !has_activity(metrics) {
        return format!(
            "{}: No activity {}.",
            metrics.username,
            period_phrase(interval)
        );
    }

    let prompt = build_prompt(metrics, interval);

    let summary = match request_summary(client, config, api_key, &prompt).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Error generating summary for {}: {}", metrics.username, e);
            return String::new();
        }
    };

    if !has_suspicious_patterns(&summary) {
        return summary;
    }

    warn!(
        "Summary for {} contains suspicious PR numbers, regenerating",
        metrics.username
    );
    let retry_prompt = format!(
        "{prompt}\n\nIMPORTANT: Do not use any PR or issue numbers unless they are explicitly \
         provided in the data above. Never use placeholder numbers like #101, #102, etc."
    );
    match request_summary(client, config, api_key, &retry_prompt).await {
        Ok(retry) => retry,
        Err(e) => {
            warn!("Summary retry for {} failed: {}", metrics.username, e);
            summary
        }
    }
}

async fn request_summary(
    client: &Client,
    config: &AiSummaryConfig,
    api_key: &str,
    prompt: &str,
) -> common::Result<String> {
    let request = ChatRequest {
        model: config.model.clone(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            },
        ],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };

    let response = client
        .post(&config.endpoint)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&request)
        .send()
        .await
        .map_err(|e| Error::Summary(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Summary(format!(
            "API request failed {status}: {body}"
        )));
    }

    let chat_response: ChatResponse = response
        .json()
        .await
        .map_err(|e| Error::Summary(format!("malformed response: {e}")))?;

    Ok(chat_response
        .choices
        .first()
        .map(|choice| choice.message.content.trim().to_string())
        .unwrap_or_default())
}

fn has_activity(metrics: &ContributorMetrics) -> bool {
    metrics.pull_requests.merged > 0
        || metrics.pull_requests.open > 0
        || metrics.issues.total > 0
        || metrics.reviews.total > 0
        || metrics.code_changes.files > 0
}

fn period_phrase(interval: IntervalType) -> &'static str {
    match interval {
        IntervalType::Day => "today",
        IntervalType::Week => "this week",
        IntervalType::Month => "this month",
    }
}

/// Build the structured prompt from actual contribution data
fn build_prompt(metrics: &ContributorMetrics, interval: IntervalType) -> String {
    let top_dirs = infer_top_areas(&metrics.focus_areas);

    let mut merged_lines = Vec::new();
    let mut open_lines = Vec::new();
    for item in &metrics.pull_requests.items {
        let area = item_area(&item.title, &top_dirs);
        if item.merged {
            merged_lines.push(format!(
                "#{} \"{}\" in {} (+{}/-{} lines)",
                item.number,
                truncate_title(&item.title, 50),
                area,
                item.additions,
                item.deletions
            ));
        } else {
            open_lines.push(format!(
                "#{} \"{}\" in {}",
                item.number,
                truncate_title(&item.title, 50),
                area
            ));
        }
    }

    let issue_lines: Vec<String> = metrics
        .issues
        .items
        .iter()
        .map(|item| {
            format!(
                "#{} \"{}\" ({})",
                item.number,
                truncate_title(&item.title, 50),
                match item.state {
                    common::models::IssueState::Open => "open",
                    common::models::IssueState::Closed => "closed",
                }
            )
        })
        .collect();

    let reviews_line = if metrics.reviews.total > 0 {
        format!(
            "{} total ({} approvals, {} change requests, {} comments)",
            metrics.reviews.total,
            metrics.reviews.approved,
            metrics.reviews.changes_requested,
            metrics.reviews.commented
        )
    } else {
        "None".to_string()
    };

    let code_line = if metrics.code_changes.files > 0 {
        format!(
            "Modified {} files (+{}/-{} lines)",
            metrics.code_changes.files,
            metrics.code_changes.additions,
            metrics.code_changes.deletions
        )
    } else {
        "No code changes".to_string()
    };

    let period = period_phrase(interval);

    format!(
        "Summarize {username}'s actual contributions {period}:\n\n\
         Pull Requests:\n\
         - Merged: {merged}\n\
         - Opened: {open}\n\n\
         Issues:\n\
         {issues}\n\n\
         Reviews: {reviews}\n\n\
         Code Changes:\n\
         {code}\n\n\
         Primary Areas: {areas}\n\n\
         Write a natural, factual summary that:\n\
         1. Starts with \"{username}: \"\n\
         2. ONLY includes their actual contributions from the data above\n\
         3. Uses exact PR/issue numbers ONLY if they are provided in the data (never make up numbers)\n\
         4. Groups similar activities by area (e.g., \"merged 3 PRs in backend\")\n\
         5. Includes line changes (+X/-Y) for significant code changes\n\
         6. Omits any activity type that shows \"None\" above\n\
         7. Uses at most 2 sentences\n\
         8. Varies sentence structure based on the actual work done\n\n\
         Example good summaries:\n\
         \"username: No activity {period}.\"\n\
         \"username: Merged PR #123 in auth (+500/-200 lines) and provided 5 code reviews.\"\n\
         \"username: Opened 2 PRs in UI and reviewed 3 PRs with 2 approvals.\"\n\
         \"username: Addressed issue #456 in core and provided 4 code reviews with 3 approvals.\"",
        username = metrics.username,
        period = period,
        merged = join_or_none(&merged_lines),
        open = join_or_none(&open_lines),
        issues = join_or_none(&issue_lines),
        reviews = reviews_line,
        code = code_line,
        areas = if top_dirs.is_empty() {
            "N/A".to_string()
        } else {
            top_dirs.join(", ")
        },
    )
}

fn join_or_none(lines: &[String]) -> String {
    if lines.is_empty() {
        "None".to_string()
    } else {
        lines.join(", ")
    }
}

/// Reduce the top focus-area directories to short human-readable names
fn infer_top_areas(focus_areas: &[common::models::FocusArea]) -> Vec<String> {
    focus_areas
        .iter()
        .take(2)
        .map(|focus| {
            let parts: Vec<&str> = focus.area.split('/').collect();
            if let Some(index) = parts.iter().position(|part| *part == "packages") {
                if let Some(package) = parts.get(index + 1) {
                    return package.to_string();
                }
            }
            if parts.iter().any(|part| part.contains("docs")) {
                return "docs".to_string();
            }
            parts
                .first()
                .filter(|part| !part.is_empty())
                .map(|part| part.to_string())
                .unwrap_or_else(|| focus.area.clone())
        })
        .collect()
}

/// Assign a PR to one of the top areas when its title mentions it
fn item_area(title: &str, top_dirs: &[String]) -> String {
    let title = title.to_lowercase();
    top_dirs
        .iter()
        .find(|dir| title.contains(&dir.to_lowercase()))
        .cloned()
        .unwrap_or_else(|| "other".to_string())
}

fn truncate_title(title: &str, max_length: usize) -> String {
    if title.chars().count() <= max_length {
        return title.to_string();
    }
    let truncated: String = title.chars().take(max_length.saturating_sub(3)).collect();
    format!("{truncated}...")
}

/// Detect fabricated-looking output: placeholder PR numbers in the
/// #101-#109 / #201-#209 ranges, or the same PR number repeated
fn has_suspicious_patterns(summary: &str) -> bool {
    let numbers = extract_pr_numbers(summary);

    for number in &numbers {
        if let Ok(value) = number.parse::<u32>() {
            if (101..=109).contains(&value) || (201..=209).contains(&value) {
                return true;
            }
        }
    }

    let unique: std::collections::HashSet<&String> = numbers.iter().collect();
    numbers.len() > unique.len()
}

/// All "#123"-style tokens in the text
fn extract_pr_numbers(text: &str) -> Vec<String> {
    let mut numbers = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '#' {
            continue;
        }
        let mut digits = String::new();
        while let Some(d) = chars.peek() {
            if d.is_ascii_digit() {
                digits.push(*d);
                chars.next();
            } else {
                break;
            }
        }
        if !digits.is_empty() {
            numbers.push(digits);
        }
    }

    numbers
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{FocusArea, PrItem, PullRequestStats};

    #[test]
    fn test_placeholder_pr_numbers_are_suspicious() {
        assert!(has_suspicious_patterns("alice: Merged PR #101 in core."));
        assert!(has_suspicious_patterns("bob: Fixed #205 and #207."));
        assert!(!has_suspicious_patterns("carol: Merged PR #4furthermore."));
        assert!(!has_suspicious_patterns("dave: Merged PR #4123 in auth."));
    }

    #[test]
    fn test_repeated_pr_numbers_are_suspicious() {
        assert!(has_suspicious_patterns(
            "erin: Merged PR #42 and reviewed PR #42."
        ));
        assert!(!has_suspicious_patterns(
            "erin: Merged PR #42 and reviewed PR #43."
        ));
    }

    #[test]
    fn test_extract_pr_numbers() {
        assert_eq!(
            extract_pr_numbers("Fixed #12, #345 and issue #6"),
            vec!["12", "345", "6"]
        );
        assert!(extract_pr_numbers("no numbers here # at all").is_empty());
    }

    #[test]
    fn test_infer_top_areas() {
        let areas = vec![
            FocusArea {
                area: "packages/core/src".to_string(),
                count: 10,
                percentage: 50,
            },
            FocusArea {
                area: "docs/guide".to_string(),
                count: 5,
                percentage: 25,
            },
            FocusArea {
                area: "src/api".to_string(),
                count: 3,
                percentage: 15,
            },
        ];
        assert_eq!(infer_top_areas(&areas), vec!["core", "docs"]);
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("short", 50), "short");
        let long = "a".repeat(60);
        let truncated = truncate_title(&long, 50);
        assert_eq!(truncated.chars().count(), 50);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_prompt_contains_actual_data() {
        let metrics = ContributorMetrics {
            username: "alice".to_string(),
            pull_requests: PullRequestStats {
                total: 1,
                merged: 1,
                items: vec![PrItem {
                    id: "repo/pull/77".to_string(),
                    number: 77,
                    title: "Add retry logic to fetcher".to_string(),
                    merged: true,
                    additions: 120,
                    deletions: 30,
                }],
                ..Default::default()
            },
            ..Default::default()
        };

        let prompt = build_prompt(&metrics, IntervalType::Day);
        assert!(prompt.contains("alice"));
        assert!(prompt.contains("#77"));
        assert!(prompt.contains("+120/-30"));
        assert!(prompt.contains("Opened: None"));
    }
}
