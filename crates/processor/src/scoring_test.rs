#[cfg(test)]
mod tests {
    use crate::scoring::*;
    use chrono::{DateTime, TimeZone, Utc};
    use common::models::{
        Comment, Issue, IssueState, PrFile, PrState, PullRequest, Review, ReviewState,
    };
    use common::scoring::ScoringConfig;
    use common::tags::{TagCategory, TagRule, TagRuleSet};
    use std::collections::HashMap;

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap()
    }

    fn make_pr(id: &str, created_at: DateTime<Utc>) -> PullRequest {
        PullRequest {
            id: id.to_string(),
            repository: "acme/widgets".to_string(),
            number: 1,
            title: "Test PR".to_string(),
            author: Some("alice".to_string()),
            state: PrState::Open,
            merged: false,
            created_at,
            merged_at: None,
            closed_at: None,
            additions: 0,
            deletions: 0,
            changed_files: 0,
            body: None,
        }
    }

    fn make_file(pr_id: &str, path: &str, additions: i64, deletions: i64) -> PrFile {
        PrFile {
            pr_id: pr_id.to_string(),
            path: path.to_string(),
            additions,
            deletions,
        }
    }

    fn make_issue(id: &str, state: IssueState, labels: &str) -> Issue {
        Issue {
            id: id.to_string(),
            repository: "acme/widgets".to_string(),
            number: 1,
            title: "Test issue".to_string(),
            author: Some("alice".to_string()),
            state,
            created_at: ts(1, 0),
            closed_at: None,
            labels: labels.to_string(),
        }
    }

    fn make_review(id: &str, state: ReviewState, body: Option<&str>, submitted_at: DateTime<Utc>) -> Review {
        Review {
            id: id.to_string(),
            pr_id: "acme/widgets/pull/1".to_string(),
            author: Some("alice".to_string()),
            state,
            body: body.map(str::to_string),
            submitted_at,
        }
    }

    fn make_comment(id: &str, parent_id: &str, body: Option<&str>, created_at: DateTime<Utc>) -> Comment {
        Comment {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            author: Some("alice".to_string()),
            body: body.map(str::to_string),
            created_at,
        }
    }

    fn no_rules() -> TagRuleSet {
        TagRuleSet::default()
    }

    // Pull request scoring

    #[test]
    fn test_daily_cap_limits_scored_prs() {
        let config = ScoringConfig::default();
        let prs: Vec<PullRequest> = (0..12)
            .map(|i| make_pr(&format!("pr-{i}"), ts(5, i)))
            .collect();

        let outcome = score_pull_requests(&prs, &HashMap::new(), &no_rules(), &config);

        // Exactly max_per_day processed; the overflow is invisible to
        // counts and score alike
        assert_eq!(outcome.stats.total, 10);
        assert_eq!(outcome.stats.items.len(), 10);
        let single = score_pull_requests(
            &[make_pr("solo", ts(5, 0))],
            &HashMap::new(),
            &no_rules(),
            &config,
        );
        assert!((outcome.score - single.score * 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_cap_excludes_overflow_files() {
        let mut config = ScoringConfig::default();
        config.pull_request.max_per_day = 1;
        let prs = vec![make_pr("pr-0", ts(5, 1)), make_pr("pr-1", ts(5, 2))];
        let mut files = HashMap::new();
        files.insert("pr-0".to_string(), vec![make_file("pr-0", "src/a.rs", 5, 1)]);
        files.insert("pr-1".to_string(), vec![make_file("pr-1", "src/b.rs", 7, 2)]);

        let outcome = score_pull_requests(&prs, &files, &no_rules(), &config);

        assert_eq!(outcome.stats.total, 1);
        assert_eq!(outcome.file_paths, vec!["src/a.rs".to_string()]);
        assert_eq!(outcome.code_changes.additions, 5);
        assert_eq!(outcome.code_changes.files, 1);
    }

    #[test]
    fn test_prs_on_separate_days_all_scored() {
        let mut config = ScoringConfig::default();
        config.pull_request.max_per_day = 2;
        let prs = vec![
            make_pr("pr-0", ts(5, 1)),
            make_pr("pr-1", ts(5, 2)),
            make_pr("pr-2", ts(6, 1)),
            make_pr("pr-3", ts(6, 2)),
        ];

        let outcome = score_pull_requests(&prs, &HashMap::new(), &no_rules(), &config);
        assert_eq!(outcome.stats.total, 4);
    }

    #[test]
    fn test_pr_scenario_with_area_multiplier() {
        let mut config = ScoringConfig::default();
        config.pull_request.base = 1.0;
        config.pull_request.merged = 2.0;
        config.pull_request.description_multiplier = 0.05;
        config.pull_request.complexity_multiplier = 0.5;
        config.pull_request.optimal_size_bonus = 5.0;

        let rules = TagRuleSet {
            area: vec![TagRule {
                name: "backend".to_string(),
                category: TagCategory::Area,
                patterns: vec!["api/".to_string()],
                weight: 1.5,
            }],
            ..Default::default()
        };

        let mut pr = make_pr("pr-0", ts(5, 1));
        pr.merged = true;
        pr.additions = 150;
        pr.deletions = 50;
        pr.changed_files = 3;
        pr.body = Some("x".repeat(40));

        let mut files = HashMap::new();
        files.insert(
            "pr-0".to_string(),
            vec![
                make_file("pr-0", "api/routes.rs", 100, 30),
                make_file("pr-0", "src/lib.rs", 40, 15),
                make_file("pr-0", "README.md", 10, 5),
            ],
        );

        let outcome = score_pull_requests(&[pr], &files, &rules, &config);

        // base 1 + merged 2 + description min(40*0.05, 10)=2
        // + complexity min(3,10)*ln(min(200,1000)+1)*0.5
        // + optimal size 5, all times the matched area weight 1.5
        let expected = (1.0 + 2.0 + 2.0 + 3.0 * (201.0_f64).ln() * 0.5 + 5.0) * 1.5;
        assert!((outcome.score - expected).abs() < 1e-9);
        assert!((outcome.score - 26.93).abs() < 0.01);
    }

    #[test]
    fn test_pr_area_multiplier_takes_maximum() {
        let mut config = ScoringConfig::default();
        config.pull_request.base = 1.0;
        config.pull_request.merged = 0.0;

        let rules = TagRuleSet {
            area: vec![
                TagRule {
                    name: "backend".to_string(),
                    category: TagCategory::Area,
                    patterns: vec!["api/".to_string()],
                    weight: 1.5,
                },
                TagRule {
                    name: "docs".to_string(),
                    category: TagCategory::Area,
                    patterns: vec!["docs/".to_string()],
                    weight: 0.8,
                },
            ],
            ..Default::default()
        };

        let pr = make_pr("pr-0", ts(5, 1));
        let mut files = HashMap::new();
        files.insert(
            "pr-0".to_string(),
            vec![
                make_file("pr-0", "api/routes.rs", 0, 0),
                make_file("pr-0", "docs/guide.md", 0, 0),
            ],
        );

        let outcome = score_pull_requests(&[pr], &files, &rules, &config);
        assert!((outcome.score - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_pr_low_weight_area_can_reduce_score() {
        let mut config = ScoringConfig::default();
        config.pull_request.base = 1.0;
        config.pull_request.merged = 0.0;

        let rules = TagRuleSet {
            area: vec![TagRule {
                name: "docs".to_string(),
                category: TagCategory::Area,
                patterns: vec!["docs/".to_string()],
                weight: 0.8,
            }],
            ..Default::default()
        };

        let pr = make_pr("pr-0", ts(5, 1));
        let mut files = HashMap::new();
        files.insert(
            "pr-0".to_string(),
            vec![make_file("pr-0", "docs/guide.md", 0, 0)],
        );

        let outcome = score_pull_requests(&[pr], &files, &rules, &config);
        assert!((outcome.score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_oversize_penalty_can_go_negative() {
        let mut config = ScoringConfig::default();
        config.pull_request.base = 0.0;
        config.pull_request.merged = 0.0;
        config.pull_request.description_multiplier = 0.0;
        config.pull_request.complexity_multiplier = 0.0;

        let mut pr = make_pr("pr-0", ts(5, 1));
        pr.additions = 1500;
        pr.deletions = 100;

        let outcome = score_pull_requests(&[pr], &HashMap::new(), &no_rules(), &config);
        assert!((outcome.score - (-5.0)).abs() < 1e-9);
        assert_eq!(composite_score(outcome.score, 0.0, 0.0, 0.0, 0.0), -5);
    }

    // Issue scoring

    #[test]
    fn test_issue_label_multipliers_compound() {
        let mut config = ScoringConfig::default();
        config.issue.base = 4.0;
        config
            .issue
            .with_labels_multiplier
            .insert("bug".to_string(), 2.0);
        config
            .issue
            .with_labels_multiplier
            .insert("urgent".to_string(), 1.5);

        let plain = make_issue("i-0", IssueState::Open, "[]");
        let bug = make_issue("i-1", IssueState::Open, r#"[{"name": "Bug"}]"#);
        let both = make_issue(
            "i-2",
            IssueState::Open,
            r#"[{"name": "bug"}, {"name": "urgent"}]"#,
        );

        let base = score_issues(&[plain], &HashMap::new(), &config).score;
        let doubled = score_issues(&[bug], &HashMap::new(), &config).score;
        let tripled = score_issues(&[both], &HashMap::new(), &config).score;

        assert!((doubled - base * 2.0).abs() < 1e-9);
        assert!((tripled - base * 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_issue_malformed_labels_ignored() {
        let config = ScoringConfig::default();
        let plain = make_issue("i-0", IssueState::Open, "[]");
        let broken = make_issue("i-1", IssueState::Open, "{{not json");

        let a = score_issues(&[plain], &HashMap::new(), &config).score;
        let b = score_issues(&[broken], &HashMap::new(), &config).score;
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_issue_fast_resolution_beats_slow() {
        let config = ScoringConfig::default();

        let mut fast = make_issue("i-0", IssueState::Closed, "[]");
        fast.closed_at = Some(ts(1, 12));
        let mut slow = make_issue("i-1", IssueState::Closed, "[]");
        slow.closed_at = Some(ts(30, 0));

        let fast_score = score_issues(&[fast], &HashMap::new(), &config).score;
        let slow_score = score_issues(&[slow], &HashMap::new(), &config).score;
        assert!(fast_score > slow_score);
    }

    #[test]
    fn test_issue_resolution_speed_floor() {
        let mut config = ScoringConfig::default();
        config.issue.base = 3.0;
        config.issue.closed_bonus = 5.0;

        let mut issue = make_issue("i-0", IssueState::Closed, "[]");
        // 100 days to close: multiplier bottoms out at 0.5
        issue.closed_at = Some(Utc.with_ymd_and_hms(2026, 4, 11, 0, 0, 0).unwrap());

        let outcome = score_issues(&[issue], &HashMap::new(), &config);
        assert!((outcome.score - (3.0 + 5.0) * 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_issue_comments_counted_fully_scored_capped() {
        let mut config = ScoringConfig::default();
        config.issue.base = 0.0;
        config.issue.per_comment = 1.0;

        let issue = make_issue("i-0", IssueState::Open, "[]");
        let comments: Vec<Comment> = (0..5)
            .map(|i| make_comment(&format!("c-{i}"), "i-0", Some("thanks"), ts(2, i)))
            .collect();
        let mut by_issue = HashMap::new();
        by_issue.insert("i-0".to_string(), comments);

        let outcome = score_issues(&[issue], &by_issue, &config);
        assert_eq!(outcome.comment_stats.issues, 5);
        assert_eq!(outcome.comment_stats.total, 5);
        // Only max_per_thread comments earn points
        assert!((outcome.score - 3.0).abs() < 1e-9);
    }

    // Review scoring

    #[test]
    fn test_review_daily_cap() {
        let config = ScoringConfig::default();
        let reviews: Vec<Review> = (0..10)
            .map(|i| make_review(&format!("r-{i}"), ReviewState::Approved, None, ts(5, i)))
            .collect();

        let outcome = score_reviews(&reviews, &config);
        assert_eq!(outcome.stats.total, 8);
        assert_eq!(outcome.stats.approved, 8);
    }

    #[test]
    fn test_review_thoroughness_multipliers_compose() {
        let config = ScoringConfig::default();
        let body = "y".repeat(250);
        let review = make_review("r-0", ReviewState::ChangesRequested, Some(&body), ts(5, 1));

        let outcome = score_reviews(&[review], &config);
        // (base 3 + changes_requested 3 + detailed min(250*0.02, 8)=5)
        // times 1.3 * 1.5 for a long change-request body
        let expected = (3.0 + 3.0 + 5.0) * 1.3 * 1.5;
        assert!((outcome.score - expected).abs() < 1e-9);
        assert_eq!(outcome.stats.changes_requested, 1);
    }

    #[test]
    fn test_review_short_body_no_thoroughness() {
        let config = ScoringConfig::default();
        let review = make_review("r-0", ReviewState::Approved, Some("lgtm"), ts(5, 1));

        let outcome = score_reviews(&[review], &config);
        let expected = 3.0 + 2.0 + 4.0 * 0.02;
        assert!((outcome.score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_review_detailed_feedback_capped_at_eight() {
        let mut config = ScoringConfig::default();
        config.review.base = 0.0;
        config.review.commented = 0.0;
        config.review.thoroughness_multiplier = 1.0;
        let body = "z".repeat(5000);
        let review = make_review("r-0", ReviewState::Commented, Some(&body), ts(5, 1));

        let outcome = score_reviews(&[review], &config);
        assert!((outcome.score - 8.0).abs() < 1e-9);
    }

    // PR comment scoring

    #[test]
    fn test_comment_diminishing_returns_sequence() {
        let mut config = ScoringConfig::default();
        config.comment.base = 1.0;
        config.comment.substantive_multiplier = 0.0;
        config.comment.max_per_thread = 3;

        let comments: Vec<Comment> = (0..5)
            .map(|i| make_comment(&format!("c-{i}"), "pr-0", None, ts(2, i)))
            .collect();

        let outcome = score_pr_comments(&comments, &config);
        // k-th scored comment contributes base * 0.7^(k-1)
        let expected = 1.0 + 0.7 + 0.49;
        assert!((outcome.score - expected).abs() < 1e-9);
        assert_eq!(outcome.stats.pull_requests, 5);
        assert_eq!(outcome.stats.total, 5);
    }

    #[test]
    fn test_comment_substantive_bonus_capped_by_factor() {
        let mut config = ScoringConfig::default();
        config.comment.base = 0.0;
        let long = "w".repeat(1000);
        let comments = vec![
            make_comment("c-0", "pr-0", Some(&long), ts(2, 0)),
            make_comment("c-1", "pr-0", Some(&long), ts(2, 1)),
        ];

        let outcome = score_pr_comments(&comments, &config);
        // Cap is 3 * factor: 3.0 for the first comment, 2.1 for the second
        assert!((outcome.score - (3.0 + 3.0 * 0.7)).abs() < 1e-9);
    }

    #[test]
    fn test_comment_threads_independent() {
        let mut config = ScoringConfig::default();
        config.comment.base = 1.0;
        config.comment.substantive_multiplier = 0.0;

        let comments = vec![
            make_comment("c-0", "pr-0", None, ts(2, 0)),
            make_comment("c-1", "pr-1", None, ts(2, 1)),
        ];

        let outcome = score_pr_comments(&comments, &config);
        // Each thread starts at full factor
        assert!((outcome.score - 2.0).abs() < 1e-9);
    }

    // Code score

    #[test]
    fn test_code_score_caps_lines() {
        let config = ScoringConfig::default();
        let changes = common::models::CodeChanges {
            additions: 5000,
            deletions: 3000,
            files: 10,
        };

        let score = score_code_changes(&changes, &[], &config);
        let expected = 1000.0 * 0.01 + 1000.0 * 0.02 + 10.0 * 0.1;
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_code_score_test_coverage_bonus() {
        let config = ScoringConfig::default();
        let changes = common::models::CodeChanges::default();
        let paths = vec![
            "src/lib.rs".to_string(),
            "src/parser.test.ts".to_string(),
            "app/components/__tests__/button.tsx".to_string(),
            "crates/db/test/fixtures.rs".to_string(),
            "src/api.spec.js".to_string(),
        ];

        let score = score_code_changes(&changes, &paths, &config);
        assert!((score - 4.0 * 2.0).abs() < 1e-9);
    }

    // Distributions

    #[test]
    fn test_focus_areas_top_five_with_percentages() {
        let mut paths = Vec::new();
        for (dir, count) in [
            ("src/api", 5),
            ("src/ui", 3),
            ("docs", 1),
            ("tests", 1),
            ("ci", 1),
            ("scripts", 1),
        ] {
            for i in 0..count {
                paths.push(format!("{dir}/file{i}.rs"));
            }
        }
        // No directory component: excluded entirely
        paths.push("README.md".to_string());

        let areas = focus_areas(&paths);
        assert_eq!(areas.len(), 5);
        assert_eq!(areas[0].area, "src/api");
        assert_eq!(areas[0].count, 5);
        // 5 of 12 counted files
        assert_eq!(areas[0].percentage, 42);
        assert_eq!(areas[1].area, "src/ui");
        assert_eq!(areas[1].percentage, 25);
    }

    #[test]
    fn test_file_types_by_extension() {
        let paths = vec![
            "src/a.rs".to_string(),
            "src/b.rs".to_string(),
            "web/app.ts".to_string(),
            "README.md".to_string(),
            "LICENSE".to_string(),
        ];

        let types = file_types(&paths);
        assert_eq!(types.len(), 3);
        assert_eq!(types[0].extension, "rs");
        assert_eq!(types[0].count, 2);
        assert_eq!(types[0].percentage, 50);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let config = ScoringConfig::default();
        let mut pr = make_pr("pr-0", ts(5, 1));
        pr.additions = 120;
        pr.deletions = 40;
        pr.changed_files = 4;
        pr.body = Some("description".to_string());
        let mut files = HashMap::new();
        files.insert(
            "pr-0".to_string(),
            vec![
                make_file("pr-0", "src/api/a.rs", 80, 20),
                make_file("pr-0", "src/api/b.rs", 40, 20),
            ],
        );

        let first = score_pull_requests(std::slice::from_ref(&pr), &files, &no_rules(), &config);
        let second = score_pull_requests(std::slice::from_ref(&pr), &files, &no_rules(), &config);

        assert_eq!(
            composite_score(first.score, 0.0, 0.0, 0.0, 0.0),
            composite_score(second.score, 0.0, 0.0, 0.0, 0.0)
        );
        assert_eq!(focus_areas(&first.file_paths), focus_areas(&second.file_paths));
        assert_eq!(file_types(&first.file_paths), file_types(&second.file_paths));
    }
}
