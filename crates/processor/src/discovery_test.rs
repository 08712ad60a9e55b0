#[cfg(test)]
mod tests {
    use crate::discovery::*;
    use std::collections::HashMap;

    fn counts_map(entries: &[(&str, ActivityCounts)]) -> HashMap<String, ActivityCounts> {
        entries
            .iter()
            .map(|(username, counts)| (username.to_string(), *counts))
            .collect()
    }

    fn with_prs(prs: i64) -> ActivityCounts {
        ActivityCounts {
            prs,
            ..Default::default()
        }
    }

    #[test]
    fn test_sentinel_usernames_excluded_despite_activity() {
        let counts = counts_map(&[
            ("alice", with_prs(3)),
            ("unknown", with_prs(5)),
            ("[deleted]", with_prs(2)),
            ("", with_prs(1)),
        ]);

        let active = filter_active(&counts, &[]);
        assert_eq!(active, vec!["alice".to_string()]);
    }

    #[test]
    fn test_bots_excluded_regardless_of_volume() {
        let counts = counts_map(&[
            ("alice", with_prs(1)),
            (
                "dependabot[bot]",
                ActivityCounts {
                    prs: 50,
                    issues: 10,
                    reviews: 5,
                    pr_comments: 100,
                    issue_comments: 30,
                },
            ),
        ]);

        let active = filter_active(&counts, &["dependabot[bot]".to_string()]);
        assert_eq!(active, vec!["alice".to_string()]);
    }

    #[test]
    fn test_comment_only_contributors_retained() {
        let counts = counts_map(&[
            (
                "commenter",
                ActivityCounts {
                    pr_comments: 1,
                    ..Default::default()
                },
            ),
            (
                "issue-commenter",
                ActivityCounts {
                    issue_comments: 2,
                    ..Default::default()
                },
            ),
        ]);

        let active = filter_active(&counts, &[]);
        assert_eq!(
            active,
            vec!["commenter".to_string(), "issue-commenter".to_string()]
        );
    }

    #[test]
    fn test_no_activity_excluded() {
        let counts = counts_map(&[("ghost", ActivityCounts::default())]);
        assert!(filter_active(&counts, &[]).is_empty());
    }

    #[test]
    fn test_reviewer_only_retained() {
        let counts = counts_map(&[(
            "reviewer",
            ActivityCounts {
                reviews: 1,
                ..Default::default()
            },
        )]);
        assert_eq!(filter_active(&counts, &[]), vec!["reviewer".to_string()]);
    }

    #[test]
    fn test_meaningful_activity_predicate() {
        assert!(with_prs(1).is_meaningful());
        assert!(ActivityCounts {
            issues: 1,
            ..Default::default()
        }
        .is_meaningful());
        assert!(ActivityCounts {
            reviews: 1,
            ..Default::default()
        }
        .is_meaningful());
        assert!(ActivityCounts {
            issue_comments: 1,
            ..Default::default()
        }
        .is_meaningful());
        assert!(!ActivityCounts::default().is_meaningful());
    }
}
