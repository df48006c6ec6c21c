//! Report assertion helpers - fluent API for verifying generated reports
#![allow(dead_code)] // Test utilities may not all be used in every test

use rinkstats::report::DivisionReport;

// ============================================================================
// Highlight Categories
// ============================================================================

/// Highlight rules in their fixed priority order, keyed by text prefix
const CATEGORIES: [(&str, &str); 5] = [
    ("high-scoring", "Goal fest"),
    ("hat-trick", "Hat trick"),
    ("one-goal-game", "Nail-biter"),
    ("penalty-heavy", "Physical one"),
    ("shutout", "Shutout"),
];

pub fn category_of(highlight: &str) -> Option<(usize, &'static str)> {
    CATEGORIES
        .iter()
        .enumerate()
        .find(|(_, (_, prefix))| highlight.starts_with(prefix))
        .map(|(rank, (name, _))| (rank, *name))
}

// ============================================================================
// Report Assertions
// ============================================================================

pub struct ReportAssertion<'a> {
    report: &'a DivisionReport,
}

impl<'a> ReportAssertion<'a> {
    pub fn for_report(report: &'a DivisionReport) -> Self {
        Self { report }
    }

    pub fn has_highlight_count(self, expected: usize) -> Self {
        assert_eq!(
            self.report.highlights.len(),
            expected,
            "unexpected highlights: {:?}",
            self.report.highlights
        );
        self
    }

    /// Every highlight comes from a known rule and rules appear in priority order
    pub fn highlights_in_priority_order(self) -> Self {
        let ranks: Vec<usize> = self
            .report
            .highlights
            .iter()
            .map(|h| {
                category_of(h)
                    .unwrap_or_else(|| panic!("highlight from no known rule: {}", h))
                    .0
            })
            .collect();
        assert!(
            ranks.windows(2).all(|pair| pair[0] <= pair[1]),
            "highlights out of priority order: {:?}",
            self.report.highlights
        );
        self
    }

    pub fn at_most_per_rule(self, cap: usize) -> Self {
        for (name, _) in CATEGORIES {
            let count = self
                .report
                .highlights
                .iter()
                .filter(|h| category_of(h).map(|(_, n)| n) == Some(name))
                .count();
            assert!(count <= cap, "rule {} produced {} highlights", name, count);
        }
        self
    }

    pub fn has_categories(self, expected: &[&str]) -> Self {
        let mut seen: Vec<&str> = self
            .report
            .highlights
            .iter()
            .filter_map(|h| category_of(h).map(|(_, name)| name))
            .collect();
        seen.dedup();
        assert_eq!(seen, expected);
        self
    }

    pub fn ranks_players(self, expected: &[&str]) -> Self {
        let names: Vec<&str> = self
            .report
            .players
            .iter()
            .map(|p| p.player.as_str())
            .collect();
        assert_eq!(names, expected);
        self
    }
}
