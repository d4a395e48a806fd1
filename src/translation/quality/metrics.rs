/*!
 * Structural quality metrics for markdown translations.
 *
 * Scored dimensions:
 * - Code blocks: fence lines match the source
 * - Headings: heading count matches
 * - Links: link and image references match
 * - Lines: line count and blank-line layout match
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::project::metadata;

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!?\[[^\]]*\]\([^)]*\)").expect("link pattern is valid"));

/// Quality score for a single dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionScore {
    /// Score value (0.0 - 1.0)
    pub score: f64,
    /// Weight for overall calculation
    pub weight: f64,
    /// Number of issues found
    pub issues: usize,
}

impl DimensionScore {
    pub fn new(score: f64, weight: f64, issues: usize) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            weight,
            issues,
        }
    }

    pub fn perfect(weight: f64) -> Self {
        Self::new(1.0, weight, 0)
    }

    /// Weighted contribution to the overall score.
    pub fn weighted(&self) -> f64 {
        self.score * self.weight
    }

    /// Score how closely `actual` matches `expected`
    fn agreement(expected: usize, actual: usize, weight: f64) -> Self {
        if expected == actual {
            return Self::perfect(weight);
        }
        let larger = expected.max(actual) as f64;
        let diff = expected.abs_diff(actual);
        Self::new(1.0 - diff as f64 / larger, weight, diff)
    }
}

/// Overall quality score with breakdown by dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityScore {
    /// Overall weighted score (0.0 - 1.0)
    pub overall: f64,
    pub code_blocks: DimensionScore,
    pub headings: DimensionScore,
    pub links: DimensionScore,
    pub lines: DimensionScore,
}

impl QualityScore {
    pub fn from_dimensions(
        code_blocks: DimensionScore,
        headings: DimensionScore,
        links: DimensionScore,
        lines: DimensionScore,
    ) -> Self {
        let dimensions = [code_blocks, headings, links, lines];
        let total_weight: f64 = dimensions.iter().map(|d| d.weight).sum();
        let overall = if total_weight > 0.0 {
            dimensions.iter().map(DimensionScore::weighted).sum::<f64>() / total_weight
        } else {
            1.0
        };

        Self {
            overall,
            code_blocks,
            headings,
            links,
            lines,
        }
    }

    /// Check if score meets minimum threshold.
    pub fn meets_threshold(&self, threshold: f64) -> bool {
        self.overall >= threshold
    }

    /// Get the lowest scoring dimension.
    pub fn weakest_dimension(&self) -> &'static str {
        [
            (self.code_blocks.score, "code_blocks"),
            (self.headings.score, "headings"),
            (self.links.score, "links"),
            (self.lines.score, "lines"),
        ]
        .iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, name)| *name)
        .unwrap_or("unknown")
    }

    /// Get a grade letter (A-F) based on overall score.
    pub fn grade(&self) -> char {
        match self.overall {
            s if s >= 0.9 => 'A',
            s if s >= 0.8 => 'B',
            s if s >= 0.7 => 'C',
            s if s >= 0.6 => 'D',
            _ => 'F',
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Confidence: {:.1}% (Grade: {}), weakest: {}",
            self.overall * 100.0,
            self.grade(),
            self.weakest_dimension()
        )
    }
}

/// Structural features counted in one markdown document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureCounts {
    pub fences: usize,
    pub headings: usize,
    pub links: usize,
    pub lines: usize,
    pub blank_lines: usize,
}

impl StructureCounts {
    /// Count the features of a document; headings and links inside code are ignored
    pub fn of(text: &str) -> Self {
        let mut counts = Self::default();
        let mut in_fence = false;

        for line in text.trim_end().lines() {
            counts.lines += 1;
            let trimmed = line.trim_start();
            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                counts.fences += 1;
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }
            if line.trim().is_empty() {
                counts.blank_lines += 1;
            } else if trimmed.starts_with('#') {
                counts.headings += 1;
            }
            counts.links += LINK_RE.find_iter(line).count();
        }
        counts
    }
}

/// Score a translation against its source
///
/// Any metadata block in the translation is ignored.
pub fn score_translation(source: &str, translated: &str) -> QualityScore {
    let expected = StructureCounts::of(source);
    let actual = StructureCounts::of(&metadata::strip(translated));

    let lines = {
        let count = DimensionScore::agreement(expected.lines, actual.lines, 0.25);
        let blanks = DimensionScore::agreement(expected.blank_lines, actual.blank_lines, 0.25);
        DimensionScore::new((count.score + blanks.score) / 2.0, 0.25, count.issues + blanks.issues)
    };

    QualityScore::from_dimensions(
        DimensionScore::agreement(expected.fences, actual.fences, 0.3),
        DimensionScore::agreement(expected.headings, actual.headings, 0.25),
        DimensionScore::agreement(expected.links, actual.links, 0.2),
        lines,
    )
}
