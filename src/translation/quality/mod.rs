/*!
 * Translation confidence scoring.
 *
 * A translated markdown document is compared structurally with its source:
 * fenced code blocks, headings, links and line layout should all survive
 * translation unchanged. The weighted agreement is the confidence stored in
 * the artifact's metadata and used by fix mode.
 */

pub mod metrics;

pub use metrics::{DimensionScore, QualityScore, StructureCounts, score_translation};
