/*!
 * Project-level translation orchestration.
 *
 * Everything that knows about the layout of a documentation project lives
 * here; the backends in `translation` only ever see one document at a time.
 *
 * - `fingerprint`: content hashes of source files
 * - `metadata`: the record embedded in every translated artifact
 * - `layout`: where sources and artifacts live
 * - `directory`: orphan cleanup and directory mirroring
 * - `staleness`: detection of outdated and low confidence artifacts
 * - `tasks`: (file, language) work items per category
 * - `executor`: parallel or sequential batch execution
 * - `progress`: progress bars
 * - `manager`: the orchestrator
 */

pub mod directory;
pub mod executor;
pub mod fingerprint;
pub mod layout;
pub mod manager;
pub mod metadata;
pub mod progress;
pub mod staleness;
pub mod tasks;

pub use directory::{DirectoryManager, SyncReport};
pub use executor::{ExecutionMode, TaskExecutor};
pub use fingerprint::{Fingerprint, fingerprint, fingerprint_file};
pub use layout::ProjectLayout;
pub use manager::{TranslationManager, TranslationSummary};
pub use metadata::TranslationMetadata;
pub use progress::ProgressReporter;
pub use staleness::{LowConfidenceTranslation, OutdatedTranslation};
pub use tasks::{Category, CategorySet, SourceFile, TaskGenerator, WorkItem};
