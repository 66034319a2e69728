mod format;
mod gitlab;
mod scope;
mod section;
mod summary;

pub use format::{format_exception, format_scope, format_value};
pub use gitlab::GitlabReporter;
pub use scope::StepScopeTracker;
pub use section::{SectionIdSource, UuidSectionIds, epoch_seconds, section_end, section_start};
pub use summary::RunSummary;
