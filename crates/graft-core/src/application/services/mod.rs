//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "make sure a template is cached" or
//! "provision a project".

pub mod identity_rewriter;
pub mod scaffold_service;
pub mod template_service;
pub mod tree_copier;

pub use identity_rewriter::{FileWarning, IdentityRewriter, RewriteReport};
pub use scaffold_service::{ProvisionReport, ScaffoldService};
pub use template_service::{FetchPlan, TemplateInfo, TemplateService, UpdateReport};
pub use tree_copier::{CopySummary, TreeCopier};
