//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates the entire provisioning workflow:
//! 1. Refuse an existing destination
//! 2. Make sure the template is cached
//! 3. Copy the cached tree into the destination
//! 4. Move the manifest and imports to the requested identity

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::Filesystem,
        services::{
            identity_rewriter::{IdentityRewriter, RewriteReport},
            template_service::TemplateService,
            tree_copier::{CopySummary, TreeCopier},
        },
    },
    domain::{Credential, Identity, ProvisionRequest},
    error::GraftResult,
};

/// What a successful provisioning produced.
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub project_path: PathBuf,
    /// Identity the template declared before the rewrite.
    pub previous_identity: Identity,
    pub identity: Identity,
    pub copy: CopySummary,
    /// `None` when the template already declared the requested identity.
    pub rewrite: Option<RewriteReport>,
}

/// Main provisioning service.
pub struct ScaffoldService {
    templates: TemplateService,
    copier: TreeCopier,
    rewriter: IdentityRewriter,
    filesystem: Arc<dyn Filesystem>,
}

impl ScaffoldService {
    /// Create a new scaffold service over a template service and filesystem.
    ///
    /// The filesystem should be the one the template service writes to.
    pub fn new(templates: TemplateService, filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            templates,
            copier: TreeCopier::new(Arc::clone(&filesystem)),
            rewriter: IdentityRewriter::new(Arc::clone(&filesystem)),
            filesystem,
        }
    }

    /// Provision a new project.
    ///
    /// The destination is checked before anything is fetched. A failure after
    /// the copy started leaves the partially populated project in place.
    #[instrument(
        skip_all,
        fields(
            template = %request.template(),
            identity = %request.identity(),
            path = %request.project_path().display()
        )
    )]
    pub fn provision(
        &self,
        request: &ProvisionRequest,
        credential: Option<&Credential>,
    ) -> GraftResult<ProvisionReport> {
        let project_path = request.project_path();

        // 1. Destination guard
        if self.filesystem.exists(&project_path) {
            return Err(ApplicationError::ProjectExists { path: project_path }.into());
        }

        // 2. Cache
        let source = self.templates.ensure_cached(request.template(), credential)?;

        // 3. Copy
        let copy = self.copier.copy_tree(&source, &project_path)?;

        // 4. Identity
        let manifest = self.rewriter.manifest_path(&project_path);
        let previous_identity = self.rewriter.extract_declared_identity(&manifest)?;
        self.rewriter
            .set_declared_identity(&manifest, request.identity())?;

        let rewrite = if previous_identity == *request.identity() {
            info!("Template already declares the requested identity");
            None
        } else {
            let report = self.rewriter.rewrite_imports(
                &project_path,
                &previous_identity,
                request.identity(),
            )?;
            for warning in &report.warnings {
                warn!(path = %warning.path.display(), error = %warning.error, "File left unchanged");
            }
            Some(report)
        };

        info!("Project provisioned");
        Ok(ProvisionReport {
            project_path,
            previous_identity,
            identity: request.identity().clone(),
            copy,
            rewrite,
        })
    }
}
