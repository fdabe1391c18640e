//! The report pipeline: template → substitution → compilation.
//!
//! [`ReportService`] is the one object the HTTP layer and the `render`
//! command share. It holds only immutable configuration, so a single
//! instance behind an `Arc` serves any number of concurrent requests.

use crate::compiler::Compiler;
use crate::config::ServiceConfig;
use crate::core::ReportError;
use crate::job::{CompiledArtifact, JobState, WorkArea};
use crate::templating::{FieldMap, Substitutor, TemplateStore};

/// Generates one report per call.
#[derive(Debug, Clone)]
pub struct ReportService {
    store: TemplateStore,
    substitutor: Substitutor,
    compiler: Compiler,
    work_area: WorkArea,
}

impl ReportService {
    /// Assembles a service from its parts.
    #[must_use]
    pub const fn new(
        store: TemplateStore,
        substitutor: Substitutor,
        compiler: Compiler,
        work_area: WorkArea,
    ) -> Self {
        Self {
            store,
            substitutor,
            compiler,
            work_area,
        }
    }

    /// Builds a service from resolved configuration.
    #[must_use]
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            TemplateStore::new(&config.template_path),
            Substitutor::new(config.field_mapping()),
            Compiler::new(&config.compiler, config.compile_timeout),
            WorkArea::new(&config.work_dir),
        )
    }

    #[must_use]
    pub const fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    #[must_use]
    pub const fn work_area(&self) -> &WorkArea {
        &self.work_area
    }

    #[must_use]
    pub const fn template_store(&self) -> &TemplateStore {
        &self.store
    }

    /// Runs the whole pipeline for `fields`.
    ///
    /// The template is re-read on every call. A failure at any step is
    /// terminal; the job's files are gone by the time the error is returned.
    pub async fn generate(&self, fields: &FieldMap) -> Result<CompiledArtifact, ReportError> {
        let mut job = self.work_area.create_job();
        tracing::info!(target: "job", "({}) Generating report from {} fields", job.id(), fields.len());

        let template = match self.store.load().await {
            Ok(template) => template,
            Err(error) => {
                job.fail(&error);
                return Err(error);
            }
        };
        job.advance(JobState::TemplateLoaded);

        let document = self.substitutor.materialize(&template, fields);
        job.advance(JobState::Substituted);

        self.compiler.compile(job, &document).await
    }
}
