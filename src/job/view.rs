use tera::Context;

use super::{JobDefinition, JobId, Role};

/// A single page to render, with exactly the data its template may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Landing page carrying a freshly allocated id.
    Landing(JobId),
    /// Job creation form for an id that already exists.
    Creation(JobId),
    Coordinator(JobDefinition),
    Worker(JobId),
}

impl View {
    pub fn role(&self) -> Role {
        match self {
            View::Landing(_) | View::Creation(_) => Role::Creation,
            View::Coordinator(_) => Role::Coordinator,
            View::Worker(_) => Role::Worker,
        }
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            View::Landing(_) => "index.html",
            View::Creation(_) => "create.html",
            View::Coordinator(_) => "server.html",
            View::Worker(_) => "client.html",
        }
    }

    pub fn job_id(&self) -> &JobId {
        match self {
            View::Landing(id) | View::Creation(id) | View::Worker(id) => id,
            View::Coordinator(def) => &def.id,
        }
    }

    /// Template context. Only the coordinator sees the job definition.
    pub fn context(&self) -> Context {
        let mut context = Context::new();
        context.insert("id", self.job_id());
        context.insert("role", &self.role());

        if let View::Coordinator(def) = self {
            context.insert("mapper_code", &def.mapper_code);
            context.insert("reducer_code", &def.reducer_code);
            context.insert("data_url", &def.data_url);
        }

        context
    }
}
