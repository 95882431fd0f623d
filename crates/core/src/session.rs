//! One resolution session over a repository's status report.

use std::path::Path;

use tracing::info;

use crate::config::ResolveConfig;
use crate::editor::Editor;
use crate::errors::CoreError;
use crate::git::{self, GitCli};
use crate::prompt::Prompter;
use crate::resolver::{Resolver, SessionReport};
use crate::status::{PathRewriter, StatusReader};

/// A repository opened for conflict resolution from a working directory.
pub struct Session {
    git: GitCli,
    paths: PathRewriter,
    config: ResolveConfig,
}

impl Session {
    /// Discover the repository containing `cwd` and load the configuration.
    pub fn open(cwd: &Path, all_files: bool, verbose: bool) -> Result<Self, CoreError> {
        let (repo, root) = git::discover(cwd)?;
        let config = ResolveConfig::load(&repo, all_files, verbose)?;
        let git = GitCli::new(cwd);
        let paths = git.path_rewriter(&root)?;
        info!(root = %root.display(), all_files = config.all_files, "session opened");
        Ok(Self { git, paths, config })
    }

    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    /// Read the status report and resolve every entry in it.
    pub fn run(
        &self,
        prompter: &mut dyn Prompter,
        editor: &mut dyn Editor,
    ) -> Result<SessionReport, CoreError> {
        let report = self.git.status_report()?;
        let entries = StatusReader::from_report(&report, self.paths.clone());
        let mut index = self.git.clone();
        Resolver::new(&self.config, prompter, editor, &mut index)
            .with_base_dir(self.git.cwd())
            .run(entries)
    }
}
