//! The transformation pipeline.
//!
//! A conversion run is a fixed, ordered sequence of single-threaded passes
//! over one document tree: canonicalize styles, apply the structural rule
//! catalog, canonicalize tables. The rule catalog is parsed once per run
//! from the built-in text plus an optional user override file; any malformed
//! rule line fails construction before a document is touched.

use tracing::debug;

use crate::dom::walker::TreeWalker;
use crate::dom::Document;
use crate::error::Result;
use crate::rules::RuleCatalog;
use crate::transform::{StructuralPass, StylePass, TablePass};

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Skip the built-in (system) rules; only user-supplied rules apply.
    pub ignore_system_rules: bool,
}

pub struct Engine {
    catalog: RuleCatalog,
    options: EngineOptions,
}

impl Engine {
    /// Build an engine for one conversion run. `user_rules` is the content
    /// of an override rule file, consulted ahead of the built-ins.
    pub fn new(user_rules: Option<&str>, options: EngineOptions) -> Result<Self> {
        let catalog = match user_rules {
            Some(text) => RuleCatalog::with_user_rules(text)?,
            None => RuleCatalog::builtin()?,
        };
        Ok(Self { catalog, options })
    }

    /// Run every pass over the document, mutating it in place. The same
    /// document handle is then ready for the downstream markup generator.
    pub fn transform(&self, document: &Document) -> Result<()> {
        let root = document.body()?;

        debug!("pass 1/3: style normalization");
        TreeWalker::new(root.clone()).walk(&mut StylePass)?;

        debug!("pass 2/3: structural rules");
        let mut structural =
            StructuralPass::new(&self.catalog, self.options.ignore_system_rules);
        TreeWalker::new(root.clone()).walk(&mut structural)?;

        debug!("pass 3/3: table canonicalization");
        TreeWalker::new(root).walk(&mut TablePass)?;

        Ok(())
    }

    /// Convenience wrapper: parse, transform, and hand back the document.
    pub fn run(&self, html: &str) -> Result<Document> {
        let document = Document::parse(html);
        self.transform(&document)?;
        Ok(document)
    }
}
