//! wikiprep - rule-driven HTML normalization for markup conversion.
//!
//! Takes loosely-structured HTML as exported by rich-text editors and
//! rewrites it in place into a normalized document tree for a downstream
//! lightweight-markup generator. The pipeline is a fixed sequence of
//! traversal passes whose control flow is dictated by the mutation each rule
//! performs: nodes are removed, merged, reparented, or replaced mid-walk,
//! and every rule reports where the walker should resume.
//!
//! ```rust
//! use wikiprep::{Engine, EngineOptions};
//!
//! let engine = Engine::new(None, EngineOptions::default())?;
//! let doc = engine.run("<div><p>a</p><p>b</p></div>")?;
//! assert_eq!(doc.serialize()?, "<p>a</p><p>b</p>");
//! # Ok::<(), wikiprep::EngineError>(())
//! ```

pub mod dom;
pub mod engine;
pub mod error;
pub mod rules;
pub mod style;
pub mod table;
pub mod transform;

pub use dom::{Document, Outcome, TreeVisitor, TreeWalker};
pub use engine::{Engine, EngineOptions};
pub use error::{EngineError, Result};
pub use rules::{Rule, RuleCatalog, RuleSet};
pub use style::StyleDecls;
