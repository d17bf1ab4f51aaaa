//! Document tree handling.
//!
//! Raw HTML parsing is delegated to html5ever; the engine only works with the
//! resulting `markup5ever_rcdom` tree. Editor exports are rarely well-formed
//! documents, so input is fed through the document parser, which synthesizes
//! the `html`/`body` skeleton around whatever fragment it is given. The
//! `<body>` element is the root every transformation pass walks.

pub mod node_util;
pub mod walker;

use std::fmt;
use std::io::Read;

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, RcDom, SerializableHandle};

use crate::error::{EngineError, Result};

/// An in-memory document owned by the transformation pipeline for the
/// duration of a conversion run.
pub struct Document {
    dom: RcDom,
}

// `RcDom` exposes no Debug view; an opaque marker keeps `Result<Document>`
// usable with the assertion macros.
impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Document")
    }
}

impl Document {
    /// Parse an HTML fragment from a string.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .one(StrTendril::from(html));
        Self { dom }
    }

    /// Parse an HTML fragment from a readable byte stream.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(reader)?;
        Ok(Self { dom })
    }

    /// The `<body>` element acting as the walk root for every pass.
    pub fn body(&self) -> Result<Handle> {
        node_util::find_child(&self.dom.document, "html")
            .and_then(|html| node_util::find_child(&html, "body"))
            .ok_or_else(|| {
                EngineError::InvariantViolation("parsed document has no <body>".to_string())
            })
    }

    /// Render the body's children back to HTML text for the downstream
    /// markup generator.
    pub fn serialize(&self) -> Result<String> {
        let body = self.body()?;
        let mut buf = Vec::new();
        let opts = SerializeOpts {
            traversal_scope: TraversalScope::ChildrenOnly(None),
            ..Default::default()
        };
        serialize(&mut buf, &SerializableHandle::from(body), opts)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

pub use walker::{Outcome, TreeVisitor, TreeWalker};
