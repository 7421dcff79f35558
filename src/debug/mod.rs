//! Debug walker: full recursive decomposition of containers into a tree.
//!
//! Read-only.  Nothing here writes frames back; the tree exists to be
//! printed (text via `Display`, JSON via `serde`).
//!
//! ```text
//! Group {
//!   Field {
//!     data[1] aa
//!   }
//!   Field {
//!     data[1] bb
//!   }
//! }
//! ```

use std::fmt;

use serde::{Serialize, Serializer};

use crate::entity::{Container, SioFile};
use crate::header::SioType;
use crate::tag::{Kind, Tag};

/// Default recursion bound for [`walk`].
pub const DEFAULT_MAX_DEPTH: usize = 64;
/// Raw bytes shown per dump line.
const DUMP_WIDTH: usize = 32;

// ── WalkOptions ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Frames nested deeper than this keep their payload as raw bytes.
    pub max_depth:        usize,
    /// Re-parse Field payloads as nested frames.  When off, Fields are
    /// always leaves.
    pub decompose_fields: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth:        DEFAULT_MAX_DEPTH,
            decompose_fields: true,
        }
    }
}

// ── Node ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum Node {
    Frame {
        tag:      Tag,
        children: Vec<Node>,
    },
    Raw {
        #[serde(serialize_with = "as_hex")]
        bytes: Vec<u8>,
    },
}

impl Node {
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Node::Frame { tag, .. } => Some(*tag),
            Node::Raw { .. } => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Frame { children, .. } => children,
            Node::Raw { .. } => &[],
        }
    }

    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            Node::Raw { bytes } => Some(bytes),
            Node::Frame { .. } => None,
        }
    }

    /// Number of frame nodes in this subtree, this one included.
    pub fn frame_count(&self) -> usize {
        match self {
            Node::Frame { children, .. } => 1 + children.iter().map(Node::frame_count).sum::<usize>(),
            Node::Raw { .. } => 0,
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = depth * 2;
        match self {
            Node::Frame { tag, children } => {
                writeln!(f, "{:pad$}{} {{", "", tag.name())?;
                for c in children {
                    c.fmt_indented(f, depth + 1)?;
                }
                writeln!(f, "{:pad$}}}", "")
            }
            Node::Raw { bytes } if bytes.is_empty() => {
                writeln!(f, "{:pad$}data[0]", "")
            }
            Node::Raw { bytes } => {
                let mut lines = bytes.chunks(DUMP_WIDTH);
                let first = lines.next().map(hex::encode).unwrap_or_default();
                writeln!(f, "{:pad$}data[{}] {}", "", bytes.len(), first)?;
                let cont = pad + format!("data[{}] ", bytes.len()).len();
                for line in lines {
                    writeln!(f, "{:cont$}{}", "", hex::encode(line))?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

fn as_hex<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes.as_ref()))
}

// ── FileTree ─────────────────────────────────────────────────────────────────

/// A walked [`SioFile`]: its type and the tree of its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileTree {
    #[serde(rename = "type")]
    pub ty:   Option<SioType>,
    pub root: Node,
}

impl fmt::Display for FileTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Some(ty) => writeln!(f, "sio type {}", ty)?,
            None => writeln!(f, "sio type (unbound)")?,
        }
        fmt::Display::fmt(&self.root, f)
    }
}

// ── Walk ─────────────────────────────────────────────────────────────────────

/// Decompose `container` recursively.  A container with no kind is shown
/// as a raw leaf.
pub fn walk(container: &Container, opts: &WalkOptions) -> Node {
    walk_at(container, opts, 0)
}

pub fn walk_file(file: &SioFile, opts: &WalkOptions) -> FileTree {
    FileTree {
        ty:   file.sio_type(),
        root: walk(file.body(), opts),
    }
}

/// Walk a byte stream of concatenated top-level frames.  Unparsable tail
/// bytes appear as a final raw node.
pub fn walk_bytes(bytes: &[u8], opts: &WalkOptions) -> Vec<Node> {
    let d = crate::entity::decompose(bytes);
    let mut out: Vec<Node> = d.children.iter().map(|c| walk_at(c, opts, 0)).collect();
    if let Some(rest) = d.remainder {
        out.push(Node::Raw { bytes: rest });
    }
    out
}

fn walk_at(container: &Container, opts: &WalkOptions, depth: usize) -> Node {
    let Some(kind) = container.kind() else {
        return Node::Raw { bytes: container.data().to_vec() };
    };
    let leaf = depth >= opts.max_depth || (kind == Kind::Field && !opts.decompose_fields);
    let mut children = Vec::new();
    if leaf {
        if !container.data().is_empty() {
            children.push(Node::Raw { bytes: container.data().to_vec() });
        }
    } else {
        let d = container.decompose();
        children.extend(d.children.iter().map(|c| walk_at(c, opts, depth + 1)));
        if let Some(rest) = d.remainder {
            children.push(Node::Raw { bytes: rest });
        }
    }
    Node::Frame { tag: kind.tag(), children }
}
