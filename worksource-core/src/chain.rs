//! Multi-hop attribution paths.

use core::fmt;

use serde::{Deserialize, Serialize};
use worksource_types::WorkSourceError;

use crate::parcel::{ParcelReader, ParcelWriter, Parcelable};

/// One hop of an [`AttributionChain`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainNode {
    /// Identifier of the party at this hop.
    pub id: i32,
    /// Optional tag describing the hop. `None` and `Some("")` are distinct.
    pub tag: Option<String>,
}

/// Ordered sequence of `(id, tag)` nodes: "node 0 did this on behalf of
/// node 1 on behalf of node 2 ...".
///
/// Nodes are only ever appended. `Clone` produces an independent copy, and
/// equality and hashing follow the node sequence in order.
///
/// ```
/// use worksource_core::AttributionChain;
///
/// let mut chain = AttributionChain::new();
/// chain.add_node(1, Some("foo")).add_node(2, None);
/// assert_eq!(chain.ids(), vec![1, 2]);
/// assert_eq!(chain.tags(), vec![Some("foo"), None]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributionChain {
    nodes: Vec<ChainNode>,
}

impl AttributionChain {
    /// Create an empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a node and return the chain for further calls.
    pub fn add_node(&mut self, id: i32, tag: Option<&str>) -> &mut Self {
        self.nodes.push(ChainNode {
            id,
            tag: tag.map(str::to_string),
        });
        self
    }

    /// Number of nodes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<i32> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Node tags in insertion order, aligned with [`ids`](Self::ids).
    #[must_use]
    pub fn tags(&self) -> Vec<Option<&str>> {
        self.nodes.iter().map(|n| n.tag.as_deref()).collect()
    }

    /// All nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[ChainNode] {
        &self.nodes
    }

    /// Id of the originating node, i.e. the party the work is billed to.
    #[must_use]
    pub fn attribution_id(&self) -> Option<i32> {
        self.nodes.first().map(|n| n.id)
    }

    /// Tag of the originating node.
    #[must_use]
    pub fn attribution_tag(&self) -> Option<&str> {
        self.nodes.first().and_then(|n| n.tag.as_deref())
    }
}

impl fmt::Display for AttributionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Chain{")?;
        for (i, n) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match &n.tag {
                Some(tag) => write!(f, "({}, {tag})", n.id)?,
                None => write!(f, "({}, -)", n.id)?,
            }
        }
        f.write_str("}")
    }
}

impl Parcelable for AttributionChain {
    fn write_to_parcel(&self, out: &mut ParcelWriter) -> Result<(), WorkSourceError> {
        out.write_len("chain.nodes", self.nodes.len())?;
        for n in &self.nodes {
            out.write_i32(n.id);
            out.write_opt_str("chain.tag", n.tag.as_deref())?;
        }
        Ok(())
    }

    fn read_from_parcel(input: &mut ParcelReader<'_>) -> Result<Self, WorkSourceError> {
        let count = input.read_len("chain.nodes", input.limits().max_chain_nodes)?;
        // Each node takes at least an id and a string prefix.
        let mut nodes = Vec::with_capacity(count.min(input.remaining() / 8));
        for _ in 0..count {
            let id = input.read_i32("chain.id")?;
            let tag = input.read_opt_str("chain.tag")?;
            nodes.push(ChainNode { id, tag });
        }
        Ok(Self { nodes })
    }
}
