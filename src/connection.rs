//! Relay connection output types and assembly

use async_graphql::{Object, OutputType, SimpleObject};

use crate::cursor::CursorCodec;
use crate::order::Node;
use crate::Result;

/// Page information
///
/// Cursors are empty strings on the canonical empty page, per the connection
/// contract.
#[derive(SimpleObject, Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: String,
    pub end_cursor: String,
}

impl PageInfo {
    pub fn empty() -> Self {
        Self {
            has_next_page: false,
            has_previous_page: false,
            start_cursor: String::new(),
            end_cursor: String::new(),
        }
    }
}

/// Edge in a connection
#[derive(Debug, Clone)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

#[Object]
impl<T: OutputType> Edge<T> {
    async fn cursor(&self) -> &str {
        &self.cursor
    }

    async fn node(&self) -> &T {
        &self.node
    }
}

/// Connection (paginated result)
#[derive(Debug, Clone)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    pub total_count: i64,
}

#[Object]
impl<T: OutputType> Connection<T> {
    async fn edges(&self) -> &[Edge<T>] {
        &self.edges
    }

    async fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    async fn total_count(&self) -> i64 {
        self.total_count
    }
}

impl<T: Node> Connection<T> {
    /// Assemble a connection from an already direction-corrected window.
    ///
    /// Edge cursors and `startCursor`/`endCursor` are minted here from each
    /// item's key; the flags come from the existence probes.
    pub fn assemble(
        collection: &str,
        nodes: Vec<T>,
        has_next_page: bool,
        has_previous_page: bool,
        total_count: i64,
    ) -> Result<Self> {
        let mut edges = Vec::with_capacity(nodes.len());
        for node in nodes {
            let cursor = CursorCodec::encode(collection, &node.key())?;
            edges.push(Edge { cursor, node });
        }

        let page_info = match (edges.first(), edges.last()) {
            (Some(first), Some(last)) => PageInfo {
                has_next_page,
                has_previous_page,
                start_cursor: first.cursor.clone(),
                end_cursor: last.cursor.clone(),
            },
            _ => PageInfo::empty(),
        };

        Ok(Self {
            edges,
            page_info,
            total_count,
        })
    }

    /// The canonical empty page.
    pub fn empty(total_count: i64) -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::empty(),
            total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::ItemKey;

    #[derive(Debug, Clone)]
    struct Item {
        id: i64,
    }

    impl Node for Item {
        fn key(&self) -> ItemKey {
            ItemKey::Int(self.id)
        }
    }

    #[test]
    fn test_assemble_mints_edge_and_boundary_cursors() {
        let conn =
            Connection::assemble("items", vec![Item { id: 1 }, Item { id: 2 }], true, false, 9)
                .unwrap();

        assert_eq!(conn.edges.len(), 2);
        assert_eq!(conn.total_count, 9);
        assert!(conn.page_info.has_next_page);
        assert!(!conn.page_info.has_previous_page);
        assert_eq!(conn.page_info.start_cursor, conn.edges[0].cursor);
        assert_eq!(conn.page_info.end_cursor, conn.edges[1].cursor);

        let (collection, key) = CursorCodec::decode(&conn.edges[0].cursor).unwrap();
        assert_eq!(collection, "items");
        assert_eq!(key, ItemKey::Int(1));
    }

    #[test]
    fn test_empty_connection_shape() {
        let conn = Connection::<Item>::empty(0);
        assert!(conn.edges.is_empty());
        assert_eq!(conn.total_count, 0);
        assert_eq!(conn.page_info, PageInfo::empty());
        assert_eq!(conn.page_info.start_cursor, "");
        assert_eq!(conn.page_info.end_cursor, "");
    }
}
