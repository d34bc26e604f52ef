//! Foursquare 分類樹。
//!
//! 分類檔是一片森林，載入時統一掛到人工的 `root` 節點下。
//! 節點存放在 arena 中，以 [`NodeId`] 互相連結；建好之後不再變動。

use crate::domain::model::CategoryIcon;
use crate::utils::error::{Result, SuggestError};
use serde::Deserialize;
use std::collections::HashMap;

pub const ROOT_CATEGORY_ID: &str = "root";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct CategoryNode {
    pub id: String,
    pub name: String,
    pub plural_name: String,
    pub short_name: String,
    pub icon: Option<CategoryIcon>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl CategoryNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// 分類檔中的巢狀節點
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub plural_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub icon: Option<CategoryIcon>,
    #[serde(default)]
    pub categories: Vec<CategorySource>,
}

#[derive(Debug, Clone)]
pub struct Taxonomy {
    nodes: Vec<CategoryNode>,
    index: HashMap<String, NodeId>,
}

impl Taxonomy {
    /// 由分類森林建樹；id 重複視為資料錯誤
    pub fn from_forest(forest: Vec<CategorySource>) -> Result<Self> {
        let root = CategoryNode {
            id: ROOT_CATEGORY_ID.to_string(),
            name: ROOT_CATEGORY_ID.to_string(),
            plural_name: ROOT_CATEGORY_ID.to_string(),
            short_name: ROOT_CATEGORY_ID.to_string(),
            icon: Some(CategoryIcon {
                prefix: ROOT_CATEGORY_ID.to_string(),
                suffix: ".png".to_string(),
            }),
            parent: None,
            children: Vec::new(),
        };

        let mut taxonomy = Self {
            nodes: vec![root],
            index: HashMap::new(),
        };
        taxonomy
            .index
            .insert(ROOT_CATEGORY_ID.to_string(), NodeId(0));

        for source in forest {
            taxonomy.insert(source, NodeId(0))?;
        }

        tracing::debug!(
            "🌳 Category tree built with {} categories",
            taxonomy.category_count()
        );
        Ok(taxonomy)
    }

    fn insert(&mut self, source: CategorySource, parent: NodeId) -> Result<()> {
        if self.index.contains_key(&source.id) {
            return Err(SuggestError::TaxonomyError {
                message: format!("duplicate category id '{}'", source.id),
            });
        }

        let node_id = NodeId(self.nodes.len());
        self.nodes.push(CategoryNode {
            id: source.id.clone(),
            name: source.name,
            plural_name: source.plural_name,
            short_name: source.short_name,
            icon: source.icon,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.index.insert(source.id, node_id);
        self.nodes[parent.0].children.push(node_id);

        for child in source.categories {
            self.insert(child, node_id)?;
        }
        Ok(())
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// 不含人工 root 的分類數
    pub fn category_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> &CategoryNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, category_id: &str) -> Option<&CategoryNode> {
        self.index.get(category_id).map(|id| self.node(*id))
    }

    pub fn lookup(&self, category_id: &str) -> Result<NodeId> {
        self.index
            .get(category_id)
            .copied()
            .ok_or_else(|| SuggestError::UnknownCategory {
                category_id: category_id.to_string(),
            })
    }

    /// 從節點往 root 的路徑（兩端都包含）
    pub fn path_to_root(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut current = node;
        while let Some(parent) = self.node(current).parent {
            path.push(parent);
            current = parent;
        }
        path
    }

    /// 兩節點間的邊數：各自走到最低共同祖先的步數相加
    pub fn node_distance(&self, a: NodeId, b: NodeId) -> usize {
        if a == b {
            return 0;
        }

        let path_a = self.path_to_root(a);
        let path_b = self.path_to_root(b);
        let positions_b: HashMap<NodeId, usize> = path_b
            .iter()
            .enumerate()
            .map(|(steps, node)| (*node, steps))
            .collect();

        // 沿著 a 往 root 走，第一個也在 b 路徑上的節點即為 LCA
        for (steps_a, node) in path_a.iter().enumerate() {
            if let Some(steps_b) = positions_b.get(node) {
                return steps_a + steps_b;
            }
        }

        path_a.len() + path_b.len()
    }

    pub fn distance(&self, a: &str, b: &str) -> Result<usize> {
        Ok(self.node_distance(self.lookup(a)?, self.lookup(b)?))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn leaf(id: &str) -> CategorySource {
        CategorySource {
            id: id.to_string(),
            name: id.to_string(),
            plural_name: String::new(),
            short_name: String::new(),
            icon: None,
            categories: Vec::new(),
        }
    }

    fn branch(id: &str, children: Vec<CategorySource>) -> CategorySource {
        CategorySource {
            categories: children,
            ..leaf(id)
        }
    }

    /// root -> {A, B}, A -> {A1}
    pub(crate) fn sample_taxonomy() -> Taxonomy {
        Taxonomy::from_forest(vec![branch("A", vec![leaf("A1")]), leaf("B")]).unwrap()
    }

    /// 較深的樹，用於對稱性檢查
    fn deep_taxonomy() -> Taxonomy {
        Taxonomy::from_forest(vec![
            branch(
                "food",
                vec![
                    branch("asian", vec![leaf("sushi"), leaf("ramen")]),
                    leaf("bakery"),
                ],
            ),
            branch(
                "arts",
                vec![branch("museum", vec![leaf("history_museum"), leaf("art_museum")])],
            ),
            leaf("park"),
        ])
        .unwrap()
    }

    #[test]
    fn test_distance_example() {
        let taxonomy = sample_taxonomy();
        assert_eq!(taxonomy.distance("A1", "A").unwrap(), 1);
        assert_eq!(taxonomy.distance("A1", "B").unwrap(), 3);
        assert_eq!(taxonomy.distance("A", "B").unwrap(), 2);
    }

    #[test]
    fn test_distance_is_reflexive_and_symmetric() {
        let taxonomy = deep_taxonomy();
        let ids: Vec<String> = taxonomy.nodes.iter().map(|n| n.id.clone()).collect();

        for a in &ids {
            assert_eq!(taxonomy.distance(a, a).unwrap(), 0, "distance({a}, {a})");
            for b in &ids {
                assert_eq!(
                    taxonomy.distance(a, b).unwrap(),
                    taxonomy.distance(b, a).unwrap(),
                    "distance({a}, {b})"
                );
            }
        }

        assert_eq!(taxonomy.distance("sushi", "ramen").unwrap(), 2);
        assert_eq!(taxonomy.distance("sushi", "bakery").unwrap(), 3);
        assert_eq!(taxonomy.distance("sushi", "art_museum").unwrap(), 6);
        assert_eq!(taxonomy.distance("park", "root").unwrap(), 1);
    }

    #[test]
    fn test_path_to_root_is_ordered_root_ward() {
        let taxonomy = sample_taxonomy();
        let a1 = taxonomy.lookup("A1").unwrap();
        let path: Vec<&str> = taxonomy
            .path_to_root(a1)
            .into_iter()
            .map(|id| taxonomy.node(id).id.as_str())
            .collect();
        assert_eq!(path, vec!["A1", "A", "root"]);
    }

    #[test]
    fn test_parent_child_links() {
        let taxonomy = deep_taxonomy();
        let asian = taxonomy.lookup("asian").unwrap();
        let children: Vec<&str> = taxonomy
            .node(asian)
            .children()
            .iter()
            .map(|id| taxonomy.node(*id).id.as_str())
            .collect();
        assert_eq!(children, vec!["sushi", "ramen"]);
        assert_eq!(
            taxonomy.node(asian).parent(),
            Some(taxonomy.lookup("food").unwrap())
        );
        assert_eq!(taxonomy.node(taxonomy.root()).parent(), None);
        assert_eq!(taxonomy.category_count(), 10);
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let taxonomy = sample_taxonomy();
        let err = taxonomy.distance("A1", "missing").unwrap_err();
        assert!(matches!(err, SuggestError::UnknownCategory { category_id } if category_id == "missing"));
    }

    #[test]
    fn test_duplicate_category_id_is_rejected() {
        let result = Taxonomy::from_forest(vec![branch("A", vec![leaf("X")]), leaf("X")]);
        assert!(matches!(result, Err(SuggestError::TaxonomyError { .. })));
    }

    #[test]
    fn test_deserialize_nested_source() {
        let json = r#"[
            {"id": "4d4b7104d754a06370d81259", "name": "Arts & Entertainment",
             "pluralName": "Arts & Entertainment", "shortName": "Arts & Entertainment",
             "icon": {"prefix": "https://ss3.4sqi.net/img/categories_v2/arts_entertainment/default_", "suffix": ".png"},
             "categories": [
                {"id": "4bf58dd8d48988d18f941735", "name": "Museum", "pluralName": "Museums",
                 "shortName": "Museum",
                 "icon": {"prefix": "https://ss3.4sqi.net/img/categories_v2/arts_entertainment/museum_", "suffix": ".png"}}
             ]}
        ]"#;
        let forest: Vec<CategorySource> = serde_json::from_str(json).unwrap();
        let taxonomy = Taxonomy::from_forest(forest).unwrap();

        let museum = taxonomy.get("4bf58dd8d48988d18f941735").unwrap();
        assert_eq!(museum.plural_name, "Museums");
        assert_eq!(museum.icon.as_ref().unwrap().suffix, ".png");
        assert_eq!(
            taxonomy
                .distance("4bf58dd8d48988d18f941735", "4d4b7104d754a06370d81259")
                .unwrap(),
            1
        );
    }
}
