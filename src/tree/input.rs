use serde::Deserialize;

/// One node of the input hierarchy, as delivered by the data loader.
///
/// `size` is only meaningful on nodes without children; nodes with
/// children derive their value from their descendants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawNode {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<RawSize>,
    #[serde(default)]
    pub children: Option<Vec<RawNode>>,
}

/// Leaf weight as found in the input: a JSON number, or a number written
/// as a string (`"size": "64"`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawSize {
    Number(f64),
    Text(String),
}

impl RawSize {
    /// Numeric value, or `None` when the text does not parse as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawSize::Number(v) => Some(*v),
            RawSize::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    pub fn raw(&self) -> String {
        match self {
            RawSize::Number(v) => v.to_string(),
            RawSize::Text(s) => s.clone(),
        }
    }
}

impl RawNode {
    pub fn leaf(name: &str, size: f64) -> Self {
        Self {
            name: name.to_string(),
            color: None,
            size: Some(RawSize::Number(size)),
            children: None,
        }
    }

    pub fn branch(name: &str, children: Vec<RawNode>) -> Self {
        Self {
            name: name.to_string(),
            color: None,
            size: None,
            children: Some(children),
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    /// Children, treating a missing or empty list as a leaf.
    pub fn child_nodes(&self) -> &[RawNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}
