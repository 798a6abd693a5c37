use arbor_fetch::{ChildrenFetcher, SimulatedFetcher, Timeout, sample_forest};
use arbor_tree::{Forest, NodeId, TreeNode};
use serde::Deserialize;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use thiserror::Error;
use tokio::fs::read_to_string;

const CONFIG_FILE: &str = "arbor.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found at: {0}")]
    NotFound(PathBuf),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("node id {id} appears more than once in {path}")]
    DuplicateId { path: PathBuf, id: NodeId },
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigToml {
    #[serde(default)]
    pub fetch: FetchConfigToml,
    pub nodes: Option<Vec<NodeToml>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct FetchConfigToml {
    pub delay_ms: u64,
    pub children: usize,
    pub fail: Vec<String>,
    pub timeout_ms: Option<u64>,
}

impl Default for FetchConfigToml {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            children: 3,
            fail: Vec::new(),
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct NodeToml {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub expanded: bool,
    pub children_loaded: Option<bool>,
    pub children: Option<Vec<NodeToml>>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` when running on built-in defaults.
    pub path: Option<PathBuf>,
    pub fetch: FetchConfig,
    pub forest: Forest,
}

/// How the simulated backend answers child fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub delay: Duration,
    pub children: usize,
    pub fail: Vec<NodeId>,
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            fetch: FetchConfig::from(FetchConfigToml::default()),
            forest: sample_forest(),
        }
    }
}

impl Config {
    /// Load `arbor.toml` from `path`, or from inside `path` when it is a
    /// directory.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_owned()
        };
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        let string = read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
        Self::parse(&string, &path)
    }

    pub fn parse(string: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ConfigToml = toml::from_str(string).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        let ConfigToml { fetch, nodes } = config;

        let forest = match nodes {
            Some(nodes) => {
                let mut seen = HashSet::new();
                nodes
                    .into_iter()
                    .map(|node| node.into_tree_node(&mut seen).map(Arc::new))
                    .collect::<Result<Forest, NodeId>>()
                    .map_err(|id| ConfigError::DuplicateId {
                        path: path.to_owned(),
                        id,
                    })?
            }
            None => sample_forest(),
        };

        Ok(Config {
            path: Some(path.to_owned()),
            fetch: FetchConfig::from(fetch),
            forest,
        })
    }
}

impl NodeToml {
    fn into_tree_node(self, seen: &mut HashSet<NodeId>) -> Result<TreeNode, NodeId> {
        let NodeToml {
            id,
            name,
            expanded,
            children_loaded,
            children,
        } = self;
        let id = id.map(NodeId::new).unwrap_or_else(NodeId::generate);
        if !seen.insert(id.clone()) {
            return Err(id);
        }

        let mut node = TreeNode::new(id, name)
            .expanded(expanded)
            .loaded(children_loaded.unwrap_or(children.is_some()));
        if let Some(children) = children {
            let children = children
                .into_iter()
                .map(|child| child.into_tree_node(seen))
                .collect::<Result<Vec<_>, _>>()?;
            node = node.with_children(children);
        }
        Ok(node)
    }
}

impl From<FetchConfigToml> for FetchConfig {
    fn from(fetch: FetchConfigToml) -> Self {
        let FetchConfigToml {
            delay_ms,
            children,
            fail,
            timeout_ms,
        } = fetch;
        Self {
            delay: Duration::from_millis(delay_ms),
            children,
            fail: fail.into_iter().map(NodeId::new).collect(),
            timeout: timeout_ms.map(Duration::from_millis),
        }
    }
}

impl FetchConfig {
    pub fn fetcher(&self) -> Arc<dyn ChildrenFetcher> {
        let simulated = self
            .fail
            .iter()
            .cloned()
            .fold(
                SimulatedFetcher::new(self.delay).children(self.children),
                |fetcher, id| fetcher.fail_on(id),
            );
        match self.timeout {
            Some(duration) => Arc::new(Timeout::new(simulated, duration)),
            None => Arc::new(simulated),
        }
    }
}
