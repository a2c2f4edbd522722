use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;
use thread_arcs::{DrawingSurface, ThreadArcs, ThreadArcsOptions};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadNode {
    pub id: String,
    pub author: Option<String>,
    pub text: String,
    /// Position in the input file; sorting never changes it.
    pub ordinal: usize,
}

impl ThreadNode {
    pub fn summary(&self) -> String {
        let mut summary = match &self.author {
            Some(author) => format!("{}  ·  {author}", self.id),
            None => self.id.clone(),
        };
        if !self.text.is_empty() {
            summary.push('\n');
            summary.push_str(&self.text);
        }
        summary
    }

    pub fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.id,
            self.author.as_deref().unwrap_or_default(),
            self.text
        )
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum RawNode {
    Label(String),
    Record {
        id: Value,
        #[serde(default)]
        author: Option<String>,
        #[serde(default)]
        text: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Links {
    Signed(Vec<Vec<i64>>),
    Parents(Vec<Vec<usize>>),
}

#[derive(Clone, Debug)]
pub struct Thread {
    pub nodes: Vec<ThreadNode>,
    pub links: Links,
    pub options: ThreadArcsOptions,
}

#[derive(Debug, Deserialize)]
struct RawThread {
    nodes: Vec<RawNode>,
    #[serde(default)]
    links: Option<Vec<Vec<i64>>>,
    #[serde(default)]
    parents: Option<Vec<Vec<usize>>>,
    #[serde(default)]
    options: ThreadArcsOptions,
}

pub fn load_thread(path: &Path) -> Result<Thread> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read thread file {}", path.display()))?;
    parse_thread(&raw).with_context(|| format!("failed to parse thread file {}", path.display()))
}

pub fn load_options(path: &Path) -> Result<ThreadArcsOptions> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    serde_json::from_str(&raw).context("invalid options JSON")
}

/// Loads a thread and layers its options: embedded, then `config`, then
/// `overrides`. The merged options are validated before returning.
pub fn load_with_overrides(
    path: &Path,
    config: Option<&Path>,
    overrides: &ThreadArcsOptions,
) -> Result<(Thread, ThreadArcsOptions)> {
    let thread = load_thread(path)?;
    let mut options = thread.options.clone();
    if let Some(config) = config {
        options = options.merged_with(&load_options(config)?);
    }
    let options = options.merged_with(overrides);
    options.resolve().context("invalid layout options")?;
    Ok((thread, options))
}

pub fn parse_thread(raw: &str) -> Result<Thread> {
    let parsed: RawThread = serde_json::from_str(raw).context("invalid thread JSON")?;

    let nodes = parsed
        .nodes
        .into_iter()
        .enumerate()
        .map(|(ordinal, node)| match node {
            RawNode::Label(label) => ThreadNode {
                id: label,
                author: None,
                text: String::new(),
                ordinal,
            },
            RawNode::Record { id, author, text } => ThreadNode {
                id: match id {
                    Value::String(id) => id,
                    other => other.to_string(),
                },
                author,
                text,
                ordinal,
            },
        })
        .collect::<Vec<_>>();

    let links = match (parsed.links, parsed.parents) {
        (Some(links), None) => Links::Signed(links),
        (None, Some(parents)) => Links::Parents(parents),
        (Some(_), Some(_)) => {
            return Err(anyhow!("thread has both `links` and `parents`, expected one"));
        }
        (None, None) if nodes.is_empty() => Links::Signed(Vec::new()),
        (None, None) => return Err(anyhow!("thread has neither `links` nor `parents`")),
    };

    Ok(Thread {
        nodes,
        links,
        options: parsed.options,
    })
}

pub fn build_diagram<S: DrawingSurface>(
    surface: S,
    thread: Thread,
    options: &ThreadArcsOptions,
) -> Result<ThreadArcs<S, ThreadNode>> {
    let node_count = thread.nodes.len();
    let diagram = match &thread.links {
        Links::Signed(links) => ThreadArcs::from_signed(surface, thread.nodes, links, options),
        Links::Parents(parents) => ThreadArcs::from_parents(surface, thread.nodes, parents, options),
    }
    .with_context(|| format!("failed to lay out thread with {node_count} nodes"))?;

    Ok(diagram.with_tooltip(ThreadNode::summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_records_and_labels() {
        let thread = parse_thread(
            r#"{
                "nodes": ["root", { "id": 7, "author": "ana", "text": "re: root" }],
                "links": [[1], []],
                "options": { "space": 30 }
            }"#,
        )
        .unwrap();

        assert_eq!(thread.nodes[0].id, "root");
        assert_eq!(thread.nodes[1].id, "7");
        assert_eq!(thread.nodes[1].ordinal, 1);
        assert_eq!(thread.nodes[1].summary(), "7  ·  ana\nre: root");
        assert_eq!(thread.links, Links::Signed(vec![vec![1], vec![]]));
        assert_eq!(thread.options.space, Some(30.0));
    }

    #[test]
    fn accepts_parent_lists() {
        let thread = parse_thread(r#"{ "nodes": ["a", "b"], "parents": [[], [0]] }"#).unwrap();
        assert_eq!(thread.links, Links::Parents(vec![vec![], vec![0]]));
    }

    #[test]
    fn rejects_ambiguous_links() {
        let error = parse_thread(r#"{ "nodes": ["a"], "links": [[]], "parents": [[]] }"#)
            .unwrap_err();
        assert!(error.to_string().contains("both"));
    }
}
