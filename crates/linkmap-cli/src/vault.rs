//! Markdown vault scanning.
//!
//! A vault is a directory tree of Markdown documents. Scanning it reads every
//! `.md` file, extracts `[[wikilinks]]` and relative Markdown links, resolves
//! them to other documents of the vault and records the resolved links in a
//! [`MemoryLinkIndex`]. Links that resolve to nothing are dropped.

use std::{
    borrow::Cow,
    collections::HashMap,
    fs,
    path::{Component, Path, PathBuf},
};

use log::{debug, info, trace, warn};
use regex::Regex;

use linkmap::{LinkIndex, LinkmapError, MemoryLinkIndex, document::DocumentRef};

const MARKDOWN_EXTENSION: &str = "md";

/// A scanned vault and the link index built from it.
#[derive(Debug)]
pub struct Vault {
    root: PathBuf,
    index: MemoryLinkIndex,
    by_name: HashMap<String, Vec<DocumentRef>>,
}

impl Vault {
    /// Scans the vault rooted at `root`.
    ///
    /// Documents are identified by their path relative to `root`, with `/`
    /// separators. Hidden files and directories are skipped, and symbolic
    /// links to directories are not followed. Documents that are not valid
    /// UTF-8 are decoded lossily.
    ///
    /// # Errors
    ///
    /// Returns [`LinkmapError::NotFound`] if `root` is not a directory and
    /// [`LinkmapError::Io`] if a document cannot be read.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, LinkmapError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(LinkmapError::NotFound(format!(
                "vault directory `{}`",
                root.display()
            )));
        }

        let mut documents = Vec::new();
        collect_documents(root, root, &mut documents)?;
        documents.sort();

        let mut vault = Self {
            root: root.to_path_buf(),
            index: MemoryLinkIndex::new(),
            by_name: HashMap::new(),
        };
        for document in &documents {
            vault.index.add_document(document.clone());
            vault
                .by_name
                .entry(document.display_name().to_string())
                .or_default()
                .push(document.clone());
        }

        let extractor = LinkExtractor::new()?;
        for document in &documents {
            let bytes = fs::read(root.join(document.as_str()))?;
            let content = String::from_utf8_lossy(&bytes);
            if matches!(content, Cow::Owned(_)) {
                warn!(document = document.as_str(); "Document is not valid UTF-8, decoded lossily");
            }
            let targets: Vec<DocumentRef> = extractor
                .extract(&content)
                .into_iter()
                .filter_map(|link| {
                    let target = vault.resolve_link(document, &link);
                    if target.is_none() {
                        trace!(document = document.as_str(), link:?; "Unresolved link");
                    }
                    target
                })
                .filter(|target| target != document)
                .collect();

            for target in targets {
                vault.index.add_link(document.clone(), target);
            }
        }

        info!(
            root = root.display().to_string(),
            documents = vault.index.document_count(),
            links = vault.index.link_count();
            "Vault scanned"
        );
        Ok(vault)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &MemoryLinkIndex {
        &self.index
    }

    /// Resolves a user-supplied document name.
    ///
    /// Accepts a vault-relative path with or without the `.md` extension, or
    /// a bare document name when exactly one document carries it.
    pub fn resolve(&self, name: &str) -> Option<DocumentRef> {
        let name = name.trim().replace('\\', "/");
        let name = name.trim_start_matches("./");
        self.resolve_path(name).or_else(|| self.resolve_name(name))
    }

    fn resolve_link(&self, source: &DocumentRef, link: &Link) -> Option<DocumentRef> {
        match link {
            Link::Wiki(target) => self.resolve(target),
            Link::Relative(target) => {
                let target = if let Some(absolute) = target.strip_prefix('/') {
                    normalize(Path::new(absolute))?
                } else {
                    let base = Path::new(source.as_str())
                        .parent()
                        .unwrap_or_else(|| Path::new(""));
                    normalize(&base.join(target))?
                };
                self.resolve_path(&target)
            }
        }
    }

    fn resolve_path(&self, path: &str) -> Option<DocumentRef> {
        let candidate = if has_markdown_extension(path) {
            DocumentRef::new(path)
        } else {
            DocumentRef::new(format!("{path}.{MARKDOWN_EXTENSION}"))
        };
        self.index.contains(&candidate).then_some(candidate)
    }

    fn resolve_name(&self, name: &str) -> Option<DocumentRef> {
        let name = name.rsplit('/').next().unwrap_or(name);
        let name = name
            .strip_suffix(&format!(".{MARKDOWN_EXTENSION}"))
            .unwrap_or(name);

        match self.by_name.get(name).map(Vec::as_slice) {
            Some([document]) => Some(document.clone()),
            Some(candidates) => {
                debug!(name, candidates = candidates.len(); "Ambiguous document name");
                None
            }
            None => None,
        }
    }
}

/// A link found in document text, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Link {
    /// Target of a `[[wikilink]]`, without heading or alias.
    Wiki(String),
    /// Target of a relative Markdown link, without fragment.
    Relative(String),
}

struct LinkExtractor {
    wiki: Regex,
    markdown: Regex,
}

impl LinkExtractor {
    fn new() -> Result<Self, LinkmapError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|err| LinkmapError::Config(err.to_string()))
        };
        Ok(Self {
            wiki: compile(r"\[\[([^\[\]|#]+)(?:#[^\[\]|]*)?(?:\|[^\[\]]*)?\]\]")?,
            markdown: compile(r#"\[[^\]]*\]\(<?([^()<>\s]+)>?(?:\s+"[^"]*")?\)"#)?,
        })
    }

    /// Returns the links of `content` in order of appearance.
    fn extract(&self, content: &str) -> Vec<Link> {
        let wiki = self
            .wiki
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| (m.start(), Link::Wiki(m.as_str().trim().to_string())));

        let markdown = self
            .markdown
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| relative_target(m.as_str()).map(|target| (m.start(), target)))
            .map(|(start, target)| (start, Link::Relative(target)));

        let mut links: Vec<(usize, Link)> = wiki.chain(markdown).collect();
        links.sort_by_key(|(start, _)| *start);
        links.into_iter().map(|(_, link)| link).collect()
    }
}

/// Returns the document part of a Markdown link target, or `None` for
/// external URLs and same-document anchors.
fn relative_target(target: &str) -> Option<String> {
    if target.contains("://") || target.starts_with("mailto:") {
        return None;
    }
    let path = target.split('#').next().unwrap_or_default();
    if path.is_empty() {
        return None;
    }
    Some(path.replace("%20", " "))
}

/// Collapses `.` and `..` components into a `/`-separated vault path.
///
/// Returns `None` if the path climbs out of the vault.
fn normalize(path: &Path) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(parts.join("/"))
}

fn has_markdown_extension(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext == MARKDOWN_EXTENSION)
}

fn collect_documents(
    root: &Path,
    dir: &Path,
    documents: &mut Vec<DocumentRef>,
) -> Result<(), LinkmapError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let hidden = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'));
        if hidden {
            continue;
        }

        if entry.file_type()?.is_dir() {
            collect_documents(root, &path, documents)?;
        } else if path.extension().is_some_and(|ext| ext == MARKDOWN_EXTENSION) {
            if let Some(relative) = path.strip_prefix(root).ok().and_then(normalize) {
                documents.push(DocumentRef::new(relative));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn write(root: &Path, path: &str, content: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn doc(name: &str) -> DocumentRef {
        DocumentRef::new(name)
    }

    #[test]
    fn test_extract_wikilinks_strips_heading_and_alias() {
        let extractor = LinkExtractor::new().unwrap();
        let links = extractor.extract("See [[Rust#Ownership|ownership]] and [[ Cargo ]].");
        assert_eq!(
            links,
            vec![
                Link::Wiki("Rust".to_string()),
                Link::Wiki("Cargo".to_string())
            ]
        );
    }

    #[test]
    fn test_extract_keeps_order_and_skips_external_links() {
        let extractor = LinkExtractor::new().unwrap();
        let content = "[a](../a.md) [[b]] [web](https://example.com) [top](#intro) [c](c%20d.md#x)";
        assert_eq!(
            extractor.extract(content),
            vec![
                Link::Relative("../a.md".to_string()),
                Link::Wiki("b".to_string()),
                Link::Relative("c d.md".to_string()),
            ]
        );
    }

    #[test]
    fn test_normalize_rejects_escape_from_vault() {
        assert_eq!(normalize(Path::new("a/./b/../c.md")), Some("a/c.md".to_string()));
        assert_eq!(normalize(Path::new("../c.md")), None);
    }

    #[test]
    fn test_open_builds_link_index() {
        let dir = tempdir().unwrap();
        write(dir.path(), "Index.md", "[[Rust]] and [cargo](tools/Cargo.md)");
        write(dir.path(), "notes/Rust.md", "Built with [[Cargo]]. Self: [[Rust]]");
        write(dir.path(), "tools/Cargo.md", "[back](../Index.md) [[Missing]]");
        write(dir.path(), ".obsidian/ignored.md", "[[Rust]]");
        write(dir.path(), "image.png", "not markdown");

        let vault = Vault::open(dir.path()).unwrap();
        let index = vault.index();

        assert_eq!(index.document_count(), 3);
        assert_eq!(
            index.forward_links(&doc("Index.md")),
            vec![doc("notes/Rust.md"), doc("tools/Cargo.md")]
        );
        assert_eq!(
            index.forward_links(&doc("notes/Rust.md")),
            vec![doc("tools/Cargo.md")]
        );
        assert_eq!(
            index.backlinks(&doc("tools/Cargo.md")),
            vec![doc("Index.md"), doc("notes/Rust.md")]
        );
    }

    #[test]
    fn test_invalid_utf8_document_does_not_abort_scan() {
        let dir = tempdir().unwrap();
        write(dir.path(), "A.md", "[[B]]");
        write(dir.path(), "B.md", "");
        fs::write(dir.path().join("latin1.md"), b"caf\xe9 [[A]]").unwrap();

        let vault = Vault::open(dir.path()).unwrap();
        let index = vault.index();

        assert_eq!(index.document_count(), 3);
        assert_eq!(index.forward_links(&doc("A.md")), vec![doc("B.md")]);
        assert_eq!(index.forward_links(&doc("latin1.md")), vec![doc("A.md")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_symlink_loop_is_not_followed() {
        let dir = tempdir().unwrap();
        write(dir.path(), "notes/A.md", "[[B]]");
        write(dir.path(), "notes/B.md", "");
        std::os::unix::fs::symlink(dir.path().join("notes"), dir.path().join("notes/loop"))
            .unwrap();

        let vault = Vault::open(dir.path()).unwrap();
        assert_eq!(vault.index().document_count(), 2);
        assert_eq!(
            vault.index().forward_links(&doc("notes/A.md")),
            vec![doc("notes/B.md")]
        );
    }

    #[test]
    fn test_ambiguous_names_do_not_resolve() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a/Topic.md", "");
        write(dir.path(), "b/Topic.md", "");

        let vault = Vault::open(dir.path()).unwrap();
        assert_eq!(vault.resolve("Topic"), None);
        assert_eq!(vault.resolve("a/Topic"), Some(doc("a/Topic.md")));
        assert_eq!(vault.resolve("./b/Topic.md"), Some(doc("b/Topic.md")));
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let dir = tempdir().unwrap();
        let err = Vault::open(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, LinkmapError::NotFound(_)));
    }
}
