//! Directory tree over the changed files, as shown in the file list.

use std::collections::HashMap;

use splitdiff::DiffFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory { expanded: bool },
    /// Index into the reviewed file list.
    File { index: usize },
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub depth: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub kind: NodeKind,
}

impl TreeNode {
    pub fn is_directory(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }
}

/// Nodes live in one arena and refer to each other by index.
#[derive(Debug, Clone, Default)]
pub struct FileTree {
    nodes: Vec<TreeNode>,
    roots: Vec<usize>,
}

impl FileTree {
    /// Build the tree from file paths. With a `root_name` every node hangs
    /// under one directory carrying that label.
    ///
    /// Directories start expanded. Siblings are ordered directories first,
    /// then case-insensitively by name.
    pub fn build(files: &[DiffFile], root_name: Option<&str>) -> Self {
        let mut tree = Self::default();
        let mut dirs: HashMap<String, usize> = HashMap::new();

        let root = root_name
            .filter(|name| !name.is_empty())
            .map(|name| tree.push(name, 0, None, NodeKind::Directory { expanded: true }));
        let base_depth = usize::from(root.is_some());

        for (index, file) in files.iter().enumerate() {
            let path = file.get_name();
            let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
            let Some((file_name, dir_parts)) = parts.split_last() else {
                continue;
            };

            let mut parent = root;
            let mut dir_path = String::new();
            for (depth, part) in dir_parts.iter().enumerate() {
                if !dir_path.is_empty() {
                    dir_path.push('/');
                }
                dir_path.push_str(part);

                let id = match dirs.get(&dir_path) {
                    Some(&id) => id,
                    None => {
                        let id = tree.push(
                            part,
                            base_depth + depth,
                            parent,
                            NodeKind::Directory { expanded: true },
                        );
                        dirs.insert(dir_path.clone(), id);
                        id
                    }
                };
                parent = Some(id);
            }

            tree.push(
                file_name,
                base_depth + dir_parts.len(),
                parent,
                NodeKind::File { index },
            );
        }

        tree.sort();
        tree
    }

    fn push(
        &mut self,
        name: &str,
        depth: usize,
        parent: Option<usize>,
        kind: NodeKind,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            name: name.to_string(),
            depth,
            parent,
            children: Vec::new(),
            kind,
        });
        match parent {
            Some(parent) => self.nodes[parent].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    fn sort(&mut self) {
        let nodes = &self.nodes;
        let key = |&id: &usize| (!nodes[id].is_directory(), nodes[id].name.to_lowercase());

        self.roots.sort_by_key(key);
        let sorted: Vec<Vec<usize>> = nodes
            .iter()
            .map(|node| {
                let mut children = node.children.clone();
                children.sort_by_key(key);
                children
            })
            .collect();
        for (node, children) in self.nodes.iter_mut().zip(sorted) {
            node.children = children;
        }
    }

    pub fn node(&self, id: usize) -> &TreeNode {
        &self.nodes[id]
    }

    /// Node ids in display order, skipping the contents of collapsed
    /// directories.
    pub fn visible(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let NodeKind::Directory { expanded: true } = self.nodes[id].kind {
                stack.extend(self.nodes[id].children.iter().rev());
            }
        }
        out
    }

    pub fn set_expanded(&mut self, id: usize, expanded: bool) {
        if let NodeKind::Directory { expanded: state } = &mut self.nodes[id].kind {
            *state = expanded;
        }
    }

    pub fn is_expanded(&self, id: usize) -> bool {
        matches!(self.nodes[id].kind, NodeKind::Directory { expanded: true })
    }

    pub fn file_index(&self, id: usize) -> Option<usize> {
        match self.nodes[id].kind {
            NodeKind::File { index } => Some(index),
            NodeKind::Directory { .. } => None,
        }
    }
}
