use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

use crate::domain::ast::SyntaxTree;

/// `<workspace>/<file>_ast.json`
pub fn dump_path(workspace_root: &Path, file: &Path) -> PathBuf {
    let mut name = file.as_os_str().to_os_string();
    name.push("_ast.json");
    workspace_root.join(name)
}

/// Write the tree as pretty-printed JSON.
pub fn write_ast_dump(tree: &SyntaxTree, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(tree).context("Failed to serialize syntax tree")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write AST dump {}", path.display()))?;
    Ok(())
}
