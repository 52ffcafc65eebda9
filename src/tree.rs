use crate::{cli::parse_date, export::Layout, Result, UrsError};
use std::path::Path;
use tracing::info;
use walkdir::{DirEntry, WalkDir};

/// Renders the scrapes stored for `date` as an indented tree, directories first.
pub fn render_tree(scrapes_dir: &Path, date: &str) -> Result<String> {
    parse_date(date)?;
    let layout = Layout::for_date(scrapes_dir, date);
    let root = layout.date_dir();
    if !root.is_dir() {
        return Err(UrsError::MissingDateDirectory(root.to_path_buf()));
    }

    let mut out = format!("{}/\n", root.display());
    // Tracks, per depth, whether the ancestor at that depth was the last of its siblings.
    let mut last_at_depth: Vec<bool> = vec![];
    let entries = WalkDir::new(root)
        .min_depth(1)
        .sort_by(|a, b| {
            b.file_type()
                .is_dir()
                .cmp(&a.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .collect::<std::result::Result<Vec<DirEntry>, walkdir::Error>>()
        .map_err(|err| UrsError::Io(err.into()))?;

    for (index, entry) in entries.iter().enumerate() {
        let depth = entry.depth();
        let is_last = !entries[index + 1..]
            .iter()
            .take_while(|next| next.depth() >= depth)
            .any(|next| next.depth() == depth);
        last_at_depth.truncate(depth - 1);

        for &ancestor_last in &last_at_depth {
            out.push_str(if ancestor_last { "    " } else { "│   " });
        }
        let connector = if is_last { "└── " } else { "├── " };
        let name = entry.file_name().to_string_lossy();
        let suffix = if entry.file_type().is_dir() { "/" } else { "" };
        out.push_str(&format!("{connector}{name}{suffix}\n"));

        last_at_depth.push(is_last);
    }
    Ok(out)
}

/// Prints the tree of scrapes for `date`.
pub fn display_tree(scrapes_dir: &Path, date: &str) -> Result<()> {
    info!("Displaying directory tree for {date}.");
    let tree = render_tree(scrapes_dir, date)?;
    println!("\n{tree}");
    Ok(())
}
