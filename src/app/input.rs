//! Loading credentials and user ids
//!
//! Failures here are fatal and happen before any worker starts. A readable
//! but empty file is not a failure; the run then has nothing to do.

use crate::app::cli::args::ItemSource;
use crate::core::error_handling::ContextualError;
use crate::core::validation::validate_item_id;
use crate::harvest::types::{Client, Credential, WorkItem};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("cannot read {}: {}", .path.display(), .message)]
    Unreadable { path: PathBuf, message: String },

    #[error("invalid user id on line {line} of {}: {message}", .path.display())]
    InvalidItem {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl ContextualError for InputError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// Non-blank lines of a file, trimmed, paired with their 1-based line number
pub async fn read_lines(path: &Path) -> Result<Vec<(usize, String)>, InputError> {
    let contents =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| InputError::Unreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
    Ok(contents
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim().to_string()))
        .filter(|(_, line)| !line.is_empty())
        .collect())
}

/// One client per token line, indexed in file order
pub async fn load_clients(path: &Path) -> Result<Vec<Client>, InputError> {
    let clients: Vec<Client> = read_lines(path)
        .await?
        .into_iter()
        .enumerate()
        .map(|(index, (_, token))| Client::new(index, Credential::new(token)))
        .collect();
    if clients.is_empty() {
        log::warn!("No credentials found in {}", path.display());
    }
    log::debug!("Loaded {} credentials from {}", clients.len(), path.display());
    Ok(clients)
}

/// User ids from the command line or a file, duplicates kept
pub async fn load_items(source: &ItemSource) -> Result<Vec<WorkItem>, InputError> {
    let items: Vec<WorkItem> = match source {
        ItemSource::Inline(ids) => ids.iter().map(|id| WorkItem::new(id.as_str())).collect(),
        ItemSource::File(path) => read_lines(path)
            .await?
            .into_iter()
            .map(|(line, id)| {
                validate_item_id(&id)
                    .map(WorkItem::from)
                    .map_err(|message| InputError::InvalidItem {
                        path: path.clone(),
                        line,
                        message,
                    })
            })
            .collect::<Result<_, _>>()?,
    };
    if items.is_empty() {
        log::warn!("No user ids to process");
    }
    Ok(items)
}
