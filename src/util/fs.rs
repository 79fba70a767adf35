use crate::error::CueSplitterResult;
use async_recursion::async_recursion;
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs;

const WORKING_DIR_NAME: &str = "temp";

#[async_recursion]
pub async fn find_cue_files(dir_path: &Path, recursive: bool) -> CueSplitterResult<Vec<PathBuf>> {
    let mut dir = fs::read_dir(dir_path).await?;
    let mut files = Vec::new();

    while let Some(entry) = dir.next_entry().await? {
        let path = entry.path();

        if path.is_dir() {
            if recursive {
                files.append(&mut find_cue_files(&path, recursive).await?);
            }
        } else if path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("cue"))
        {
            debug!("Found CUE: {:?}", path);
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Creates `temp` inside `parent`, or `temp1`, `temp2`, ... if taken.
pub async fn create_working_dir(parent: &Path) -> CueSplitterResult<PathBuf> {
    let mut candidate = parent.join(WORKING_DIR_NAME);
    let mut count = 0;

    while fs::try_exists(&candidate).await? {
        debug!("{:?} exists, trying the next name", candidate);
        count += 1;
        candidate = parent.join(format!("{WORKING_DIR_NAME}{count}"));
    }

    debug!("Creating working directory {:?}", candidate);
    fs::create_dir(&candidate).await?;
    Ok(candidate)
}

pub async fn is_dir_empty(dir_path: &Path) -> CueSplitterResult<bool> {
    let mut dir = fs::read_dir(dir_path).await?;
    Ok(dir.next_entry().await?.is_none())
}
