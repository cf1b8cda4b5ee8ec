//! User-facing attachment error messages.

/// Prefix of the "attachment already exists" rename error.
pub const RENAME_ERR: &str = "Attachment with name ";

pub fn duplicate_draft_file_err(files: &[impl AsRef<str>]) -> String {
    let files: Vec<&str> = files.iter().map(|f| f.as_ref()).collect();
    format!(
        "The file(s) {} have been added multiple times. Please rename and try again.",
        files.join(", ")
    )
}

pub fn empty_file_err(file_name: &str) -> String {
    format!(
        "Content of file {} is empty. Either it is corrupted or not uploaded properly.",
        file_name
    )
}

pub fn virus_file_err(files: &[impl AsRef<str>]) -> String {
    format!(
        "The following files contain potential malware and cannot be uploaded:\n{}",
        bullet_points(files)
    )
}

pub fn duplicate_file_err(files: &[impl AsRef<str>]) -> String {
    format!(
        "The following files could not be uploaded as they already exist:\n{}",
        bullet_points(files)
    )
}

fn bullet_points(files: &[impl AsRef<str>]) -> String {
    files
        .iter()
        .map(|file| format!("• {}", file.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
