use log::{debug, info, warn};
use std::{collections::HashMap, fs, io};

pub fn load_htpasswd(file_path: &str) -> io::Result<HashMap<String, String>> {
    debug!("Loading htpasswd file from: {}", file_path);
    let content = fs::read_to_string(file_path)?;
    info!("Successfully read htpasswd file");
    Ok(parse_htpasswd(&content))
}

/// `user:hash` per line; blank lines and `#` comments are ignored.
pub fn parse_htpasswd(content: &str) -> HashMap<String, String> {
    let entries: HashMap<String, String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match line.split_once(':') {
            Some((user, hash)) if !user.is_empty() && !hash.is_empty() => {
                debug!("Parsed entry for user: {}", user);
                Some((user.to_string(), hash.to_string()))
            }
            _ => {
                warn!("Invalid line format in htpasswd file");
                None
            }
        })
        .collect();

    debug!("Loaded {} entries from htpasswd file", entries.len());
    entries
}
