pub mod game_dir;
pub mod manifest;
pub mod report;

/// Removes the first occurrence of `token` from `name`, wherever it appears.
/// Names that don't contain the token are returned unchanged.
pub fn strip_suffix_token(name: &str, token: &str) -> String {
    if token.is_empty() {
        return name.to_string();
    }

    name.replacen(token, "", 1)
}
