/// Parse and validate a plugin name.
///
/// The name ends up in file names (`[plugin].plugin.js`) and in the CSS
/// local identifier pattern, so it must be non-empty, free of surrounding
/// whitespace and must not contain path separators.
///
/// # Errors
///
/// Returns an error message if the name is unusable.
pub fn parse_plugin_name(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("Plugin name cannot be empty".to_string());
    }

    if s.trim() != s {
        return Err(format!(
            "Plugin name cannot start or end with whitespace: '{}'",
            s
        ));
    }

    if s.contains(['/', '\\']) || s == "." || s == ".." {
        return Err(format!("Plugin name cannot be a path: '{}'", s));
    }

    Ok(s.to_string())
}
