//! Expansion of `%VARIABLE%` and `~` in configured paths

use std::path::PathBuf;

/// Expands `template` using the process environment and home directory
pub fn expand(template: &str) -> PathBuf {
    expand_with(template, |name| std::env::var(name).ok(), dirs::home_dir())
}

/// Expands `%NAME%` sequences using `lookup`, unknown names are left as they are.
/// A leading `~` followed by a separator (or nothing) is replaced with `home`.
pub fn expand_with<F>(template: &str, lookup: F, home: Option<PathBuf>) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let expanded = expand_variables(template, lookup);
    if let Some(home) = home {
        if expanded == "~" {
            return home;
        }
        if let Some(rest) = expanded
            .strip_prefix("~\\")
            .or_else(|| expanded.strip_prefix("~/"))
        {
            return rest.split(['\\', '/']).fold(home, |p, c| p.join(c));
        }
    }
    PathBuf::from(expanded)
}

fn expand_variables<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) => {
                let name = &after[..end];
                match (!name.is_empty()).then(|| lookup(name)).flatten() {
                    Some(value) => {
                        out.push_str(&value);
                        rest = &after[end + 1..];
                    }
                    None => {
                        // Keep the opening % and retry from the closing one
                        out.push('%');
                        out.push_str(name);
                        rest = &after[end..];
                    }
                }
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
