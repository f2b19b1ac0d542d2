use std::sync::LazyLock;

/// Release version followed by the git commit it was built from.
pub static VERSION: LazyLock<String> = LazyLock::new(|| {
    format_version(
        env!("RELEASE_VERSION"),
        option_env!("VERGEN_GIT_SHA"),
        option_env!("VERGEN_GIT_DIRTY") == Some("true"),
    )
});

fn format_version(release: &str, sha: Option<&str>, dirty: bool) -> String {
    let sha = sha.map(|sha| &sha[..sha.len().min(12)]).unwrap_or("unknown");
    format!("{release}-{sha}{}", if dirty { "-dirty" } else { "" })
}
