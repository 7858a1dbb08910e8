//! Unified diff preview of pending changes.

use diffy::PatchFormatter;

#[derive(Debug, Clone, Copy)]
pub struct FileDiff<'a> {
    pub path: &'a str,
    pub before: &'a str,
    pub after: &'a str,
}

/// Render a git-style unified diff. Unchanged files are skipped.
pub fn render_patch<'a>(files: impl IntoIterator<Item = FileDiff<'a>>) -> String {
    let mut out = String::new();
    let formatter = PatchFormatter::new();

    for file in files {
        if file.before == file.after {
            continue;
        }

        out.push_str(&format!("diff --git a/{0} b/{0}\n", file.path));
        out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", file.path));

        let patch = diffy::create_patch(file.before, file.after);
        let body = formatter.fmt_patch(&patch).to_string();
        // diffy emits its own `---`/`+++` header; keep only the hunks.
        let hunks = body.find("@@").map(|i| &body[i..]).unwrap_or("");
        out.push_str(hunks);
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_only_changed_files() {
        let patch = render_patch([
            FileDiff {
                path: "a.cpp",
                before: "int x;\n",
                after: "EVDLAlgorithm x;\n",
            },
            FileDiff {
                path: "b.cpp",
                before: "same\n",
                after: "same\n",
            },
        ]);

        assert!(patch.starts_with("diff --git a/a.cpp b/a.cpp\n--- a/a.cpp\n+++ b/a.cpp\n@@"));
        assert!(patch.contains("-int x;\n"));
        assert!(patch.contains("+EVDLAlgorithm x;\n"));
        assert!(!patch.contains("b.cpp"));
    }

    #[test]
    fn empty_when_nothing_changed() {
        let patch = render_patch([FileDiff {
            path: "a",
            before: "x",
            after: "x",
        }]);
        assert!(patch.is_empty());
    }
}
